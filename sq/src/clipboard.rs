//! System clipboard access

use async_trait::async_trait;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::ClipboardConfig;

/// Errors writing to the clipboard
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("No clipboard command available")]
    Unavailable,

    #[error("Failed to run clipboard command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Clipboard command '{command}' exited with {code:?}")]
    Failed { command: String, code: Option<i32> },
}

/// Write-only clipboard capability
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard backed by an external command reading from stdin
pub struct CommandClipboard {
    argv: Option<Vec<String>>,
}

impl CommandClipboard {
    pub fn new(argv: Vec<String>) -> Self {
        Self {
            argv: (!argv.is_empty()).then_some(argv),
        }
    }

    /// Use the configured command, else detect one for this platform
    pub fn from_config(config: &ClipboardConfig) -> Self {
        debug!(?config, "CommandClipboard::from_config: called");
        match &config.command {
            Some(argv) => Self::new(argv.clone()),
            None => Self { argv: detect_command() },
        }
    }
}

fn detect_command() -> Option<Vec<String>> {
    let argv: &[&str] = if cfg!(target_os = "macos") {
        &["pbcopy"]
    } else if cfg!(target_os = "windows") {
        &["clip"]
    } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        &["wl-copy"]
    } else if std::env::var_os("DISPLAY").is_some() {
        &["xclip", "-selection", "clipboard"]
    } else {
        debug!("detect_command: no display, no clipboard");
        return None;
    };
    Some(argv.iter().map(|s| s.to_string()).collect())
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let argv = self.argv.as_ref().ok_or(ClipboardError::Unavailable)?;
        let (program, args) = argv.split_first().ok_or(ClipboardError::Unavailable)?;
        let command = argv.join(" ");
        debug!(%command, text_len = text.len(), "CommandClipboard::write_text: called");

        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ClipboardError::Spawn {
                command: command.clone(),
                source,
            })?;

        // A command that exits without reading is judged by its exit status
        if let Some(mut stdin) = child.stdin.take()
            && let Err(source) = stdin.write_all(text.as_bytes()).await
            && source.kind() != std::io::ErrorKind::BrokenPipe
        {
            return Err(ClipboardError::Spawn { command, source });
        }

        let status = child.wait().await.map_err(|source| ClipboardError::Spawn {
            command: command.clone(),
            source,
        })?;

        if !status.success() {
            debug!(?status, "CommandClipboard::write_text: command failed");
            return Err(ClipboardError::Failed {
                command,
                code: status.code(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Mock clipboard recording writes
    #[derive(Default)]
    pub struct MockClipboard {
        fail: bool,
        writes: Mutex<Vec<String>>,
    }

    impl MockClipboard {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn writes(&self) -> Vec<String> {
            self.writes.lock().map(|w| w.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl Clipboard for MockClipboard {
        async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable);
            }
            if let Ok(mut writes) = self.writes.lock() {
                writes.push(text.to_string());
            }
            Ok(())
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_command_clipboard_pipes_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clip.txt");
        let clipboard = CommandClipboard::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            format!("cat > '{}'", out.display()),
        ]);

        clipboard.write_text("https://tickets.example/1").await.unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "https://tickets.example/1");
    }

    #[tokio::test]
    async fn test_command_clipboard_nonzero_exit() {
        let clipboard = CommandClipboard::new(vec!["false".to_string()]);
        let err = clipboard.write_text("x").await.unwrap_err();
        assert!(matches!(err, ClipboardError::Failed { .. }));
    }

    #[tokio::test]
    async fn test_command_clipboard_missing_program() {
        let clipboard = CommandClipboard::new(vec!["squadup-no-such-clipboard-tool".to_string()]);
        assert!(matches!(
            clipboard.write_text("x").await,
            Err(ClipboardError::Spawn { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_command_unavailable() {
        let clipboard = CommandClipboard::new(vec![]);
        assert!(matches!(clipboard.write_text("x").await, Err(ClipboardError::Unavailable)));
    }
}
