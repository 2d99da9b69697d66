//! Command-line smoke tests for the `sq` binary

use std::io::{Read, Write};
use std::net::TcpListener;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `sq` isolated from the user's config, data dir and API keys
fn sq(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sq").expect("bin");
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("GEMINI_API_KEY")
        .env_remove("TICKETMASTER_API_KEY");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().expect("Failed to create temp dir");
    sq(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("events"))
        .stdout(predicate::str::contains("venues"));
}

#[test]
fn test_plan_blank_query_fails() {
    let home = TempDir::new().expect("Failed to create temp dir");
    sq(&home)
        .args(["plan", "   ", "--location", "Denver"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("blank"));
}

#[test]
fn test_plan_without_api_key_fails() {
    let home = TempDir::new().expect("Failed to create temp dir");
    sq(&home)
        .args(["plan", "bowling"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key"));
}

/// Answer one HTTP request with a canned Gemini completion; returns the base URL
fn serve_gemini_once(text: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base_url = format!("http://{}", listener.local_addr().expect("addr"));
    let body = serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] }, "finishReason": "STOP" }]
    })
    .to_string();

    std::thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).unwrap_or(0);
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&request[..end]).to_lowercase();
                let len = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + len {
                    break;
                }
            }
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes());
    });

    base_url
}

#[test]
fn test_plan_without_events_key_has_no_events() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let base_url = serve_gemini_once("* Bowling league\n* Cosmic bowling");
    let config = home.path().join("squadup.yml");
    std::fs::write(
        &config,
        format!(
            "llm:\n  base-url: {}\n  api-key-env: SQUADUP_TEST_LLM_KEY\nevents:\n  api-key-env: SQUADUP_TEST_NO_EVENTS_KEY\n",
            base_url
        ),
    )
    .expect("write config");

    sq(&home)
        .env("SQUADUP_TEST_LLM_KEY", "dummy")
        .env_remove("SQUADUP_TEST_NO_EVENTS_KEY")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .env("NO_PROXY", "127.0.0.1")
        .args(["--config", config.to_str().unwrap(), "plan", "bowling", "--location", "Denver"])
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"phase\": \"ready\""))
        .stdout(predicate::str::contains("Cosmic bowling"))
        .stdout(predicate::str::contains("\"suggestionEvents\": []"));
}

#[test]
fn test_plan_with_unreadable_config_fails() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let missing = home.path().join("nope.yml");
    sq(&home)
        .args(["--config", missing.to_str().unwrap(), "plan", "bowling"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_venues_requires_location() {
    let home = TempDir::new().expect("Failed to create temp dir");
    sq(&home)
        .arg("venues")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--location"));
}
