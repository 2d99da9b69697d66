//! SquadUp - AI hangout planner
//!
//! CLI entry point for planning sessions, event search and venue ranking.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use squadup::cli::{self, Cli, Command, OutputFormat};
use squadup::clipboard::CommandClipboard;
use squadup::config::Config;
use squadup::events::{EventSearchClient, TicketmasterBackend, bookable};
use squadup::llm::create_client;
use squadup::ranker;
use squadup::session::{PlanningSession, validate_query};
use squadup::suggest::TextSuggestionClient;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("squadup")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("squadup.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Plan {
            query,
            location,
            copy,
            format,
        } => {
            // Blank queries never reach config or backends
            validate_query(&query)?;
            let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
            // Only the LLM key is required; without an events key the plan has no events
            config.validate()?;
            cmd_plan(&config, &query, &location, copy, format).await
        }
        Command::Events {
            query,
            location,
            all,
            format,
        } => {
            let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
            cmd_events(&config, &query, &location, all, format).await
        }
        Command::Venues {
            location,
            limit,
            format,
        } => {
            let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
            cmd_venues(&config, &location, limit, format).await
        }
    }
}

fn search_client(config: &Config) -> Result<EventSearchClient> {
    let backend = TicketmasterBackend::from_config(&config.events).context("Failed to create events backend")?;
    Ok(EventSearchClient::new(Arc::new(backend)))
}

async fn cmd_plan(
    config: &Config,
    query: &str,
    location: &str,
    copy: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    debug!(%query, %location, ?copy, "cmd_plan: called");
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let clipboard = CommandClipboard::from_config(&config.clipboard);
    let session = PlanningSession::new(
        TextSuggestionClient::new(llm),
        EventSearchClient::from_config(&config.events),
        Arc::new(clipboard),
        config.session.clone(),
    );

    let mut state = session.submit(query, location).await?;

    if let Some(n) = copy {
        let event = n
            .checked_sub(1)
            .and_then(|i| state.suggestion_events.get(i))
            .ok_or_else(|| eyre!("No suggested event #{} to copy", n))?;
        // Bookable events always carry a link
        let url = event.booking_url.clone().unwrap_or_default();
        session
            .share(&event.id, &url)
            .await
            .context("Failed to copy booking link")?;
        state = session.state();
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&state)?),
        OutputFormat::Text => {
            println!("{}", cli::format_session(&state));
            if let Some(id) = &state.last_shared_event_id
                && let Some(event) = state.suggestion_events.iter().find(|e| &e.id == id)
            {
                println!("\n{} {}", "Copied link for".green(), event.name.bold());
            }
        }
    }
    Ok(())
}

async fn cmd_events(config: &Config, query: &str, location: &str, all: bool, format: OutputFormat) -> Result<()> {
    debug!(%query, %location, all, "cmd_events: called");
    let search = search_client(config)?;
    let mut events = search
        .try_search(query, location)
        .await
        .context("Event search failed")?;
    if !all {
        events = bookable(events);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&events)?),
        OutputFormat::Text => {
            if events.is_empty() {
                println!("No events found.");
            }
            for (i, event) in events.iter().enumerate() {
                println!("{}", cli::format_event(i + 1, event));
            }
        }
    }
    Ok(())
}

async fn cmd_venues(config: &Config, location: &str, limit: usize, format: OutputFormat) -> Result<()> {
    debug!(%location, limit, "cmd_venues: called");
    let search = search_client(config)?;
    let events = search.try_search("", location).await.context("Event search failed")?;
    let venues = ranker::rank(&events, limit);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&venues)?),
        OutputFormat::Text => {
            if venues.is_empty() {
                println!("No venues found.");
            }
            for (i, venue) in venues.iter().enumerate() {
                println!("{}", cli::format_venue(i + 1, venue));
            }
        }
    }
    Ok(())
}
