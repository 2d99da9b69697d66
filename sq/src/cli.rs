//! CLI command definitions and output helpers

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

use crate::events::Event;
use crate::markup::{Inline, Markup};
use crate::ranker::VenueRanking;
use crate::session::SessionState;

/// SquadUp - AI hangout planner
#[derive(Parser)]
#[command(
    name = "sq",
    about = "Plan a hangout: AI suggestions plus bookable local events and popular venues",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Get suggestions, bookable events and top venues for an activity
    Plan {
        /// What you feel like doing
        query: String,

        /// City to search for events
        #[arg(short = 'L', long, default_value = "")]
        location: String,

        /// Copy the booking link of the Nth suggested event (1-based)
        #[arg(long, value_name = "N")]
        copy: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Search events in a city
    Events {
        /// Keyword filter
        #[arg(default_value = "")]
        query: String,

        /// City to search
        #[arg(short = 'L', long)]
        location: String,

        /// Include events without a booking link
        #[arg(short, long)]
        all: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Rank the most popular venues in a city
    Venues {
        /// City to search
        #[arg(short = 'L', long)]
        location: String,

        /// Number of venues
        #[arg(short = 'n', long, default_value = "3")]
        limit: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render markup for a terminal
pub fn markup_to_terminal(markup: &Markup) -> String {
    fn inline(nodes: &[Inline]) -> String {
        nodes
            .iter()
            .map(|node| match node {
                Inline::Text(t) => t.clone(),
                Inline::Bold(t) => t.bold().to_string(),
                Inline::LineBreak => "\n".to_string(),
            })
            .collect()
    }

    match markup {
        Markup::Paragraph(nodes) => inline(nodes),
        Markup::List(items) => items
            .iter()
            .map(|item| format!("  • {}", inline(item)))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// One event as a terminal line
pub fn format_event(index: usize, event: &Event) -> String {
    let mut line = format!("{:>2}. {}", index, event.name.bold());
    if let Some(venue) = &event.venue_name {
        line.push_str(&format!(" @ {}", venue.cyan()));
    }
    if let Some(start) = &event.start_date_time {
        line.push_str(&format!(" ({})", start.format("%a %b %-d, %H:%M UTC")));
    }
    if let Some(url) = &event.booking_url {
        line.push_str(&format!("\n    {}", url.dimmed()));
    }
    line
}

/// One venue ranking as a terminal line
pub fn format_venue(index: usize, venue: &VenueRanking) -> String {
    let noun = if venue.occurrence_count == 1 { "event" } else { "events" };
    format!(
        "{:>2}. {} ({} {}, e.g. {})",
        index,
        venue.venue_name.bold(),
        venue.occurrence_count,
        noun,
        venue.representative_event.name
    )
}

/// Full session snapshot for the `plan` command
pub fn format_session(state: &SessionState) -> String {
    debug!(phase = ?state.phase, "format_session: called");
    let mut out = Vec::new();

    out.push(format!("{}", "Suggestions".green().bold()));
    match state.rendered_digest() {
        Some(markup) => out.push(markup_to_terminal(&markup)),
        None => out.push("  (none)".dimmed().to_string()),
    }

    if !state.location.is_empty() {
        out.push(String::new());
        out.push(format!("{} {}", "Events in".green().bold(), state.location.green().bold()));
        if state.suggestion_events.is_empty() {
            out.push("  No events found.".dimmed().to_string());
        }
        for (i, event) in state.suggestion_events.iter().enumerate() {
            out.push(format_event(i + 1, event));
        }

        out.push(String::new());
        out.push(format!("{}", "Top places to hang out".green().bold()));
        if state.top_venues.is_empty() {
            out.push("  No venues found.".dimmed().to_string());
        }
        for (i, venue) in state.top_venues.iter().enumerate() {
            out.push(format_venue(i + 1, venue));
        }
    }

    out.join("\n")
}
