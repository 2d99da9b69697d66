//! SquadUp - AI hangout planner
//!
//! Turns a free-text activity description and an optional city into a short
//! list of generated hangout suggestions plus real, bookable local events and
//! the most popular venues nearby.
//!
//! # Pipeline
//!
//! - **Suggestions**: one text-generation call, digested to at most three bullets
//! - **Events**: best-effort search, normalized and filtered to bookable events
//! - **Venues**: deterministic top-N ranking of a location-wide event batch
//! - **Markup**: digest text rendered to a safe node tree
//!
//! # Modules
//!
//! - [`session`] - `PlanningSession` orchestrator and state snapshots
//! - [`suggest`] - suggestion client and digest post-processing
//! - [`events`] - events backend, normalization and search client
//! - [`ranker`] - venue ranking
//! - [`markup`] - bold/bullet markup renderer
//! - [`llm`] - text-generation client (Gemini)
//! - [`clipboard`] - clipboard capability
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod events;
pub mod llm;
pub mod markup;
pub mod ranker;
pub mod session;
pub mod suggest;

// Re-export commonly used types
pub use clipboard::{Clipboard, ClipboardError, CommandClipboard};
pub use config::{Config, EventsConfig, LlmConfig, SessionConfig};
pub use events::{Event, EventQuery, EventSearchClient, EventsBackend, SearchError, TicketmasterBackend, bookable};
pub use llm::{GeminiClient, LlmClient, LlmError, create_client};
pub use markup::{Inline, Markup, render};
pub use ranker::{VenueRanking, rank};
pub use session::{Phase, PlanningSession, SessionError, SessionState, validate_query};
pub use suggest::{GenerationError, SuggestionDigest, TextSuggestionClient, digest};
