//! Events search: provider backend, normalization, and the best-effort client

mod backend;
mod client;
mod error;
mod types;

pub use backend::{EventQuery, EventsBackend, TicketmasterBackend, UnavailableBackend};
pub use client::EventSearchClient;
pub use error::SearchError;
pub use types::{Event, bookable, normalize_response};

#[cfg(test)]
pub use backend::mock;
