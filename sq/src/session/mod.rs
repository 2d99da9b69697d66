//! Planning session: request lifecycle and result snapshots

mod planning;
mod state;

use thiserror::Error;

pub use planning::{PlanningSession, validate_query};
pub use state::{Phase, SessionState};

/// Errors returned by session operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A newer submit or a clear replaced this request; its results were dropped
    #[error("Request superseded by a newer submit or clear")]
    Superseded,
}
