//! EventSearchClient - best-effort event lookup

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{Event, EventQuery, EventsBackend, SearchError, TicketmasterBackend, UnavailableBackend, normalize_response};
use crate::config::EventsConfig;

/// Best-effort events search over an injected backend
///
/// Search failures are logged and reported as "no events": events are an
/// enhancement on top of the suggestions, never a reason to fail a plan.
#[derive(Clone)]
pub struct EventSearchClient {
    backend: Arc<dyn EventsBackend>,
}

impl EventSearchClient {
    pub fn new(backend: Arc<dyn EventsBackend>) -> Self {
        Self { backend }
    }

    /// Ticketmaster-backed client; degrades to "no events" when the backend
    /// cannot be built (e.g. no API key)
    pub fn from_config(config: &EventsConfig) -> Self {
        debug!("EventSearchClient::from_config: called");
        match TicketmasterBackend::from_config(config) {
            Ok(backend) => Self::new(Arc::new(backend)),
            Err(e) => {
                warn!(error = %e, "from_config: events backend unavailable, plans will carry no events");
                Self::new(Arc::new(UnavailableBackend::new(e.to_string())))
            }
        }
    }

    /// Search by optional keyword and optional city; never fails
    pub async fn search(&self, query: &str, location: &str) -> Vec<Event> {
        debug!(%query, %location, "search: called");
        match self.try_search(query, location).await {
            Ok(events) => {
                info!(count = events.len(), %query, %location, "search: events found");
                events
            }
            Err(e) => {
                warn!(error = %e, %query, %location, "search: events search failed, using no events");
                Vec::new()
            }
        }
    }

    /// Search and surface backend errors
    pub async fn try_search(&self, query: &str, location: &str) -> Result<Vec<Event>, SearchError> {
        let body = self.backend.fetch(&EventQuery::new(query, location)).await?;
        normalize_response(body).map_err(SearchError::Decode)
    }
}
