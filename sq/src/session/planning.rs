//! PlanningSession - orchestrates suggestions, event search and venue ranking
//!
//! The session owns the only copy of [`SessionState`] and publishes whole
//! snapshots through a watch channel. Two tokens keep late work from writing
//! stale data: each `submit` takes a fresh request token that a newer `submit`
//! or `clear` invalidates, and each `share` arms a timer tagged with its own
//! token so an older timer can never reset a newer indicator.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{Phase, SessionError, SessionState};
use crate::clipboard::{Clipboard, ClipboardError};
use crate::config::SessionConfig;
use crate::events::{EventSearchClient, bookable};
use crate::ranker;
use crate::suggest::{SuggestionDigest, TextSuggestionClient};

/// Reject blank queries before any backend is involved
pub fn validate_query(query: &str) -> Result<(), SessionError> {
    if query.trim().is_empty() {
        debug!("validate_query: blank query");
        return Err(SessionError::Validation("query must not be blank".to_string()));
    }
    Ok(())
}

struct ShareTimer {
    token: Uuid,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Control {
    /// Token of the submit allowed to publish results
    in_flight: Option<Uuid>,
    share: Option<ShareTimer>,
}

impl Control {
    fn cancel_share_timer(&mut self) {
        if let Some(timer) = self.share.take() {
            debug!(token = %timer.token, "cancel_share_timer: aborting");
            timer.handle.abort();
        }
    }
}

fn lock(control: &Mutex<Control>) -> MutexGuard<'_, Control> {
    control.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One user's planning session
pub struct PlanningSession {
    suggester: TextSuggestionClient,
    search: EventSearchClient,
    clipboard: Arc<dyn Clipboard>,
    config: SessionConfig,
    state_tx: Arc<watch::Sender<SessionState>>,
    control: Arc<Mutex<Control>>,
}

impl PlanningSession {
    pub fn new(
        suggester: TextSuggestionClient,
        search: EventSearchClient,
        clipboard: Arc<dyn Clipboard>,
        config: SessionConfig,
    ) -> Self {
        debug!(?config, "PlanningSession::new: called");
        let (state_tx, _) = watch::channel(SessionState::default());
        Self {
            suggester,
            search,
            clipboard,
            config,
            state_tx: Arc::new(state_tx),
            control: Arc::new(Mutex::new(Control::default())),
        }
    }

    /// Current snapshot
    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Receive every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    fn is_current(&self, token: Uuid) -> bool {
        lock(&self.control).in_flight == Some(token)
    }

    /// Run the full pipeline for a query and optional location
    ///
    /// Blank queries are rejected without touching state. Generation failures
    /// become a fixed error digest and event search failures become empty
    /// lists; both still end in `Ready`. Returns `Superseded` if a newer
    /// `submit` or a `clear` happened while this one was in flight.
    pub async fn submit(&self, query: &str, location: &str) -> Result<SessionState, SessionError> {
        debug!(%query, %location, "submit: called");
        validate_query(query)?;
        let query = query.trim();
        let location = location.trim();

        let token = Uuid::now_v7();
        {
            let mut control = lock(&self.control);
            if let Some(previous) = control.in_flight.replace(token) {
                info!(%previous, %token, "submit: superseding in-flight request");
            }
            control.cancel_share_timer();
            self.state_tx.send_replace(SessionState::loading(query, location));
        }

        let suggester = self.suggester.clone();
        let prompt = query.to_string();
        let outcome = tokio::spawn(async move { suggester.suggest(&prompt).await }).await;

        let (digest, phase) = match outcome {
            Ok(Ok(digest)) => (digest, Phase::Ready),
            Ok(Err(e)) => {
                warn!(error = %e, "submit: suggestions unavailable, using error digest");
                (SuggestionDigest::new(&self.config.generation_error_message), Phase::Ready)
            }
            Err(e) => {
                warn!(error = %e, "submit: suggestion task failed");
                (SuggestionDigest::new(&self.config.generation_error_message), Phase::Error)
            }
        };

        if !self.is_current(token) {
            debug!(%token, "submit: superseded after suggestions");
            return Err(SessionError::Superseded);
        }

        let mut result = SessionState {
            phase,
            query: query.to_string(),
            location: location.to_string(),
            digest: Some(digest),
            ..Default::default()
        };

        if phase == Phase::Ready && !location.is_empty() {
            debug!("submit: searching events");
            let (matching, nearby) = tokio::join!(
                self.search.search(query, location),
                self.search.search("", location)
            );
            result.suggestion_events = bookable(matching)
                .into_iter()
                .take(self.config.max_suggestion_events)
                .collect();
            result.top_venues = ranker::rank(&nearby, self.config.top_venues);
        } else {
            debug!(?phase, "submit: skipping event search");
        }

        let mut control = lock(&self.control);
        if control.in_flight != Some(token) {
            debug!(%token, "submit: superseded after search");
            return Err(SessionError::Superseded);
        }
        control.in_flight = None;
        result.last_shared_event_id = self.state_tx.borrow().last_shared_event_id.clone();
        self.state_tx.send_replace(result.clone());
        info!(
            phase = ?result.phase,
            events = result.suggestion_events.len(),
            venues = result.top_venues.len(),
            "submit: complete"
        );
        Ok(result)
    }

    /// Reset to an empty idle state, dropping any in-flight request and share indicator
    pub fn clear(&self) {
        debug!("clear: called");
        let mut control = lock(&self.control);
        control.in_flight = None;
        control.cancel_share_timer();
        self.state_tx.send_replace(SessionState::default());
    }

    /// Copy a booking URL and flag the event as just shared
    ///
    /// The flag resets after the configured indicator duration. On clipboard
    /// failure nothing changes and the error is returned after logging.
    pub async fn share(&self, event_id: &str, url: &str) -> Result<(), ClipboardError> {
        debug!(%event_id, %url, "share: called");
        if let Err(e) = self.clipboard.write_text(url).await {
            warn!(error = %e, %event_id, "share: clipboard write failed");
            return Err(e);
        }

        let token = Uuid::now_v7();
        let deadline = Instant::now() + self.config.share_indicator();
        let mut control = lock(&self.control);
        control.cancel_share_timer();
        self.state_tx
            .send_modify(|state| state.last_shared_event_id = Some(event_id.to_string()));

        let timer_control = Arc::clone(&self.control);
        let state_tx = Arc::clone(&self.state_tx);
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let mut control = lock(&timer_control);
            if control.share.as_ref().map(|t| t.token) != Some(token) {
                debug!(%token, "share timer: stale, ignoring");
                return;
            }
            control.share = None;
            state_tx.send_modify(|state| state.last_shared_event_id = None);
            debug!(%token, "share timer: indicator reset");
        });
        control.share = Some(ShareTimer { token, handle });
        Ok(())
    }
}

impl Drop for PlanningSession {
    fn drop(&mut self) {
        lock(&self.control).cancel_share_timer();
    }
}
