//! Session snapshot types

use serde::Serialize;

use crate::events::Event;
use crate::markup::{self, Markup};
use crate::ranker::VenueRanking;
use crate::suggest::SuggestionDigest;

/// Request lifecycle phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Immutable snapshot of a planning session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub phase: Phase,
    pub query: String,
    pub location: String,
    pub digest: Option<SuggestionDigest>,
    /// Bookable events matching the query, in provider order
    pub suggestion_events: Vec<Event>,
    /// Most frequent venues near the location
    pub top_venues: Vec<VenueRanking>,
    /// Event whose link was just copied; cleared after a short delay
    pub last_shared_event_id: Option<String>,
}

impl SessionState {
    pub(crate) fn loading(query: &str, location: &str) -> Self {
        Self {
            phase: Phase::Loading,
            query: query.to_string(),
            location: location.to_string(),
            ..Default::default()
        }
    }

    /// Digest as a markup tree, if there is one
    pub fn rendered_digest(&self) -> Option<Markup> {
        self.digest.as_ref().map(|d| markup::render(d.as_str()))
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
            && self.digest.is_none()
            && self.suggestion_events.is_empty()
            && self.top_venues.is_empty()
            && self.last_shared_event_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert!(SessionState::default().is_idle());
    }

    #[test]
    fn test_loading_keeps_inputs_only() {
        let state = SessionState::loading("bowling", "Austin");
        assert_eq!(state.phase, Phase::Loading);
        assert_eq!(state.query, "bowling");
        assert_eq!(state.location, "Austin");
        assert!(state.digest.is_none());
    }

    #[test]
    fn test_rendered_digest() {
        let state = SessionState {
            digest: Some(SuggestionDigest::new("* a\n* b")),
            ..Default::default()
        };
        assert!(matches!(state.rendered_digest(), Some(Markup::List(items)) if items.len() == 2));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(SessionState::loading("q", "l")).unwrap();
        assert_eq!(json["phase"], "loading");
        assert!(json["suggestionEvents"].is_array());
        assert!(json["lastSharedEventId"].is_null());
    }
}
