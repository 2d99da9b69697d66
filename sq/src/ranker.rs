//! Venue ranking by event occurrence
//!
//! A streaming group-by over venue names. Buckets live in an insertion-ordered
//! map and are sorted with a stable sort, so venues with equal counts keep the
//! order in which they were first seen.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::events::Event;

/// Venues returned when no limit is given
pub const DEFAULT_LIMIT: usize = 3;

/// One venue and how often it appeared
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueRanking {
    pub venue_name: String,
    /// First event seen at this venue
    pub representative_event: Event,
    /// Always at least 1
    pub occurrence_count: usize,
}

/// Top `limit` venues by number of events, most frequent first
///
/// Events without a venue are ignored. Ties keep first-seen order.
pub fn rank(events: &[Event], limit: usize) -> Vec<VenueRanking> {
    debug!(events = events.len(), limit, "rank: called");
    let mut buckets: IndexMap<&str, VenueRanking> = IndexMap::new();

    for event in events {
        let Some(venue) = event.venue_name.as_deref() else {
            continue;
        };
        buckets
            .entry(venue)
            .and_modify(|bucket| bucket.occurrence_count += 1)
            .or_insert_with(|| VenueRanking {
                venue_name: venue.to_string(),
                representative_event: event.clone(),
                occurrence_count: 1,
            });
    }

    let mut ranked: Vec<VenueRanking> = buckets.into_values().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.occurrence_count.cmp(&a.occurrence_count));
    ranked.truncate(limit);

    debug!(venues = ranked.len(), "rank: done");
    ranked
}
