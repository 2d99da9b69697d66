//! Event model and provider-response normalization
//!
//! Providers disagree on where venue, date and image live. Everything past
//! [`normalize_response`] only ever sees the flat [`Event`].

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// A normalized event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub venue_name: Option<String>,
    pub start_date_time: Option<DateTime<Utc>>,
    pub booking_url: Option<String>,
    pub image_url: Option<String>,
}

impl Event {
    /// Event with only id and name set
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            venue_name: None,
            start_date_time: None,
            booking_url: None,
            image_url: None,
        }
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue_name = Some(venue.into());
        self
    }

    pub fn with_booking_url(mut self, url: impl Into<String>) -> Self {
        self.booking_url = Some(url.into());
        self
    }

    pub fn is_bookable(&self) -> bool {
        self.booking_url.is_some()
    }
}

/// Keep only events with a booking URL, preserving order
pub fn bookable(events: Vec<Event>) -> Vec<Event> {
    debug!(count = events.len(), "bookable: called");
    events.into_iter().filter(Event::is_bookable).collect()
}

// Raw provider shapes. Every field is optional; a missing key and an explicit
// null both mean absent.

#[derive(Debug, Default, Deserialize)]
struct RawResponse {
    #[serde(rename = "_embedded")]
    embedded: Option<RawEmbeddedEvents>,
    events: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEmbeddedEvents {
    events: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: Option<String>,
    name: Option<String>,
    url: Option<String>,
    images: Option<Vec<RawImage>>,
    dates: Option<RawDates>,
    #[serde(rename = "_embedded")]
    embedded: Option<RawEventEmbedded>,
    venues: Option<Vec<RawVenue>>,
    venue: Option<RawFlatVenue>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDates {
    start: Option<RawStart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStart {
    date_time: Option<String>,
    local_date: Option<String>,
    local_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEventEmbedded {
    venues: Option<Vec<RawVenue>>,
}

#[derive(Debug, Deserialize)]
struct RawVenue {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFlatVenue {
    Named(RawVenue),
    Plain(String),
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl RawStart {
    /// Exact instant when present, else local date (and time) read as UTC
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        if let Some(dt) = self.date_time.as_deref()
            && let Ok(parsed) = DateTime::parse_from_rfc3339(dt)
        {
            return Some(parsed.with_timezone(&Utc));
        }

        let date = NaiveDate::parse_from_str(self.local_date.as_deref()?, "%Y-%m-%d").ok()?;
        let time = self
            .local_time
            .as_deref()
            .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M:%S").ok())
            .unwrap_or_default();
        Some(date.and_time(time).and_utc())
    }
}

impl RawEvent {
    fn venue_name(&mut self) -> Option<String> {
        let nested = self
            .embedded
            .take()
            .and_then(|e| e.venues)
            .and_then(|v| v.into_iter().next())
            .and_then(|v| v.name);
        if nested.is_some() {
            return non_blank(nested);
        }

        let listed = self.venues.take().and_then(|v| v.into_iter().next()).and_then(|v| v.name);
        if listed.is_some() {
            return non_blank(listed);
        }

        match self.venue.take() {
            Some(RawFlatVenue::Named(v)) => non_blank(v.name),
            Some(RawFlatVenue::Plain(name)) => non_blank(Some(name)),
            None => None,
        }
    }

    fn normalize(mut self) -> Option<Event> {
        let id = non_blank(self.id.take())?;
        let name = non_blank(self.name.take())?;
        let venue_name = self.venue_name();
        let start_date_time = self.dates.as_ref().and_then(|d| d.start.as_ref()).and_then(RawStart::to_utc);
        let image_url = non_blank(
            self.images
                .take()
                .and_then(|images| images.into_iter().next())
                .and_then(|i| i.url),
        );

        Some(Event {
            id,
            name,
            venue_name,
            start_date_time,
            booking_url: non_blank(self.url),
            image_url,
        })
    }
}

/// Flatten a provider response into events, in provider order
///
/// A missing event collection yields an empty list. Entries that fail to
/// decode or lack an id or name are skipped.
pub fn normalize_response(body: Value) -> Result<Vec<Event>, serde_json::Error> {
    debug!("normalize_response: called");
    let raw: RawResponse = if body.is_null() {
        RawResponse::default()
    } else {
        serde_json::from_value(body)?
    };

    let entries = match (raw.embedded, raw.events) {
        (Some(embedded), _) => embedded.events.unwrap_or_default(),
        (None, Some(events)) => events,
        (None, None) => {
            debug!("normalize_response: no event collection");
            Vec::new()
        }
    };

    let mut events = Vec::with_capacity(entries.len());
    for entry in entries {
        match serde_json::from_value::<RawEvent>(entry) {
            Ok(raw_event) => match raw_event.normalize() {
                Some(event) => events.push(event),
                None => debug!("normalize_response: skipping event without id or name"),
            },
            Err(e) => warn!(error = %e, "normalize_response: skipping undecodable event"),
        }
    }

    debug!(count = events.len(), "normalize_response: done");
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_nested_ticketmaster_shape() {
        let body = json!({
            "_embedded": { "events": [{
                "id": "G5v",
                "name": "Jazz Night",
                "url": "https://tickets.example/G5v",
                "images": [{ "url": "https://img.example/1.jpg" }, { "url": "https://img.example/2.jpg" }],
                "dates": { "start": { "dateTime": "2026-11-01T03:30:00Z", "localDate": "2026-10-31" } },
                "_embedded": { "venues": [{ "name": "The Crocodile" }, { "name": "Other" }] }
            }]},
            "page": { "totalElements": 1 }
        });

        let events = normalize_response(body).unwrap();

        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!(e.id, "G5v");
        assert_eq!(e.venue_name.as_deref(), Some("The Crocodile"));
        assert_eq!(e.booking_url.as_deref(), Some("https://tickets.example/G5v"));
        assert_eq!(e.image_url.as_deref(), Some("https://img.example/1.jpg"));
        assert_eq!(e.start_date_time, Some(Utc.with_ymd_and_hms(2026, 11, 1, 3, 30, 0).unwrap()));
    }

    #[test]
    fn test_flat_venue_shapes() {
        let body = json!({ "events": [
            { "id": "1", "name": "A", "venue": { "name": "Hall" } },
            { "id": "2", "name": "B", "venue": "Park" },
            { "id": "3", "name": "C", "venues": [{ "name": "Club" }] },
            { "id": "4", "name": "D" }
        ]});

        let venues: Vec<_> = normalize_response(body)
            .unwrap()
            .into_iter()
            .map(|e| e.venue_name)
            .collect();

        assert_eq!(
            venues,
            vec![Some("Hall".to_string()), Some("Park".to_string()), Some("Club".to_string()), None]
        );
    }

    #[test]
    fn test_local_date_fallback() {
        let body = json!({ "events": [
            { "id": "1", "name": "A", "dates": { "start": { "localDate": "2026-12-24", "localTime": "19:00:00" } } },
            { "id": "2", "name": "B", "dates": { "start": { "localDate": "2026-12-25" } } },
            { "id": "3", "name": "C", "dates": { "start": { "dateTime": "not a date" } } }
        ]});

        let events = normalize_response(body).unwrap();

        assert_eq!(events[0].start_date_time, Some(Utc.with_ymd_and_hms(2026, 12, 24, 19, 0, 0).unwrap()));
        assert_eq!(events[1].start_date_time, Some(Utc.with_ymd_and_hms(2026, 12, 25, 0, 0, 0).unwrap()));
        assert_eq!(events[2].start_date_time, None);
    }

    #[test]
    fn test_missing_collection_is_empty() {
        assert!(normalize_response(json!({ "page": { "totalElements": 0 } })).unwrap().is_empty());
        assert!(normalize_response(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_explicit_nulls_are_absent() {
        let body = json!({ "_embedded": { "events": [
            { "id": "1", "name": "A", "url": "u1", "images": null, "_embedded": { "venues": [{ "name": "Hall" }] } },
            { "id": "2", "name": "B", "url": "u2", "_embedded": { "venues": null }, "venue": "Park" },
            { "id": "3", "name": "C", "url": "u3", "_embedded": null, "dates": { "start": null }, "venue": null }
        ]}});

        let events = normalize_response(body).unwrap();

        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(events[0].image_url, None);
        assert_eq!(events[0].venue_name.as_deref(), Some("Hall"));
        assert_eq!(events[1].venue_name.as_deref(), Some("Park"));
        assert_eq!(events[2].venue_name, None);
        assert_eq!(events[2].start_date_time, None);
    }

    #[test]
    fn test_null_collection_is_empty() {
        assert!(normalize_response(json!({ "_embedded": { "events": null } })).unwrap().is_empty());
        assert!(normalize_response(json!({ "_embedded": null, "events": null })).unwrap().is_empty());
    }

    #[test]
    fn test_bad_entries_skipped() {
        let body = json!({ "events": [
            { "id": "1", "name": "Good" },
            { "name": "No id" },
            { "id": "3", "name": "   " },
            "not an object",
            { "id": "5", "name": "Also good", "images": "wrong" }
        ]});

        let ids: Vec<_> = normalize_response(body).unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["1".to_string()]);
    }

    #[test]
    fn test_non_object_body_is_error() {
        assert!(normalize_response(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_bookable_filters_and_keeps_order() {
        let events = vec![
            Event::new("1", "A").with_booking_url("u1"),
            Event::new("2", "B"),
            Event::new("3", "C").with_booking_url("u3"),
        ];

        let ids: Vec<_> = bookable(events).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["1".to_string(), "3".to_string()]);
    }
}
