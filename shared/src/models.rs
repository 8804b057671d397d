//! Upstream and consumer-facing event models.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::{Error, Result};

/// Events list response from the Google Calendar API.
///
/// Items that do not decode are dropped one by one instead of failing
/// the whole page.
#[derive(Debug, Default, Deserialize)]
pub struct RawEventsResponse {
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<RawCalendarItem>,
}

/// Google Calendar event as returned by the events endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCalendarItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: RawEventTime,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end: RawEventTime,
    pub html_link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<RawAttachment>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_items<'de, D>(deserializer: D) -> std::result::Result<Vec<RawCalendarItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Vec<serde_json::Value> = null_as_default(deserializer)?;

    Ok(values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawCalendarItem>(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping undecodable event: {}", e);
                None
            }
        })
        .collect())
}

/// Start or end of a Google Calendar event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
    pub time_zone: Option<String>,
}

/// Drive attachment on a Google Calendar event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttachment {
    pub file_url: Option<String>,
    pub title: Option<String>,
    pub mime_type: Option<String>,
}

/// A validated event boundary: either a whole day or an instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTime {
    /// Date-only value (`2024-05-01`), marks an all-day event.
    Date(String),
    /// Date-time value (`2024-05-01T10:00:00Z`).
    DateTime(String),
}

impl EventTime {
    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventTime::Date(s) | EventTime::DateTime(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            EventTime::Date(s) | EventTime::DateTime(s) => s,
        }
    }
}

impl RawEventTime {
    /// Validate into an [`EventTime`]. `dateTime` wins when both are set;
    /// empty strings count as unset.
    pub fn to_event_time(&self) -> Option<EventTime> {
        let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

        non_empty(&self.date_time)
            .map(EventTime::DateTime)
            .or_else(|| non_empty(&self.date).map(EventTime::Date))
    }
}

impl RawCalendarItem {
    /// Validated start and end, or a malformed-item error.
    pub fn times(&self) -> Result<(EventTime, EventTime)> {
        if self.id.is_empty() {
            return Err(Error::MalformedItem {
                id: "<missing>".to_string(),
                reason: "item has no id".to_string(),
            });
        }
        let start = self.start.to_event_time().ok_or_else(|| Error::MalformedItem {
            id: self.id.clone(),
            reason: "start has neither dateTime nor date".to_string(),
        })?;
        let end = self.end.to_event_time().ok_or_else(|| Error::MalformedItem {
            id: self.id.clone(),
            reason: "end has neither dateTime nor date".to_string(),
        })?;
        Ok((start, end))
    }
}

/// Event in the shape the calendar widget renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub all_day: bool,
    pub url: String,
    pub extended_props: ExtendedProps,
}

/// Extra event data surfaced to the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendedProps {
    pub location: String,
    pub description: String,
    pub flyer: Option<String>,
}

/// Successful response body.
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<NormalizedEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_day_item() {
        let json = r#"{
            "id": "abc",
            "summary": "Festival",
            "start": {"date": "2024-05-01"},
            "end": {"date": "2024-05-02"},
            "htmlLink": "https://www.google.com/calendar/event?eid=abc",
            "attachments": [{"fileUrl": "https://drive.google.com/open?id=1", "title": "flyer.png"}]
        }"#;
        let item: RawCalendarItem = serde_json::from_str(json).unwrap();

        let (start, end) = item.times().unwrap();
        assert_eq!(start, EventTime::Date("2024-05-01".to_string()));
        assert!(start.is_all_day());
        assert_eq!(end.as_str(), "2024-05-02");
        assert_eq!(item.attachments.len(), 1);
        assert_eq!(
            item.attachments[0].file_url.as_deref(),
            Some("https://drive.google.com/open?id=1")
        );
    }

    #[test]
    fn test_date_time_wins_over_date() {
        let time = RawEventTime {
            date_time: Some("2024-05-01T10:00:00Z".to_string()),
            date: Some("2024-05-01".to_string()),
            time_zone: None,
        };
        assert_eq!(
            time.to_event_time(),
            Some(EventTime::DateTime("2024-05-01T10:00:00Z".to_string()))
        );
    }

    #[test]
    fn test_missing_start_is_malformed() {
        let item: RawCalendarItem =
            serde_json::from_str(r#"{"id": "x", "start": {"dateTime": ""}, "end": {"date": "2024-05-02"}}"#)
                .unwrap();
        let err = item.times().unwrap_err();
        assert!(matches!(err, Error::MalformedItem { ref id, .. } if id == "x"));
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let json = r#"{
            "items": [{
                "id": "a",
                "start": {"dateTime": "2024-06-01T20:00:00Z"},
                "end": {"dateTime": "2024-06-01T23:00:00Z"},
                "attachments": null
            }]
        }"#;
        let response: RawEventsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.items.len(), 1);
        assert!(response.items[0].attachments.is_empty());

        let response: RawEventsResponse = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_undecodable_item_skipped_rest_kept() {
        let json = r#"{
            "items": [
                {"id": "a", "start": {"date": "2024-05-01"}, "end": {"date": "2024-05-02"}},
                {"id": "b", "start": "tomorrow", "end": {"date": "2024-05-02"}},
                {"summary": "no id", "start": {"date": "2024-05-01"}, "end": {"date": "2024-05-02"}},
                {"id": "c", "start": {"date": "2024-05-03"}, "end": {"date": "2024-05-04"}}
            ]
        }"#;
        let response: RawEventsResponse = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = response.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "", "c"]);

        let err = response.items[1].times().unwrap_err();
        assert!(matches!(err, Error::MalformedItem { ref reason, .. } if reason == "item has no id"));
    }

    #[test]
    fn test_response_without_items() {
        let response: RawEventsResponse = serde_json::from_str(r#"{"kind": "calendar#events"}"#).unwrap();
        assert!(response.items.is_empty());
    }
}
