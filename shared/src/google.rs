//! Google Calendar events API client.

use std::future::Future;

use tracing::{error, info};
use url::Url;

use crate::config::CalendarTarget;
use crate::models::{RawCalendarItem, RawEventsResponse};
use crate::window::QueryWindow;
use crate::{Error, Result};

/// Upper bound on events returned by a single upstream page.
pub const MAX_RESULTS: u32 = 2500;

/// Projection limiting the upstream payload to what normalization reads.
pub const EVENT_FIELDS: &str =
    "items(id,htmlLink,summary,description,location,start,end,attachments(fileUrl))";

/// Where events come from.
pub trait EventSource {
    /// Fetch the events of one calendar within the window.
    fn list_events(
        &self,
        target: &CalendarTarget<'_>,
        window: &QueryWindow,
    ) -> impl Future<Output = Result<Vec<RawCalendarItem>>> + Send;
}

/// Build the events list URL for a calendar and window.
pub fn events_url(api_base: &str, target: &CalendarTarget<'_>, window: &QueryWindow) -> Result<Url> {
    let raw = format!(
        "{}/calendars/{}/events",
        api_base.trim_end_matches('/'),
        urlencoding::encode(target.calendar_id)
    );
    let mut url = Url::parse(&raw).map_err(|e| Error::Config(format!("Invalid API base '{}': {}", api_base, e)))?;

    url.query_pairs_mut()
        .append_pair("key", target.api_key)
        .append_pair("singleEvents", "true")
        .append_pair("orderBy", "startTime")
        .append_pair("maxResults", &MAX_RESULTS.to_string())
        .append_pair("timeMin", &window.time_min())
        .append_pair("timeMax", &window.time_max())
        .append_pair("fields", EVENT_FIELDS);

    Ok(url)
}

/// [`EventSource`] backed by the Google Calendar REST API.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    api_base: String,
}

impl GoogleCalendarClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_base)
    }

    pub fn with_client(http_client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            http_client,
            api_base: api_base.into(),
        }
    }
}

impl EventSource for GoogleCalendarClient {
    async fn list_events(
        &self,
        target: &CalendarTarget<'_>,
        window: &QueryWindow,
    ) -> Result<Vec<RawCalendarItem>> {
        let url = events_url(&self.api_base, target, window)?;

        info!(
            "Fetching events for {} from {} to {}",
            target.calendar_id,
            window.time_min(),
            window.time_max()
        );

        let response = self.http_client.get(url).send().await.map_err(|e| {
            let err = Error::from(e);
            error!("Calendar API request failed: {}", err);
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Calendar API error {}: {}", status, body);
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: RawEventsResponse =
            serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))?;

        info!("Calendar API returned {} events", parsed.items.len());
        Ok(parsed.items)
    }
}
