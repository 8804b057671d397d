//! Request handling for the events endpoint.
//!
//! `GET` runs the pipeline (resolve window, fetch, normalize), `OPTIONS`
//! answers CORS preflight. Every failure becomes a JSON error envelope.

use chrono::{DateTime, Utc};
use lambda_http::http::Method;
use lambda_http::{Body, Request, RequestExt, Response};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::google::EventSource;
use crate::http::{cached_json_response, error_response, message_response, preflight_response};
use crate::models::EventsResponse;
use crate::normalize::{normalize, NormalizeOptions};
use crate::window::QueryWindow;
use crate::Result;

/// Per-process state shared by every invocation.
pub struct Gateway<S> {
    config: Config,
    source: S,
}

impl<S: EventSource> Gateway<S> {
    pub fn new(config: Config, source: S) -> Self {
        Self { config, source }
    }

    /// Resolve the window, fetch once, normalize.
    pub async fn events(
        &self,
        time_min: Option<&str>,
        time_max: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<EventsResponse> {
        let target = self.config.target()?;
        let window = QueryWindow::resolve(time_min, time_max, now);

        let items = self.source.list_events(&target, &window).await?;

        let options = NormalizeOptions {
            description_max_chars: self.config.description_max_chars,
        };
        let events = normalize(&items, &options);

        if events.len() < items.len() {
            warn!("Dropped {} malformed events", items.len() - events.len());
        }

        Ok(EventsResponse { events })
    }

    /// Lambda entrypoint for one HTTP request.
    pub async fn handle(&self, event: Request) -> std::result::Result<Response<Body>, lambda_http::Error> {
        match event.method() {
            &Method::OPTIONS => preflight_response(),
            &Method::GET => {
                let params = event.query_string_parameters();
                let time_min = params.first("timeMin");
                let time_max = params.first("timeMax");

                match self.events(time_min, time_max, Utc::now()).await {
                    Ok(body) => {
                        info!("Returning {} events", body.events.len());
                        cached_json_response(&body, self.config.cache_max_age)
                    }
                    Err(e) => {
                        error!("Events request failed: {}", e);
                        error_response(&e)
                    }
                }
            }
            _ => message_response(405, "Method not allowed"),
        }
    }
}
