//! Configuration management for the events gateway.

use std::env;

use tracing::warn;

use crate::{Error, Result};

/// Default upstream base URL.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Default freshness window for `Cache-Control`, in seconds.
pub const DEFAULT_CACHE_MAX_AGE: u64 = 300;

/// Default description length cap, in characters.
pub const DEFAULT_DESCRIPTION_MAX_CHARS: usize = 1000;

/// Application configuration, built once at cold start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Calendar API key
    pub api_key: Option<String>,
    /// Google Calendar identifier
    pub calendar_id: Option<String>,
    /// ARN of a secret holding the API key, used when `api_key` is absent
    pub api_key_secret_arn: Option<String>,
    /// Upstream API base URL
    pub api_base: String,
    /// `max-age`/`s-maxage` advertised on successful responses
    pub cache_max_age: u64,
    /// Description truncation, `None` to emit descriptions untouched
    pub description_max_chars: Option<usize>,
}

/// Credential and calendar identifier for one upstream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarTarget<'a> {
    pub api_key: &'a str,
    pub calendar_id: &'a str,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            calendar_id: None,
            api_key_secret_arn: None,
            api_base: DEFAULT_API_BASE.to_string(),
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
            description_max_chars: Some(DEFAULT_DESCRIPTION_MAX_CHARS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let cache_max_age = match var("CACHE_MAX_AGE_SECONDS") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Invalid CACHE_MAX_AGE_SECONDS '{}', using {}", raw, DEFAULT_CACHE_MAX_AGE);
                DEFAULT_CACHE_MAX_AGE
            }),
            None => DEFAULT_CACHE_MAX_AGE,
        };

        let description_max_chars = match var("DESCRIPTION_MAX_CHARS") {
            Some(raw) if raw.eq_ignore_ascii_case("none") => None,
            Some(raw) => match raw.parse::<usize>() {
                Ok(0) => None,
                Ok(n) => Some(n),
                Err(_) => {
                    warn!(
                        "Invalid DESCRIPTION_MAX_CHARS '{}', using {}",
                        raw, DEFAULT_DESCRIPTION_MAX_CHARS
                    );
                    Some(DEFAULT_DESCRIPTION_MAX_CHARS)
                }
            },
            None => Some(DEFAULT_DESCRIPTION_MAX_CHARS),
        };

        Self {
            api_key: var("GOOGLE_CALENDAR_API_KEY"),
            calendar_id: var("GOOGLE_CALENDAR_ID"),
            api_key_secret_arn: var("GOOGLE_CALENDAR_API_KEY_SECRET_ARN"),
            api_base: var("GOOGLE_CALENDAR_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            cache_max_age,
            description_max_chars,
        }
    }

    /// Credential and calendar id, or a configuration error if either is missing.
    pub fn target(&self) -> Result<CalendarTarget<'_>> {
        match (self.api_key.as_deref(), self.calendar_id.as_deref()) {
            (Some(api_key), Some(calendar_id)) => Ok(CalendarTarget { api_key, calendar_id }),
            (None, Some(_)) => Err(Error::Config("GOOGLE_CALENDAR_API_KEY not set".to_string())),
            (Some(_), None) => Err(Error::Config("GOOGLE_CALENDAR_ID not set".to_string())),
            (None, None) => Err(Error::Config(
                "GOOGLE_CALENDAR_API_KEY and GOOGLE_CALENDAR_ID not set".to_string(),
            )),
        }
    }
}
