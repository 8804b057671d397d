//! Shared library for the calendar events gateway Lambda.
//!
//! Resolves a query window, fetches events from Google Calendar and maps them
//! into the shape the calendar widget renders, including flyer inference.

pub mod config;
pub mod error;
pub mod flyer;
pub mod gateway;
pub mod google;
pub mod http;
pub mod models;
pub mod normalize;
pub mod secrets;
pub mod window;

pub use config::{CalendarTarget, Config};
pub use error::{Error, ErrorBody, Result};
pub use gateway::Gateway;
pub use google::{EventSource, GoogleCalendarClient};
pub use models::{EventsResponse, NormalizedEvent, RawCalendarItem};
pub use normalize::{normalize, normalize_item, NormalizeOptions};
pub use window::QueryWindow;
