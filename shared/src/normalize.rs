//! Raw Google Calendar items to widget events.

use tracing::warn;

use crate::flyer::resolve_flyer;
use crate::models::{ExtendedProps, NormalizedEvent, RawCalendarItem};
use crate::Result;

/// Title used when an event has no summary.
pub const UNTITLED: &str = "Untitled";

/// Mapping policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Cap on emitted description length, in characters
    pub description_max_chars: Option<usize>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            description_max_chars: Some(crate::config::DEFAULT_DESCRIPTION_MAX_CHARS),
        }
    }
}

/// Map one raw item. Fails only when start or end carries no value.
pub fn normalize_item(item: &RawCalendarItem, options: &NormalizeOptions) -> Result<NormalizedEvent> {
    let (start, end) = item.times()?;

    let title = item
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(UNTITLED)
        .to_string();

    let description = item.description.as_deref().unwrap_or_default();
    // Scan before truncating so late links still count.
    let flyer = resolve_flyer(description, &item.attachments);

    Ok(NormalizedEvent {
        id: item.id.clone(),
        title,
        all_day: start.is_all_day(),
        start: start.into_string(),
        end: end.into_string(),
        url: item.html_link.clone().unwrap_or_default(),
        extended_props: ExtendedProps {
            location: item.location.clone().unwrap_or_default(),
            description: truncate_chars(description, options.description_max_chars),
            flyer,
        },
    })
}

/// Map all items, preserving order. Malformed items are skipped.
pub fn normalize(items: &[RawCalendarItem], options: &NormalizeOptions) -> Vec<NormalizedEvent> {
    items
        .iter()
        .filter_map(|item| match normalize_item(item, options) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("Skipping event: {}", e);
                None
            }
        })
        .collect()
}

fn truncate_chars(text: &str, max_chars: Option<usize>) -> String {
    match max_chars {
        Some(max) => match text.char_indices().nth(max) {
            Some((idx, _)) => text[..idx].to_string(),
            None => text.to_string(),
        },
        None => text.to_string(),
    }
}
