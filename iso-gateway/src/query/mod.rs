//! Request-window resolution for the time-series endpoints.

use iso_client::domain::TimeRange;
use serde::Deserialize;
use time::{Duration, OffsetDateTime};

use crate::{error::GatewayError, timefmt::parse_timestamp};

/// Default look-back when `start_at` is absent or unusable.
pub const DEFAULT_WINDOW: Duration = Duration::days(1);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowParams {
    pub start_at: Option<String>,
    pub end_at: Option<String>,
}

impl WindowParams {
    /// Resolve to a concrete range.
    ///
    /// Missing, unparseable and offset-less values fall back to `now - 1 day`
    /// and `now`; only an inverted result is an error.
    pub fn resolve(&self, now: OffsetDateTime) -> Result<TimeRange, GatewayError> {
        let start = self
            .start_at
            .as_deref()
            .and_then(parse_query_timestamp)
            .unwrap_or(now - DEFAULT_WINDOW);
        let end = self
            .end_at
            .as_deref()
            .and_then(parse_query_timestamp)
            .unwrap_or(now);

        Ok(TimeRange::new(start, end)?)
    }
}

/// Like [`parse_timestamp`], but also repairs a `+HH:MM` offset whose `+` was
/// decoded to a space by an unescaped query string.
pub fn parse_query_timestamp(raw: &str) -> Option<OffsetDateTime> {
    parse_timestamp(raw).or_else(|| {
        let raw = raw.trim();
        let split = raw.len().checked_sub(6).filter(|i| raw.is_char_boundary(*i))?;
        let (head, offset) = raw.split_at(split);
        let digits = offset.strip_prefix(' ')?;
        parse_timestamp(&format!("{}+{digits}", head.trim_end()))
    })
}
