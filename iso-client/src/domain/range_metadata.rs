use std::fmt;

use time::OffsetDateTime;

/// Series whose local copy is tracked by [`RangeMetadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Generation,
}

impl DataType {
    /// Value stored in the `data_type` column; matches the datum table name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Generation => "generation",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("range end {end} is before start {start}")]
pub struct RangeError {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

/// An ordered pair of instants, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: OffsetDateTime,
    end: OffsetDateTime,
}

impl TimeRange {
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError { start, end });
        }
        Ok(Self { start, end })
    }

    /// The range between two instants, whichever order they come in.
    pub fn spanning(a: OffsetDateTime, b: OffsetDateTime) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn start(&self) -> OffsetDateTime {
        self.start
    }

    pub fn end(&self) -> OffsetDateTime {
        self.end
    }

    /// Whether `ts` lies in the half-open interval `[start, end)`.
    pub fn contains_half_open(&self, ts: OffsetDateTime) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Whether `ts` lies in the closed interval `[start, end]`.
    pub fn contains(&self, ts: OffsetDateTime) -> bool {
        self.start <= ts && ts <= self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// The contiguous interval of a series already held in the local store.
///
/// Every upstream record for `(authority_code, data_type)` with a timestamp in
/// `[least_recent, most_recent]` is present locally.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RangeMetadata {
    pub authority_code: String,
    pub data_type: String,
    pub least_recent: OffsetDateTime,
    pub most_recent: OffsetDateTime,
}

impl RangeMetadata {
    pub fn new(authority_code: &str, data_type: DataType, range: TimeRange) -> Self {
        Self {
            authority_code: authority_code.to_string(),
            data_type: data_type.as_str().to_string(),
            least_recent: range.start(),
            most_recent: range.end(),
        }
    }

    pub fn range(&self) -> Result<TimeRange, RangeError> {
        TimeRange::new(self.least_recent, self.most_recent)
    }

    /// Union with another interval of the same series. Never shrinks.
    pub fn widened(&self, other: &RangeMetadata) -> RangeMetadata {
        RangeMetadata {
            authority_code: self.authority_code.clone(),
            data_type: self.data_type.clone(),
            least_recent: self.least_recent.min(other.least_recent),
            most_recent: self.most_recent.max(other.most_recent),
        }
    }
}
