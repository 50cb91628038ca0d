//! Deciding what to fetch for a requested window, given the cached interval.
//!
//! Checks run in a fixed order: uncached, covered, extend-older, extend-newer,
//! extend-both. A request disjoint from the cache lands in extend-older or
//! extend-newer, and the fetch runs from the request edge up to the cached
//! edge, so the gap is filled and the cached interval stays contiguous.

use iso_client::domain::{DataType, RangeMetadata, TimeRange};
use time::Duration;

/// How far `most_recent` may trail a requested end and still count as covered.
pub const COVERAGE_SLACK: Duration = Duration::minutes(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileCase {
    Uncached,
    Covered,
    ExtendOlder,
    ExtendNewer,
    ExtendBoth,
}

impl ReconcileCase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileCase::Uncached => "uncached",
            ReconcileCase::Covered => "covered",
            ReconcileCase::ExtendOlder => "extend_older",
            ReconcileCase::ExtendNewer => "extend_newer",
            ReconcileCase::ExtendBoth => "extend_both",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan {
    pub case: ReconcileCase,
    /// Half-open `[start, end)` windows to request upstream, in call order.
    pub fetches: Vec<TimeRange>,
    /// Metadata to store once every fetch has been merged.
    pub metadata: RangeMetadata,
}

pub fn plan(
    authority: &str,
    data_type: DataType,
    existing: Option<&RangeMetadata>,
    requested: TimeRange,
) -> ReconcilePlan {
    let (start, end) = (requested.start(), requested.end());

    let Some(meta) = existing else {
        return ReconcilePlan {
            case: ReconcileCase::Uncached,
            fetches: vec![requested],
            metadata: RangeMetadata::new(authority, data_type, requested),
        };
    };

    let (least, most) = (meta.least_recent, meta.most_recent);
    let mut metadata = meta.clone();

    if most + COVERAGE_SLACK >= end && least <= start {
        return ReconcilePlan {
            case: ReconcileCase::Covered,
            fetches: Vec::new(),
            metadata,
        };
    }

    if most >= end && least > start {
        metadata.least_recent = start;
        return ReconcilePlan {
            case: ReconcileCase::ExtendOlder,
            fetches: vec![TimeRange::spanning(start, least)],
            metadata,
        };
    }

    if most < end && least <= start {
        metadata.most_recent = end;
        return ReconcilePlan {
            case: ReconcileCase::ExtendNewer,
            fetches: vec![TimeRange::spanning(most, end)],
            metadata,
        };
    }

    // least > start && most < end: the request strictly contains the cache.
    metadata.least_recent = start;
    metadata.most_recent = end;
    ReconcilePlan {
        case: ReconcileCase::ExtendBoth,
        fetches: vec![TimeRange::spanning(least, end), TimeRange::spanning(start, most)],
        metadata,
    }
}
