use std::collections::HashSet;

use iso_client::domain::GenerationDatum;
use time::macros::datetime;

use crate::upstream::GenerationRecord;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TransformError {
    #[error("record for {found} returned for authority {expected}")]
    AuthorityMismatch { expected: String, found: String },
    #[error("timestamp out of allowed range")]
    TimestampOutOfRange,
    #[error("gen_MW {0} is not a representable integer")]
    UnrepresentableMw(f64),
}

/// Pure validation of an upstream generation record.
///
/// Rules:
/// - the record must belong to the authority it was requested for;
/// - ts must be within a broad sanity window [2000-01-01, 2100-01-01];
/// - gen_MW must be finite and fit the integer column once rounded.
pub fn validate_generation_record(
    authority: &str,
    rec: &GenerationRecord,
) -> Result<(), TransformError> {
    if rec.ba_name != authority {
        return Err(TransformError::AuthorityMismatch {
            expected: authority.to_string(),
            found: rec.ba_name.clone(),
        });
    }

    let min_ts = datetime!(2000-01-01 00:00:00 UTC);
    let max_ts = datetime!(2100-01-01 00:00:00 UTC);

    if rec.timestamp < min_ts || rec.timestamp > max_ts {
        return Err(TransformError::TimestampOutOfRange);
    }

    let mw = rec.gen_mw.round();
    if !mw.is_finite() || mw < i32::MIN as f64 || mw > i32::MAX as f64 {
        return Err(TransformError::UnrepresentableMw(rec.gen_mw));
    }

    Ok(())
}

/// Turn the upstream shape into a storable datum (`ba_name` becomes
/// `authority_code`, `freq` becomes `frequency`, MW is rounded).
pub fn to_generation_datum(rec: GenerationRecord) -> GenerationDatum {
    GenerationDatum {
        authority_code: rec.ba_name,
        timestamp: rec.timestamp,
        fuel_name: rec.fuel_name,
        gen_mw: rec.gen_mw.round() as i32,
        frequency: rec.freq,
        market: rec.market,
    }
}

/// Validate, convert and deduplicate upstream records for one authority.
///
/// The first record seen for an identity wins; later duplicates and invalid
/// records are dropped.
pub fn merge_generation<I>(authority: &str, records: I) -> Vec<GenerationDatum>
where
    I: IntoIterator<Item = GenerationRecord>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for rec in records {
        if let Err(e) = validate_generation_record(authority, &rec) {
            metrics::counter!("validation_generation_rejected_total").increment(1);
            tracing::warn!(error = %e, authority, fuel = %rec.fuel_name, "dropping upstream generation record");
            continue;
        }

        let datum = to_generation_datum(rec);
        if seen.insert(datum.key()) {
            merged.push(datum);
        }
    }

    merged
}
