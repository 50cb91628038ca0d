//! Timestamp text forms shared by the HTTP boundary and the upstream decoder.
//!
//! Output uses `YYYY-MM-DD HH:MM:SS[.ffffff]+HH:MM`. Input is accepted in any of
//! the common offset-bearing layouts; text without an explicit offset is
//! rejected so callers can substitute their own default.

use serde::{de, Deserialize, Deserializer, Serializer};
use time::{
    format_description::well_known::{Iso8601, Rfc2822, Rfc3339},
    macros::format_description,
    OffsetDateTime, UtcOffset,
};

/// Parse `raw` into a UTC instant, or `None` when it is empty, unparseable or
/// carries no offset.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed = OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(raw, &Rfc2822))
        .or_else(|_| OffsetDateTime::parse(raw, &Iso8601::DEFAULT))
        .ok()
        .or_else(|| parse_lenient(raw))?;

    Some(parsed.to_offset(UtcOffset::UTC))
}

fn parse_lenient(raw: &str) -> Option<OffsetDateTime> {
    let layouts = [
        format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        ),
        format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
        ),
        format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]"
        ),
        format_description!(
            "[year]-[month]-[day] [hour]:[minute][offset_hour sign:mandatory]:[offset_minute]"
        ),
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute][offset_hour sign:mandatory]:[offset_minute]"
        ),
        format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory][offset_minute]"
        ),
    ];

    layouts
        .into_iter()
        .find_map(|layout| OffsetDateTime::parse(raw, layout).ok())
}

pub fn format_timestamp(ts: OffsetDateTime) -> String {
    let formatted = if ts.nanosecond() == 0 {
        ts.format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        ))
    } else {
        ts.format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6][offset_hour sign:mandatory]:[offset_minute]"
        ))
    };
    // Every component above is always formattable for a valid OffsetDateTime.
    formatted.unwrap_or_else(|_| ts.to_string())
}

pub fn serialize<S: Serializer>(ts: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(*ts))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| de::Error::custom(format!("unrecognised timestamp `{raw}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn accepts_common_offset_layouts() {
        let expected = datetime!(2024-01-01 06:00:00 UTC);
        for raw in [
            "2024-01-01T06:00:00Z",
            "2024-01-01T06:00:00+00:00",
            "2024-01-01T01:00:00-05:00",
            "2024-01-01 06:00:00+00:00",
            "2024-01-01 07:00:00+01:00",
            "2024-01-01 06:00+00:00",
            "2024-01-01T06:00+00:00",
            "Mon, 01 Jan 2024 06:00:00 +0000",
        ] {
            assert_eq!(parse_timestamp(raw), Some(expected), "layout {raw}");
        }
    }

    #[test]
    fn accepts_fractional_seconds() {
        assert_eq!(
            parse_timestamp("2024-01-01 06:00:00.250000+00:00"),
            Some(datetime!(2024-01-01 06:00:00.25 UTC))
        );
    }

    #[test]
    fn rejects_naive_and_garbage_input() {
        assert_eq!(parse_timestamp("2024-01-01T06:00:00"), None);
        assert_eq!(parse_timestamp("2024-01-01 06:00:00"), None);
        assert_eq!(parse_timestamp("2024-01-01"), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("   "), None);
    }

    #[test]
    fn parsed_values_are_normalised_to_utc() {
        let ts = parse_timestamp("2024-01-01T01:00:00-05:00").unwrap();
        assert_eq!(ts.offset(), UtcOffset::UTC);
    }

    #[test]
    fn formats_like_a_python_datetime() {
        assert_eq!(
            format_timestamp(datetime!(2024-01-01 06:00:00 UTC)),
            "2024-01-01 06:00:00+00:00"
        );
        assert_eq!(
            format_timestamp(datetime!(2024-01-01 06:00:00.5 -5)),
            "2024-01-01 06:00:00.500000-05:00"
        );
    }
}
