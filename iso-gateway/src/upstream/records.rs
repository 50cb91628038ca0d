//! Records as the upstream grid client reports them.
//!
//! Field names follow the upstream payload, so pass-through endpoints can hand
//! them back unchanged apart from the timestamp, which serializes as text.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub ba_name: String,
    #[serde(with = "crate::timefmt")]
    pub timestamp: OffsetDateTime,
    #[serde(default)]
    pub freq: String,
    #[serde(default)]
    pub market: String,
    pub fuel_name: String,
    #[serde(rename = "gen_MW")]
    pub gen_mw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRecord {
    pub ba_name: String,
    #[serde(with = "crate::timefmt")]
    pub timestamp: OffsetDateTime,
    #[serde(default)]
    pub freq: String,
    #[serde(default)]
    pub market: String,
    #[serde(rename = "load_MW")]
    pub load_mw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub ba_name: String,
    #[serde(with = "crate::timefmt")]
    pub timestamp: OffsetDateTime,
    #[serde(default)]
    pub freq: String,
    #[serde(default)]
    pub market: String,
    #[serde(rename = "net_exp_MW")]
    pub net_exp_mw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LmpRecord {
    pub ba_name: String,
    #[serde(with = "crate::timefmt")]
    pub timestamp: OffsetDateTime,
    #[serde(default)]
    pub freq: String,
    #[serde(default)]
    pub market: String,
    pub node_id: String,
    pub lmp: f64,
    #[serde(default)]
    pub lmp_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn generation_record_decodes_upstream_names() {
        let rec: GenerationRecord = serde_json::from_str(
            r#"{"ba_name":"CAISO","timestamp":"2024-01-01T00:00:00Z","freq":"5m",
                "market":"RT5M","fuel_name":"wind","gen_MW":1234.6}"#,
        )
        .unwrap();
        assert_eq!(rec.timestamp, datetime!(2024-01-01 00:00:00 UTC));
        assert_eq!(rec.gen_mw, 1234.6);
    }

    #[test]
    fn naive_timestamps_are_rejected() {
        let res: Result<LoadRecord, _> = serde_json::from_str(
            r#"{"ba_name":"PJM","timestamp":"2024-01-01T00:00:00","load_MW":1.0}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn pass_through_output_stringifies_timestamp() {
        let rec = LmpRecord {
            ba_name: "PJM".to_string(),
            timestamp: datetime!(2024-01-01 00:05:00 UTC),
            freq: "5m".to_string(),
            market: "RT5M".to_string(),
            node_id: "PJM-RTO".to_string(),
            lmp: 31.5,
            lmp_type: "LMP".to_string(),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["timestamp"], "2024-01-01 00:05:00+00:00");
        assert_eq!(json["node_id"], "PJM-RTO");
    }
}
