use time::OffsetDateTime;

/// A single generation measurement for one fuel at one instant.
///
/// Two data points with the same [`GenerationKey`] are the same record,
/// whatever their other fields say.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct GenerationDatum {
    pub authority_code: String,
    pub timestamp: OffsetDateTime,
    pub fuel_name: String,
    pub gen_mw: i32,
    pub frequency: String,
    pub market: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenerationKey {
    pub authority_code: String,
    pub timestamp: OffsetDateTime,
    pub fuel_name: String,
}

impl GenerationDatum {
    pub fn key(&self) -> GenerationKey {
        GenerationKey {
            authority_code: self.authority_code.clone(),
            timestamp: self.timestamp,
            fuel_name: self.fuel_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn datum(ts: OffsetDateTime, fuel: &str, mw: i32) -> GenerationDatum {
        GenerationDatum {
            authority_code: "CAISO".to_string(),
            timestamp: ts,
            fuel_name: fuel.to_string(),
            gen_mw: mw,
            frequency: "5m".to_string(),
            market: "RT5M".to_string(),
        }
    }

    #[test]
    fn key_ignores_measurement_fields() {
        let a = datum(datetime!(2024-01-01 00:00:00 UTC), "wind", 10);
        let b = datum(datetime!(2024-01-01 00:00:00 UTC), "wind", 99);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn key_compares_instants_across_offsets() {
        let a = datum(datetime!(2024-01-01 00:00:00 UTC), "wind", 10);
        let b = datum(datetime!(2023-12-31 19:00:00 -5), "wind", 10);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), datum(a.timestamp, "solar", 10).key());
    }
}
