/// Codes of every balancing authority the upstream grid client can serve.
pub const BALANCING_AUTHORITIES: &[&str] = &[
    "AESO", "AZPS", "BCH", "BPA", "CAISO", "DEAA", "ELE", "ERCOT", "EU", "GRIF", "HGMA", "HI",
    "IESO", "IID", "ISONE", "MISO", "NBP", "NEVP", "NLH", "NSP", "NYISO", "PACE", "PACW", "PEI",
    "PJM", "PNM", "PSEI", "SASK", "SPP", "SPPC", "SRP", "TEPC", "WALC", "YUKON",
];

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Authority {
    pub code: String,
}

impl Authority {
    /// Look up a known authority by its exact (case-sensitive) code.
    pub fn lookup(code: &str) -> Option<Self> {
        BALANCING_AUTHORITIES
            .iter()
            .find(|known| **known == code)
            .map(|known| Authority {
                code: (*known).to_string(),
            })
    }

    pub fn all() -> Vec<Self> {
        BALANCING_AUTHORITIES
            .iter()
            .map(|code| Authority {
                code: (*code).to_string(),
            })
            .collect()
    }
}
