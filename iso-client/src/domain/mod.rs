pub mod authority;
pub mod generation;
pub mod range_metadata;

pub use authority::{Authority, BALANCING_AUTHORITIES};
pub use generation::{GenerationDatum, GenerationKey};
pub use range_metadata::{DataType, RangeError, RangeMetadata, TimeRange};
