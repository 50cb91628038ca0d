//! Local system of record: range metadata plus the generation datum table.

pub mod memory;
pub mod postgres;

use iso_client::domain::{DataType, GenerationDatum, RangeMetadata, TimeRange};

use crate::error::GatewayError;

pub use memory::MemoryGenerationStore;
pub use postgres::PgGenerationStore;

#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct StoreError(pub String);

impl From<anyhow::Error> for StoreError {
    fn from(e: anyhow::Error) -> Self {
        StoreError(format!("{e:#}"))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError(e.to_string())
    }
}

impl From<StoreError> for GatewayError {
    fn from(e: StoreError) -> Self {
        GatewayError::Storage(e.0)
    }
}

#[async_trait::async_trait]
pub trait GenerationStore: Send + Sync {
    async fn range_metadata(
        &self,
        authority: &str,
        data_type: DataType,
    ) -> Result<Option<RangeMetadata>, StoreError>;

    /// Write `data` and `metadata` as one unit: either both land or neither does.
    ///
    /// Data whose identity is already stored is skipped. The stored interval
    /// becomes the union of the existing one and `metadata`. Returns the number
    /// of new datum rows.
    async fn commit(
        &self,
        metadata: &RangeMetadata,
        data: &[GenerationDatum],
    ) -> Result<u64, StoreError>;

    async fn generation_between(
        &self,
        authority: &str,
        range: TimeRange,
    ) -> Result<Vec<GenerationDatum>, StoreError>;
}
