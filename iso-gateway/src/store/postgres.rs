use iso_client::{
    db::{generation_queries, range_metadata_queries},
    domain::{DataType, GenerationDatum, RangeMetadata, TimeRange},
};
use sqlx::{postgres::PgPool, Executor};

use super::{GenerationStore, StoreError};

const SCHEMA: &str = include_str!("../../sql/schema/01_iso_cache.sql");

pub struct PgGenerationStore {
    pool: PgPool,
    insert_batch_size: usize,
}

impl PgGenerationStore {
    pub fn new(pool: PgPool, insert_batch_size: usize) -> Self {
        Self {
            pool,
            insert_batch_size: insert_batch_size.max(1),
        }
    }

    /// Create the cache tables if they do not exist yet.
    pub async fn apply_schema(&self) -> Result<(), StoreError> {
        self.pool.execute(SCHEMA).await?;
        tracing::info!("cache schema applied");
        Ok(())
    }
}

#[async_trait::async_trait]
impl GenerationStore for PgGenerationStore {
    async fn range_metadata(
        &self,
        authority: &str,
        data_type: DataType,
    ) -> Result<Option<RangeMetadata>, StoreError> {
        Ok(range_metadata_queries::fetch_range_metadata(&self.pool, authority, data_type).await?)
    }

    async fn commit(
        &self,
        metadata: &RangeMetadata,
        data: &[GenerationDatum],
    ) -> Result<u64, StoreError> {
        // Dropping `tx` on any early return rolls it back.
        let mut tx = self.pool.begin().await?;

        let mut inserted = 0;
        for chunk in data.chunks(self.insert_batch_size) {
            inserted += generation_queries::insert_generation_batch(&mut *tx, chunk).await?;
        }
        let stored = range_metadata_queries::upsert_range_metadata(&mut *tx, metadata).await?;

        tx.commit().await?;

        tracing::debug!(
            authority = %stored.authority_code,
            data_type = %stored.data_type,
            least_recent = %stored.least_recent,
            most_recent = %stored.most_recent,
            inserted,
            "cache commit"
        );
        Ok(inserted)
    }

    async fn generation_between(
        &self,
        authority: &str,
        range: TimeRange,
    ) -> Result<Vec<GenerationDatum>, StoreError> {
        Ok(generation_queries::generation_between(&self.pool, authority, range.start(), range.end()).await?)
    }
}
