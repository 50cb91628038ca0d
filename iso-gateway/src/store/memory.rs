use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

use iso_client::domain::{DataType, GenerationDatum, GenerationKey, RangeMetadata, TimeRange};

use super::{GenerationStore, StoreError};

#[derive(Default)]
struct MemoryState {
    metadata: HashMap<(String, String), RangeMetadata>,
    generation: BTreeMap<GenerationKey, GenerationDatum>,
}

/// Process-local store with the same semantics as the Postgres backend.
///
/// Nothing survives a restart; useful for development and tests.
#[derive(Default)]
pub struct MemoryGenerationStore {
    state: Mutex<MemoryState>,
}

impl MemoryGenerationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.state.lock().map(|s| s.generation.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError("memory store lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl GenerationStore for MemoryGenerationStore {
    async fn range_metadata(
        &self,
        authority: &str,
        data_type: DataType,
    ) -> Result<Option<RangeMetadata>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .metadata
            .get(&(authority.to_string(), data_type.as_str().to_string()))
            .cloned())
    }

    async fn commit(
        &self,
        metadata: &RangeMetadata,
        data: &[GenerationDatum],
    ) -> Result<u64, StoreError> {
        let mut state = self.lock()?;

        let mut inserted = 0;
        for datum in data {
            if let std::collections::btree_map::Entry::Vacant(slot) = state.generation.entry(datum.key()) {
                slot.insert(datum.clone());
                inserted += 1;
            }
        }

        let key = (metadata.authority_code.clone(), metadata.data_type.clone());
        let merged = match state.metadata.get(&key) {
            Some(existing) => existing.widened(metadata),
            None => metadata.clone(),
        };
        state.metadata.insert(key, merged);

        Ok(inserted)
    }

    async fn generation_between(
        &self,
        authority: &str,
        range: TimeRange,
    ) -> Result<Vec<GenerationDatum>, StoreError> {
        let state = self.lock()?;
        // Keys order by authority, then instant, then fuel.
        Ok(state
            .generation
            .values()
            .filter(|g| g.authority_code == authority && range.contains(g.timestamp))
            .cloned()
            .collect())
    }
}
