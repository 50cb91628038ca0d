use std::{collections::HashMap, sync::Arc};

use iso_client::domain::DataType;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per (authority, data type), created on first use.
///
/// Holding the guard serialises the read-decide-fetch-write sequence for that
/// series within this process.
#[derive(Default)]
pub struct KeyedLocks {
    inflight: Mutex<HashMap<(String, DataType), Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, authority: &str, data_type: DataType) -> OwnedMutexGuard<()> {
        let lock = {
            let mut inflight = self.inflight.lock().await;
            Arc::clone(
                inflight
                    .entry((authority.to_string(), data_type))
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}
