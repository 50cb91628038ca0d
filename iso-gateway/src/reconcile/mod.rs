//! Incremental cache fill for generation data.
//!
//! [`Reconciler::reconcile`] compares a requested window with the interval the
//! store already holds, fetches only what is missing, and commits the new rows
//! together with the widened interval.

pub mod locks;
pub mod plan;

use std::{sync::Arc, time::Duration};

use iso_client::domain::{DataType, TimeRange};

use crate::{
    error::GatewayError,
    store::GenerationStore,
    transform,
    upstream::{self, ClientFactory, GenerationRecord, UpstreamError},
};

pub use locks::KeyedLocks;
pub use plan::{plan, ReconcileCase, ReconcilePlan, COVERAGE_SLACK};

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    pub case: ReconcileCase,
    pub fetched: Vec<TimeRange>,
    pub inserted: u64,
}

pub struct Reconciler {
    store: Arc<dyn GenerationStore>,
    clients: Arc<dyn ClientFactory>,
    locks: KeyedLocks,
    fetch_timeout: Duration,
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn GenerationStore>,
        clients: Arc<dyn ClientFactory>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            store,
            clients,
            locks: KeyedLocks::new(),
            fetch_timeout,
        }
    }

    /// Make the store hold every record for `requested`.
    ///
    /// Nothing is written unless every upstream fetch succeeds; rows and
    /// metadata are then committed together.
    pub async fn reconcile(
        &self,
        authority: &str,
        data_type: DataType,
        requested: TimeRange,
    ) -> Result<ReconcileOutcome, GatewayError> {
        let _guard = self.locks.acquire(authority, data_type).await;

        let existing = self.store.range_metadata(authority, data_type).await?;
        let plan = plan(authority, data_type, existing.as_ref(), requested);

        metrics::counter!("reconcile_total", "case" => plan.case.as_str()).increment(1);
        tracing::info!(
            authority,
            %data_type,
            case = plan.case.as_str(),
            %requested,
            fetches = plan.fetches.len(),
            "reconciling cached range"
        );

        if plan.fetches.is_empty() {
            return Ok(ReconcileOutcome {
                case: plan.case,
                fetched: Vec::new(),
                inserted: 0,
            });
        }

        let records = match self.fetch_all(authority, data_type, &plan.fetches).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, authority, %data_type, "upstream fetch failed, cache left unchanged");
                return Err(e.into());
            }
        };

        let data = transform::merge_generation(authority, records);
        let inserted = self.store.commit(&plan.metadata, &data).await?;
        metrics::counter!("generation_rows_inserted_total").increment(inserted);

        Ok(ReconcileOutcome {
            case: plan.case,
            fetched: plan.fetches,
            inserted,
        })
    }

    async fn fetch_all(
        &self,
        authority: &str,
        data_type: DataType,
        ranges: &[TimeRange],
    ) -> Result<Vec<GenerationRecord>, UpstreamError> {
        let client = self.clients.client_for(authority)?;

        let mut records = Vec::new();
        for range in ranges {
            let batch = match data_type {
                DataType::Generation => {
                    upstream::with_timeout(self.fetch_timeout, client.get_generation(*range)).await?
                }
            };
            tracing::debug!(authority, %range, records = batch.len(), "fetched upstream window");
            records.extend(batch);
        }
        Ok(records)
    }
}
