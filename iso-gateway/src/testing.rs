//! In-process doubles for the upstream client and the store.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use iso_client::domain::{DataType, GenerationDatum, RangeMetadata, TimeRange};
use time::OffsetDateTime;

use crate::{
    store::{GenerationStore, MemoryGenerationStore, StoreError},
    upstream::{
        ClientFactory, GenerationRecord, GridClient, LmpRecord, LoadRecord, Series, TradeRecord,
        UpstreamError,
    },
};

const STEP_SECS: i64 = 30 * 60;
pub const FUELS: [&str; 2] = ["coal", "wind"];

#[derive(Debug, Clone, PartialEq)]
pub struct FakeCall {
    pub authority: String,
    pub series: Series,
    pub range: TimeRange,
}

#[derive(Default)]
struct FakeState {
    calls: Mutex<Vec<FakeCall>>,
    fail: AtomicBool,
    delay_ms: AtomicU64,
}

/// Upstream that reports a point per fuel every half hour, deterministically.
#[derive(Clone, Default)]
pub struct FakeGrid {
    state: Arc<FakeState>,
}

impl FakeGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_requests(&self, fail: bool) {
        self.state.fail.store(fail, Ordering::SeqCst);
    }

    pub fn delay_requests(&self, delay: Duration) {
        self.state
            .delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn fetched(&self, series: Series) -> Vec<TimeRange> {
        self.calls()
            .into_iter()
            .filter(|c| c.series == series)
            .map(|c| c.range)
            .collect()
    }

    /// Instants the upstream has data for within `[start, end)`.
    pub fn instants(range: TimeRange) -> Vec<OffsetDateTime> {
        let start = range.start().unix_timestamp();
        let first = start.div_euclid(STEP_SECS) * STEP_SECS
            + if start.rem_euclid(STEP_SECS) == 0 { 0 } else { STEP_SECS };

        let mut out = Vec::new();
        let mut t = first;
        while let Ok(ts) = OffsetDateTime::from_unix_timestamp(t) {
            if !range.contains_half_open(ts) {
                break;
            }
            out.push(ts);
            t += STEP_SECS;
        }
        out
    }

    /// Every generation record upstream holds for `authority` in `[start, end)`.
    pub fn truth(authority: &str, range: TimeRange) -> Vec<GenerationRecord> {
        Self::instants(range)
            .into_iter()
            .flat_map(|ts| {
                FUELS.iter().map(move |fuel| GenerationRecord {
                    ba_name: authority.to_string(),
                    timestamp: ts,
                    freq: "30m".to_string(),
                    market: "RT5M".to_string(),
                    fuel_name: fuel.to_string(),
                    gen_mw: ((ts.unix_timestamp() / STEP_SECS) % 1000) as f64,
                })
            })
            .collect()
    }

    async fn enter(&self, authority: &str, series: Series, range: TimeRange) -> Result<(), UpstreamError> {
        self.state.calls.lock().unwrap().push(FakeCall {
            authority: authority.to_string(),
            series,
            range,
        });

        let delay = self.state.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.state.fail.load(Ordering::SeqCst) {
            return Err(UpstreamError::Transport("injected failure".to_string()));
        }
        Ok(())
    }
}

impl ClientFactory for FakeGrid {
    fn client_for(&self, authority: &str) -> Result<Box<dyn GridClient>, UpstreamError> {
        Ok(Box::new(FakeClient {
            grid: self.clone(),
            authority: authority.to_string(),
        }))
    }
}

struct FakeClient {
    grid: FakeGrid,
    authority: String,
}

#[async_trait::async_trait]
impl GridClient for FakeClient {
    async fn get_generation(&self, range: TimeRange) -> Result<Vec<GenerationRecord>, UpstreamError> {
        self.grid.enter(&self.authority, Series::Generation, range).await?;
        Ok(FakeGrid::truth(&self.authority, range))
    }

    async fn get_load(&self, range: TimeRange) -> Result<Vec<LoadRecord>, UpstreamError> {
        self.grid.enter(&self.authority, Series::Load, range).await?;
        Ok(FakeGrid::instants(range)
            .into_iter()
            .map(|ts| LoadRecord {
                ba_name: self.authority.clone(),
                timestamp: ts,
                freq: "30m".to_string(),
                market: "RT5M".to_string(),
                load_mw: 1000.0,
            })
            .collect())
    }

    async fn get_trade(&self, range: TimeRange) -> Result<Vec<TradeRecord>, UpstreamError> {
        self.grid.enter(&self.authority, Series::Trade, range).await?;
        Ok(FakeGrid::instants(range)
            .into_iter()
            .map(|ts| TradeRecord {
                ba_name: self.authority.clone(),
                timestamp: ts,
                freq: "30m".to_string(),
                market: "RT5M".to_string(),
                net_exp_mw: -25.0,
            })
            .collect())
    }

    async fn get_lmp(&self, range: TimeRange) -> Result<Vec<LmpRecord>, UpstreamError> {
        self.grid.enter(&self.authority, Series::Lmp, range).await?;
        Ok(FakeGrid::instants(range)
            .into_iter()
            .map(|ts| LmpRecord {
                ba_name: self.authority.clone(),
                timestamp: ts,
                freq: "30m".to_string(),
                market: "RT5M".to_string(),
                node_id: format!("{}-HUB", self.authority),
                lmp: 42.0,
                lmp_type: "LMP".to_string(),
            })
            .collect())
    }
}

/// Memory store whose commits can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryGenerationStore,
    fail_commits: AtomicBool,
}

impl FlakyStore {
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl GenerationStore for FlakyStore {
    async fn range_metadata(
        &self,
        authority: &str,
        data_type: DataType,
    ) -> Result<Option<RangeMetadata>, StoreError> {
        self.inner.range_metadata(authority, data_type).await
    }

    async fn commit(
        &self,
        metadata: &RangeMetadata,
        data: &[GenerationDatum],
    ) -> Result<u64, StoreError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError("injected commit failure".to_string()));
        }
        self.inner.commit(metadata, data).await
    }

    async fn generation_between(
        &self,
        authority: &str,
        range: TimeRange,
    ) -> Result<Vec<GenerationDatum>, StoreError> {
        self.inner.generation_between(authority, range).await
    }
}
