//! Upstream grid-data client contract.
//!
//! A [`ClientFactory`] hands out one [`GridClient`] per balancing authority.
//! Every call covers an explicit `[start, end)` window.

pub mod http;
pub mod records;

use std::{future::Future, time::Duration};

use iso_client::domain::TimeRange;

use crate::error::GatewayError;

pub use http::HttpClientFactory;
pub use records::{GenerationRecord, LmpRecord, LoadRecord, TradeRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Generation,
    Load,
    Trade,
    Lmp,
}

impl Series {
    pub fn as_str(&self) -> &'static str {
        match self {
            Series::Generation => "generation",
            Series::Load => "load",
            Series::Trade => "trade",
            Series::Lmp => "lmp",
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum UpstreamError {
    #[error("no upstream client for authority {0}")]
    UnknownAuthority(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("upstream call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<UpstreamError> for GatewayError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::UnknownAuthority(code) => GatewayError::NotFound(code),
            other => GatewayError::UpstreamUnavailable(other.to_string()),
        }
    }
}

#[async_trait::async_trait]
pub trait GridClient: Send + Sync {
    async fn get_generation(&self, range: TimeRange) -> Result<Vec<GenerationRecord>, UpstreamError>;
    async fn get_load(&self, range: TimeRange) -> Result<Vec<LoadRecord>, UpstreamError>;
    async fn get_trade(&self, range: TimeRange) -> Result<Vec<TradeRecord>, UpstreamError>;
    async fn get_lmp(&self, range: TimeRange) -> Result<Vec<LmpRecord>, UpstreamError>;
}

pub trait ClientFactory: Send + Sync {
    fn client_for(&self, authority: &str) -> Result<Box<dyn GridClient>, UpstreamError>;
}

/// Bound an upstream call; expiry is reported as [`UpstreamError::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(res) => res,
        Err(_) => {
            metrics::counter!("upstream_timeouts_total").increment(1);
            Err(UpstreamError::Timeout(limit))
        }
    }
}
