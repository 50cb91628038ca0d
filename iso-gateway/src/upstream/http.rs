use iso_client::domain::{Authority, TimeRange};
use serde::de::DeserializeOwned;
use time::format_description::well_known::Rfc3339;

use super::{
    ClientFactory, GenerationRecord, GridClient, LmpRecord, LoadRecord, Series, TradeRecord,
    UpstreamError,
};
use crate::config::UpstreamConfig;

/// Builds [`HttpGridClient`]s that talk to a JSON grid-data service at
/// `GET {base_url}/{authority}/{series}?start_at=..&end_at=..`.
#[derive(Clone)]
pub struct HttpClientFactory {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClientFactory {
    pub fn new(cfg: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .build()
            .map_err(|e| UpstreamError::Transport(format!("failed to build http client: {e}")))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl ClientFactory for HttpClientFactory {
    fn client_for(&self, authority: &str) -> Result<Box<dyn GridClient>, UpstreamError> {
        let authority = Authority::lookup(authority)
            .ok_or_else(|| UpstreamError::UnknownAuthority(authority.to_string()))?;

        Ok(Box::new(HttpGridClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            authority: authority.code,
        }))
    }
}

pub struct HttpGridClient {
    http: reqwest::Client,
    base_url: String,
    authority: String,
}

impl HttpGridClient {
    async fn fetch<T: DeserializeOwned>(
        &self,
        series: Series,
        range: TimeRange,
    ) -> Result<Vec<T>, UpstreamError> {
        let url = format!("{}/{}/{}", self.base_url, self.authority, series.as_str());
        let start = range
            .start()
            .format(&Rfc3339)
            .map_err(|e| UpstreamError::Transport(format!("unencodable start: {e}")))?;
        let end = range
            .end()
            .format(&Rfc3339)
            .map_err(|e| UpstreamError::Transport(format!("unencodable end: {e}")))?;

        metrics::counter!("upstream_requests_total", "series" => series.as_str()).increment(1);
        tracing::debug!(authority = %self.authority, series = series.as_str(), %range, "upstream request");

        let resp = self
            .http
            .get(&url)
            .query(&[("start_at", start), ("end_at", end)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                metrics::counter!("upstream_errors_total", "series" => series.as_str()).increment(1);
                UpstreamError::Transport(e.to_string())
            })?;

        resp.json::<Vec<T>>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl GridClient for HttpGridClient {
    async fn get_generation(&self, range: TimeRange) -> Result<Vec<GenerationRecord>, UpstreamError> {
        self.fetch(Series::Generation, range).await
    }

    async fn get_load(&self, range: TimeRange) -> Result<Vec<LoadRecord>, UpstreamError> {
        self.fetch(Series::Load, range).await
    }

    async fn get_trade(&self, range: TimeRange) -> Result<Vec<TradeRecord>, UpstreamError> {
        self.fetch(Series::Trade, range).await
    }

    async fn get_lmp(&self, range: TimeRange) -> Result<Vec<LmpRecord>, UpstreamError> {
        self.fetch(Series::Lmp, range).await
    }
}
