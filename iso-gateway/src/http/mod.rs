//! HTTP surface: authority listing, cached generation, pass-through series.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use iso_client::domain::{Authority, DataType, GenerationDatum, TimeRange};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tower_http::trace::TraceLayer;

use crate::{
    error::GatewayError,
    query::WindowParams,
    reconcile::Reconciler,
    store::GenerationStore,
    upstream::{self, ClientFactory, GridClient, LmpRecord, LoadRecord, TradeRecord},
};

#[derive(Clone)]
pub struct AppState {
    reconciler: Arc<Reconciler>,
    store: Arc<dyn GenerationStore>,
    clients: Arc<dyn ClientFactory>,
    upstream_timeout: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn GenerationStore>,
        clients: Arc<dyn ClientFactory>,
        upstream_timeout: Duration,
    ) -> Self {
        let reconciler = Reconciler::new(store.clone(), clients.clone(), upstream_timeout);
        Self {
            reconciler: Arc::new(reconciler),
            store,
            clients,
            upstream_timeout,
        }
    }

    /// Validate the authority and window, and hand back a client for it.
    fn prepare(
        &self,
        authority: &str,
        params: &WindowParams,
    ) -> Result<(Box<dyn GridClient>, TimeRange), GatewayError> {
        let authority = known_authority(authority)?;
        let window = params.resolve(OffsetDateTime::now_utc())?;
        let client = self.clients.client_for(&authority.code)?;
        Ok((client, window))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/authorities/", get(list_authorities))
        .route("/authorities/:authority/gen/", get(authority_generation))
        .route("/authorities/:authority/load/", get(authority_load))
        .route("/authorities/:authority/lmp/", get(authority_lmp))
        .route("/authorities/:authority/trade/", get(authority_trade))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router exposing the Prometheus text rendering at `route`.
pub fn metrics_router(route: &str, handle: PrometheusHandle) -> Router {
    Router::new().route(
        route,
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    )
}

fn known_authority(code: &str) -> Result<Authority, GatewayError> {
    Authority::lookup(code).ok_or_else(|| GatewayError::NotFound(code.to_string()))
}

#[derive(Debug, Deserialize)]
struct WelcomeParams {
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct Welcome {
    message: String,
}

async fn welcome(Query(params): Query<WelcomeParams>) -> Json<Welcome> {
    let message = match params.name {
        Some(name) => format!("Welcome to the ISO API, {name}!"),
        None => "Welcome to the ISO API!".to_string(),
    };
    Json(Welcome { message })
}

async fn list_authorities() -> Json<Vec<Authority>> {
    Json(Authority::all())
}

/// Wire form of a stored generation datum.
#[derive(Debug, Serialize)]
pub struct GenerationDatumBody {
    pub authority_code: String,
    #[serde(serialize_with = "crate::timefmt::serialize")]
    pub timestamp: OffsetDateTime,
    pub fuel_name: String,
    #[serde(rename = "gen_MW")]
    pub gen_mw: i32,
    pub frequency: String,
    pub market: String,
}

impl From<GenerationDatum> for GenerationDatumBody {
    fn from(g: GenerationDatum) -> Self {
        Self {
            authority_code: g.authority_code,
            timestamp: g.timestamp,
            fuel_name: g.fuel_name,
            gen_mw: g.gen_mw,
            frequency: g.frequency,
            market: g.market,
        }
    }
}

async fn authority_generation(
    State(state): State<AppState>,
    Path(authority): Path<String>,
    Query(params): Query<WindowParams>,
) -> Result<Json<Vec<GenerationDatumBody>>, GatewayError> {
    let authority = known_authority(&authority)?;
    let window = params.resolve(OffsetDateTime::now_utc())?;

    state
        .reconciler
        .reconcile(&authority.code, DataType::Generation, window)
        .await?;

    let rows = state.store.generation_between(&authority.code, window).await?;
    Ok(Json(rows.into_iter().map(GenerationDatumBody::from).collect()))
}

async fn authority_load(
    State(state): State<AppState>,
    Path(authority): Path<String>,
    Query(params): Query<WindowParams>,
) -> Result<Json<Vec<LoadRecord>>, GatewayError> {
    let (client, window) = state.prepare(&authority, &params)?;
    let records = upstream::with_timeout(state.upstream_timeout, client.get_load(window)).await?;
    Ok(Json(records))
}

async fn authority_trade(
    State(state): State<AppState>,
    Path(authority): Path<String>,
    Query(params): Query<WindowParams>,
) -> Result<Json<Vec<TradeRecord>>, GatewayError> {
    let (client, window) = state.prepare(&authority, &params)?;
    let records = upstream::with_timeout(state.upstream_timeout, client.get_trade(window)).await?;
    Ok(Json(records))
}

async fn authority_lmp(
    State(state): State<AppState>,
    Path(authority): Path<String>,
    Query(params): Query<WindowParams>,
) -> Result<Json<Vec<LmpRecord>>, GatewayError> {
    let (client, window) = state.prepare(&authority, &params)?;
    let records = upstream::with_timeout(state.upstream_timeout, client.get_lmp(window)).await?;
    Ok(Json(records))
}
