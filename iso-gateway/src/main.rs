use anyhow::Result;
use iso_gateway::{
    config::{AppConfig, StoreKind},
    http, observability,
    store::{GenerationStore, MemoryGenerationStore, PgGenerationStore},
    upstream::HttpClientFactory,
};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    let metrics = match &cfg.metrics {
        Some(metrics_cfg) => Some((
            metrics_cfg.route.clone(),
            observability::install_metrics_recorder()?,
        )),
        None => None,
    };

    // A database that cannot be reached is fatal here, never per request.
    let store: Arc<dyn GenerationStore> = match cfg.database.kind {
        StoreKind::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(cfg.database.max_connections)
                .connect(&cfg.database.uri)
                .await
                .map_err(|e| anyhow::anyhow!("failed to connect to database: {e}"))?;
            let store = PgGenerationStore::new(pool, cfg.database.insert_batch_size);
            if cfg.database.apply_schema {
                store.apply_schema().await?;
            }
            Arc::new(store)
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; cached data will not survive a restart");
            Arc::new(MemoryGenerationStore::new())
        }
    };

    let clients = Arc::new(HttpClientFactory::new(&cfg.upstream)?);
    let state = http::AppState::new(store, clients, cfg.upstream.timeout());

    let mut app = http::router(state);
    if let Some((route, handle)) = metrics {
        app = app.merge(http::metrics_router(&route, handle));
    }

    let addr: SocketAddr = cfg
        .server
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.bind_addr: {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, upstream = %cfg.upstream.base_url, "iso gateway listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
