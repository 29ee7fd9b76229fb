//! Feedback Hub server entry point.
//!
//! Wires the SQLite stores, dialog engine, and dispatcher together and
//! serves the event gateway until shutdown.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use feedback_hub::adapters::http::{gateway_router, AppState, SignatureVerifier};
use feedback_hub::adapters::sqlite::{
    connect_pool, init_schema, SqliteCatalogStore, SqliteReviewStore, SqliteUserRegistry,
};
use feedback_hub::application::{DialogEngine, Dispatcher};
use feedback_hub::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    tracing::info!("initializing database");
    let pool = connect_pool(&config.database).await?;
    init_schema(&pool).await?;

    let catalog = Arc::new(SqliteCatalogStore::new(pool.clone()));
    let users = Arc::new(SqliteUserRegistry::new(pool.clone()));
    let reviews = Arc::new(SqliteReviewStore::new(pool.clone()));

    let engine = DialogEngine::new(
        catalog,
        reviews.clone(),
        config.bot.feedback_page_size,
    );
    let dispatcher = Arc::new(Dispatcher::new(
        engine,
        users,
        reviews,
        config.bot.admin_ids(),
    ));

    let state = AppState::new(
        dispatcher,
        SignatureVerifier::new(config.bot.signing_secret()),
    );
    let app = gateway_router(state);

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "gateway ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
