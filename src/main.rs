//! Nutrient Recommendation Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vital_recommender::api::{self, AppState};
use vital_recommender::catalog::Catalog;
use vital_recommender::config::Settings;
use vital_recommender::engine::RecommendEngine;
use vital_recommender::feedback::HttpFeedbackStore;
use vital_recommender::knowledge::Knowledge;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vital_recommender=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = Settings::from_env();

    let catalog = Catalog::load(&settings.catalog_path)?;
    let knowledge = Knowledge::load()?;
    tracing::info!(rows = catalog.len(), "catalog loaded; fitting vector spaces");

    let engine = RecommendEngine::new(catalog, knowledge);
    let store = HttpFeedbackStore::new(&settings.backend_url)?;
    let state = AppState {
        engine: Arc::new(engine),
        feedback: Arc::new(store),
    };

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!(addr = %settings.bind_addr, "recommendation server listening");
    axum::serve(listener, api::router(state)).await?;

    Ok(())
}
