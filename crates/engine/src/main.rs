//! CineRec Service - recommendation notebook backend
//!
//! Port: 8090

use actix_web::{web, App, HttpServer};
use cinerec_core::{init_logging, load_dotenv, ConfigLoader, InsightConfig};
use cinerec_engine::server::{configure_routes, AppState};
use cinerec_engine::{EngineConfig, GeminiInsightClient, InsightPanels, RecommenderEngine};
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = EngineConfig::load()?;
    init_logging(&config.logging.to_log_config("cinerec-service"))?;

    info!("Starting CineRec Service on port {}", config.server.port);

    let dataset = Arc::new(config.dataset.build()?);
    info!(
        movies = dataset.movies().len(),
        ratings = dataset.ratings().len(),
        users = dataset.user_ids().len(),
        "Dataset ready"
    );

    let insight_config = InsightConfig::from_env()?;
    insight_config.validate()?;
    let insight_client = GeminiInsightClient::new(insight_config)?;

    let state = web::Data::new(AppState {
        engine: Arc::new(RecommenderEngine::new(dataset, config.scoring.clone())),
        panels: Arc::new(InsightPanels::new(Arc::new(insight_client))),
    });

    let bind_addr = (config.server.host.clone(), config.server.port);
    info!("CineRec Service listening on {}:{}", bind_addr.0, bind_addr.1);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure_routes)
    });

    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server.bind(bind_addr)?.run().await?;

    Ok(())
}
