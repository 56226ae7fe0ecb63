//! Products API - REST server with a server-sent event stream

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::{MongoProductRepository, ProductService};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod seed;
mod state;
#[cfg(test)]
mod test_support;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());

    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    let state = AppState {
        config: config.clone(),
        mongo_client,
        db,
    };

    if config.seed_products {
        let service = ProductService::new(MongoProductRepository::new(&state.db));
        seed::seed_products(&service).await?;
    } else {
        info!("SEED_PRODUCTS disabled, skipping sample data");
    }

    let api_routes = api::routes(&state);
    let app = create_router::<openapi::ApiDoc>(api_routes, &config.server)?
        .merge(health_router(config.app));

    info!(
        "Starting {} v{} on port {}",
        config.app.name, config.app.version, config.server.port
    );

    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing MongoDB connections");
        state.mongo_client.shutdown().await;
        info!("MongoDB connection closed");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
