//! Configuration for Products API

use core_config::{app_info, env_flag, server::ServerConfig, AppInfo, FromEnv};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Insert the sample products at startup (`SEED_PRODUCTS`, default true)
    pub seed_products: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let app = app_info!();
        let mongodb = MongoConfig::from_env()?.with_app_name(app.name);
        let server = ServerConfig::from_env()?;
        let seed_products = env_flag("SEED_PRODUCTS", true)?;

        Ok(Self {
            app,
            mongodb,
            server,
            environment,
            seed_products,
        })
    }
}
