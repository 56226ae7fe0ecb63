use mongodb::{Client, bson::doc, options::ClientOptions};
use std::time::Duration;
use tracing::{info, instrument};

use super::MongoConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry, retry_with_backoff};

/// Parse the connection string and apply the pool and timeout settings.
pub async fn client_options(config: &MongoConfig) -> DatabaseResult<ClientOptions> {
    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    Ok(options)
}

/// Round-trip a `ping` against the admin database.
pub async fn ping(client: &Client) -> DatabaseResult<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
    Ok(())
}

/// Build a client from `config` and verify the server answers.
///
/// The driver connects lazily, so the ping is what surfaces a bad URL or an
/// unreachable server at startup instead of on the first request.
#[instrument(skip(config), fields(url = %config.redacted_url()))]
pub async fn connect_from_config(config: &MongoConfig) -> DatabaseResult<Client> {
    let client = Client::with_options(client_options(config).await?)?;
    ping(&client).await?;

    info!("Connected to MongoDB");
    Ok(client)
}

/// [`connect_from_config`] with exponential backoff, for containers that start
/// before their database.
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<Client> {
    match retry_config {
        Some(retry_config) => retry_with_backoff(|| connect_from_config(config), retry_config).await,
        None => retry(|| connect_from_config(config)).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_options_applies_config() {
        let config = MongoConfig {
            max_pool_size: 12,
            min_pool_size: 2,
            connect_timeout_secs: 3,
            server_selection_timeout_secs: 4,
            ..MongoConfig::with_database("mongodb://localhost:27017", "products")
        }
        .with_app_name("products-api");

        let options = client_options(&config).await.unwrap();

        assert_eq!(options.max_pool_size, Some(12));
        assert_eq!(options.min_pool_size, Some(2));
        assert_eq!(options.connect_timeout, Some(Duration::from_secs(3)));
        assert_eq!(options.server_selection_timeout, Some(Duration::from_secs(4)));
        assert_eq!(options.app_name.as_deref(), Some("products-api"));
    }

    #[tokio::test]
    async fn test_client_options_rejects_bad_url() {
        let config = MongoConfig::with_database("postgres://localhost:5432", "products");
        assert!(client_options(&config).await.is_err());
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_connect_from_config() {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let config = MongoConfig::with_database(url, "test");
        assert!(connect_from_config(&config).await.is_ok());
    }
}
