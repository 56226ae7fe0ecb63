use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{create_cors_layer, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::future::{Future, IntoFuture};
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Wrap the API routes with documentation and the cross-cutting layers.
///
/// This sets up:
/// - Swagger UI at `/swagger-ui`, spec at `/api-docs/openapi.json`
/// - `apis` merged at the root (state already applied by the caller)
/// - JSON 404 fallback
/// - Request tracing, security headers and response compression
/// - CORS, only when `server_config.cors_origins` is non-empty
///
/// # Errors
/// Fails when a configured CORS origin is not a valid header value.
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    if server_config.cors_origins.is_empty() {
        info!("CORS_ALLOWED_ORIGIN not set, CORS disabled");
    } else {
        info!(origins = ?server_config.cors_origins, "CORS enabled");
        router = router.layer(create_cors_layer(&server_config.cors_origins)?);
    }

    // Negotiated from Accept-Encoding; event streams are never compressed.
    Ok(router.layer(CompressionLayer::new()))
}

/// Serve `router` until SIGINT/SIGTERM, then drain and run `cleanup`.
///
/// After the signal, open connections get `shutdown_timeout` to finish.
/// Long-lived responses such as event streams never finish on their own, so
/// the server is dropped once the deadline passes. `cleanup` is bounded by the
/// same timeout.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let signal_task = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.wait_for_signal().await })
    };

    let mut stop_accepting = coordinator.subscribe();
    let mut drain_started = coordinator.subscribe();

    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = stop_accepting.recv().await;
        })
        .into_future();

    let drain_deadline = async move {
        let _ = drain_started.recv().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    let serve_result = tokio::select! {
        result = server => result.inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        }),
        _ = drain_deadline => {
            warn!(?shutdown_timeout, "Connections still open at deadline, forcing shutdown");
            Ok(())
        }
    };

    signal_task.abort();

    info!(?shutdown_timeout, "Running cleanup");
    if tokio::time::timeout(shutdown_timeout, cleanup).await.is_err() {
        warn!(?shutdown_timeout, "Cleanup exceeded timeout, skipping the rest");
    }

    serve_result
}
