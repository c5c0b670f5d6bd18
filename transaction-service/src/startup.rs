//! Application startup and lifecycle management.

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use service_core::observability::REQUEST_ID_HEADER;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handlers::{self, transactions};
use crate::middleware::require_transaction_scope;
use crate::services::{init_metrics, HttpIntrospector, TokenIntrospector, TransactionStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: TransactionStore,
    pub introspector: Arc<dyn TokenIntrospector>,
}

impl AppState {
    pub fn new(store: TransactionStore, introspector: Arc<dyn TokenIntrospector>) -> Self {
        Self {
            store,
            introspector,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/:transaction_id", get(transactions::read_transaction))
        .route_layer(from_fn_with_state(state.clone(), require_transaction_scope));

    Router::new()
        .route(
            "/",
            post(transactions::create_transaction)
                .put(transactions::create_transaction)
                .get(transactions::lookup_transaction),
        )
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .merge(protected)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// Port `0` binds a random port (used by tests).
    pub async fn build(config: Config) -> Result<Self, AppError> {
        init_metrics();

        let introspector = HttpIntrospector::new(config.introspection.clone()).map_err(|e| {
            tracing::error!("Failed to build introspection client: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;
        tracing::info!(endpoint = %introspector.endpoint(), "Token introspection configured");

        let state = AppState::new(TransactionStore::new(), Arc::new(introspector));
        let router = build_router(state);

        let address = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(service = %config.service_name, port, "Transaction service bound");

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM.
    pub async fn run_until_stopped(self) -> Result<(), AppError> {
        tracing::info!("Listening on {}", self.listener.local_addr()?);

        axum::serve(
            self.listener,
            self.router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Service shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
