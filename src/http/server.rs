//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (rate limit, body cap, CORS, tracing, request ID)
//! - Bind server to listener
//! - Spawn the idle-bucket sweeper
//! - Graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::request::request_id_middleware;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::security::headers::cors_layer;
use crate::security::limits::limit_request_body;
use crate::security::rate_limit::{self, rate_limit_middleware, RateLimiter};
use crate::todos::handlers;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

/// HTTP server for the todo API.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    limiter: Arc<RateLimiter>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, pool: SqlitePool) -> Self {
        let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));
        let state = AppState { pool };
        let router = Self::build_router(&config, state, limiter.clone());

        Self {
            router,
            config,
            limiter,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers apply outermost-last, so the admission limiter is added at the
    /// end: it must reject before any other work happens.
    fn build_router(config: &AppConfig, state: AppState, limiter: Arc<RateLimiter>) -> Router {
        let mut router = Router::new()
            .route(
                "/todos",
                get(handlers::list_todos).post(handlers::create_todo),
            )
            .route(
                "/todos/{id}",
                get(handlers::get_todo)
                    .put(handlers::update_todo)
                    .delete(handlers::delete_todo),
            )
            .fallback(handlers::route_not_found)
            .method_not_allowed_fallback(handlers::method_not_allowed)
            .with_state(state)
            .layer(cors_layer(&config.cors))
            .layer(middleware::from_fn_with_state(
                config.limits.max_body_bytes,
                limit_request_body,
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(middleware::from_fn(request_id_middleware))
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(TraceLayer::new_for_http());

        if config.rate_limit.enabled {
            router = router.layer(middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ));
        }

        router
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        if self.config.rate_limit.enabled && self.config.rate_limit.max_idle_secs > 0 {
            rate_limit::spawn_sweeper(
                self.limiter.clone(),
                Duration::from_secs(self.config.rate_limit.sweep_interval_secs),
                Duration::from_secs(self.config.rate_limit.max_idle_secs),
                shutdown.clone(),
            );
        }

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
