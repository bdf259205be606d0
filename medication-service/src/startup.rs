//! Application startup and lifecycle management.

use crate::config::MedicationConfig;
use crate::handlers::{chat, health, medications};
use crate::services::generator::inference::{InferenceConfig, InferenceTextGenerator};
use crate::services::generator::TextGenerator;
use crate::services::{init_metrics, Database};
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::{middleware, Router};
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: MedicationConfig,
    pub db: Arc<Database>,
    pub generator: Arc<dyn TextGenerator>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the text generator taken from
    /// configuration. The generator is constructed once here and reused for
    /// every chat request.
    pub async fn build(config: MedicationConfig) -> Result<Self, AppError> {
        let generator: Arc<dyn TextGenerator> =
            Arc::new(InferenceTextGenerator::new(InferenceConfig {
                base_url: config.chat.inference_url.clone(),
                model: config.chat.model.clone(),
                max_new_tokens: config.chat.max_new_tokens,
                timeout_secs: config.chat.timeout_secs,
                api_token: config.chat.api_token.clone(),
            }));

        tracing::info!(
            model = %config.chat.model,
            max_new_tokens = config.chat.max_new_tokens,
            "Initialized text generator"
        );

        Self::build_with_generator(config, generator).await
    }

    /// Build the application with an injected generator.
    /// Use this in tests to avoid a real model endpoint.
    pub async fn build_with_generator(
        config: MedicationConfig,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self, AppError> {
        // Initialize metrics
        init_metrics();

        // Connect to database
        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        db.run_migrations().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            e
        })?;

        let state = AppState {
            config: config.clone(),
            db: Arc::new(db),
            generator,
        };

        // Bind listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Medication service listener bound");

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let cors = cors_layer(&self.state.config.cors.allowed_origins);

        let router = Router::new()
            .route("/", get(health::root))
            .route("/test", get(health::test))
            .route("/health", get(health::health_check))
            .route("/ready", get(health::readiness_check))
            .route("/metrics", get(health::metrics_handler))
            .route(
                "/medications",
                get(medications::get_medication).post(medications::create_medication),
            )
            .route(
                "/medications/:id",
                put(medications::update_medication).delete(medications::delete_medication),
            )
            .route("/chat", post(chat::chat))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(metrics_middleware))
            .layer(middleware::from_fn(request_id_middleware))
            .with_state(self.state);

        tracing::info!(
            service = "medication-service",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        axum::serve(self.listener, router).await
    }
}

/// CORS policy for the browser frontend: explicit origins from
/// configuration, credentials allowed.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
