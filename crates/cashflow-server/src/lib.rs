//! Cashflow Web Server
//!
//! Axum-based REST API for the Cashflow ledger: category and transaction
//! entry, month summaries, AI category suggestions, and AI spending insights
//! over the current calendar period.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use cashflow_core::ai::{GeneratorClient, TextGenerator};
use cashflow_core::config::ServerSettings;
use cashflow_core::db::Database;

mod handlers;

/// Message returned when the text-generation backend fails
pub const AI_UNAVAILABLE_MESSAGE: &str = "AI insights are temporarily unavailable";

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub generator: GeneratorClient,
}

/// Create the application router
pub fn create_router(db: Database, generator: GeneratorClient, settings: &ServerSettings) -> Router {
    info!(
        backend = generator.backend_name(),
        host = generator.host(),
        model = generator.model(),
        "AI backend configured"
    );

    let state = Arc::new(AppState { db, generator });

    let api_routes = Router::new()
        // Health
        .route("/health", get(handlers::health))
        // Ledger
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/transactions/suggest-category",
            post(handlers::suggest_category),
        )
        // Summaries
        .route("/summary/balance", get(handlers::get_balance))
        .route("/summary/monthly", get(handlers::get_monthly_summary))
        .route("/summary/categories", get(handlers::get_categories_summary))
        // Insights
        .route("/ai/insights", get(handlers::get_insights));

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&settings.allowed_origins))
}

/// Restrictive CORS: same-origin unless origins are configured
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if allowed_origins.is_empty() {
        return cors;
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

/// Start the server
pub async fn serve(
    db: Database,
    generator: GeneratorClient,
    settings: &ServerSettings,
) -> anyhow::Result<()> {
    check_ai_connection(&generator).await;

    let app = create_router(db, generator, settings);
    let addr = format!("{}:{}", settings.host, settings.port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
async fn check_ai_connection(generator: &GeneratorClient) {
    if !generator.is_enabled() {
        info!("AI insights disabled (set [ai] enabled = true and a host to enable)");
        return;
    }

    if generator.health_check().await {
        info!(
            host = generator.host(),
            model = generator.model(),
            "AI backend connected"
        );
    } else {
        warn!(
            host = generator.host(),
            model = generator.model(),
            "AI backend configured but not responding"
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unavailable(msg: &str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            if self.status == StatusCode::SERVICE_UNAVAILABLE {
                warn!(error = %err, "AI backend failure");
            } else {
                error!(error = %err, "Internal error");
            }
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        let mut generation_failure = false;
        if let Some(core) = err.downcast_ref::<cashflow_core::Error>() {
            match core {
                cashflow_core::Error::InvalidData(msg) => return Self::bad_request(msg),
                cashflow_core::Error::NotFound(what) => {
                    return Self::not_found(&format!("{} not found", what))
                }
                other => generation_failure = other.is_generation_failure(),
            }
        }

        if generation_failure {
            // Retryable by the caller
            return Self {
                internal: Some(err),
                ..Self::unavailable(AI_UNAVAILABLE_MESSAGE)
            };
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
