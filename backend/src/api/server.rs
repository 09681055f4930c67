//! HTTP Server for the invoice API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                              |
//! |--------|-------------------|------------------------------------------|
//! | GET    | `/health`         | Health check                             |
//! | POST   | `/api/v1/invoice` | Upload invoice images (`file` repeated)  |
//! | GET    | `/*`              | Static frontend, when a directory is set |

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::{net::SocketAddr, path::Path};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::types::{error_response, NO_FILES_SENT, NO_FILE_PROCESSED};
use crate::config::{ServerConfig, MAX_UPLOAD_BYTES, UPLOAD_FIELD};
use crate::error::{ServerError, ServerResult};
use crate::models::InvoiceEntry;
use crate::pipeline::{InvoicePipeline, UploadedFile};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: InvoicePipeline,
}

type ApiError = (StatusCode, Json<Value>);

/// Build the application router.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    // Permissive CORS for local development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let router = Router::new()
        .route("/health", get(health))
        .route("/api/v1/invoice", post(process_invoice))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.route("/", get(health)),
    };

    router.layer(cors)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig, pipeline: InvoicePipeline) -> ServerResult<()> {
    if let Some(dir) = config.static_dir.as_deref() {
        if !dir.is_dir() {
            return Err(ServerError::StaticDir(dir.display().to_string()));
        }
    }

    let analyzer = pipeline.analyzer_name();
    let app = build_router(AppState { pipeline }, config.static_dir.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log::info!("🚀 Invoice Reader running on http://localhost:{}", config.port);
    log::info!("   POST /api/v1/invoice - Upload invoice images ({} analyzer)", analyzer);
    log::info!("   GET  /health         - Health check");
    if let Some(dir) = config.static_dir.as_deref() {
        log::info!("   GET  /               - Frontend from {}", dir.display());
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "invoice-reader",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "invoice": "POST /api/v1/invoice"
        }
    }))
}

/// Invoice upload endpoint
async fn process_invoice(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<InvoiceEntry>>, ApiError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        bad_request(&format!("Erro no multipart: {}", e))
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        // Text fields named `file` are not uploads
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(&format!("Erro ao ler {}: {}", file_name, e)))?;

        files.push(UploadedFile::new(file_name, bytes.to_vec()));
    }

    if files.is_empty() {
        return Err(bad_request(NO_FILES_SENT));
    }

    log::info!("📄 New upload: {} file(s)", files.len());

    let outcome = state.pipeline.process_batch(&files).await;

    log::info!(
        "📊 {} read, {} skipped",
        outcome.entries.len(),
        outcome.skipped.len()
    );

    if outcome.entries.is_empty() {
        return Err(bad_request(NO_FILE_PROCESSED));
    }

    Ok(Json(outcome.entries))
}

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(error_response(message)))
}
