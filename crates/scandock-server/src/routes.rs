//! REST surface.
//!
//! Preserves the wire shapes existing capture and viewer clients speak;
//! see `scandock_core::wire`. Failures are converted to `{ "error": ... }`
//! JSON at the handler boundary and never propagate further.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use scandock_core::ScandockError;
use scandock_core::sync::SyncChannel;
use scandock_core::wire::{
    AppendRequest, AppendResponse, ClearResponse, EntryUrlResponse, ErrorResponse, ListResponse,
    mobile_entry_url,
};
use scandock_sync::InProcessChannel;

use crate::net;
use crate::ws;

/// Upload limit matching the original deployments (10 MB data-URI payloads).
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared handler state.
///
/// The server always runs the push transport; remote consumers that prefer
/// polling simply call the REST endpoints on a timer.
#[derive(Clone)]
pub struct AppState {
    pub channel: Arc<InProcessChannel>,
    pub port: u16,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/images/:session_id",
            get(list_images).post(append_image).delete(clear_session),
        )
        .route("/api/session/:session_id/url", get(entry_url))
        .route("/ws", get(ws::ws_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        // Any holder of a session id has full access; there is no
        // authentication anywhere in this design, so CORS stays open too.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn list_images(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ListResponse>, ApiError> {
    let images = state.channel.snapshot(&session_id).await?;
    let count = images.len();
    Ok(Json(ListResponse {
        images,
        count: Some(count),
    }))
}

async fn append_image(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<AppendRequest>,
) -> Result<Json<AppendResponse>, ApiError> {
    if request.image_data.is_empty() {
        return Err(ApiError::bad_request("No image data provided"));
    }

    let record = state.channel.publish(&session_id, request.image_data).await?;
    tracing::debug!(%session_id, image_id = %record.id, "image appended");

    Ok(Json(AppendResponse {
        success: true,
        image: record.receipt(),
    }))
}

async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ClearResponse>, ApiError> {
    // Explicit user reset; a store operation, never broadcast to consumers.
    state.channel.store().clear(&session_id).await?;
    tracing::info!(%session_id, "session cleared");
    Ok(Json(ClearResponse { success: true }))
}

async fn entry_url(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<EntryUrlResponse> {
    let local_ip = net::local_ip().unwrap_or_else(|| "localhost".to_string());
    let origin = format!("http://{}:{}", local_ip, state.port);
    Json(EntryUrlResponse {
        mobile_url: mobile_entry_url(&origin, &session_id),
        local_ip,
    })
}

/// Handler-boundary error: status code plus the `{ "error": ... }` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ScandockError> for ApiError {
    fn from(err: ScandockError) -> Self {
        let status = match &err {
            ScandockError::InvalidSession(_) => StatusCode::BAD_REQUEST,
            ScandockError::Transport(_) | ScandockError::Io { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
