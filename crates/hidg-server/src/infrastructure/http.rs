//! HTTP ingress: routes, request handlers, and the listener loop.
//!
//! # Routes
//!
//! | Method | Path            | Typing                    |
//! |--------|-----------------|---------------------------|
//! | POST   | `/write/string` | paced (stroke delay)      |
//! | POST   | `/write/stream` | unpaced (back to back)    |
//! | GET    | `/health`       | none                      |
//!
//! Both write routes accept `text/plain` (the body is the text, typed in
//! pieces of `input_buffer_size` bytes as it arrives) and
//! `application/x-www-form-urlencoded` (the `text` field).  Any other content
//! type is answered with 415.
//!
//! # Responses
//!
//! Success is `202 Accepted` with `{"msg": "..."}`.  Failures are
//! `{"error": "..."}`: 4xx for bad requests, 5xx when the keyboard device or
//! the server itself is the problem.
//!
//! Device writes block, so every call into the [`Typist`] runs on
//! `tokio::task::spawn_blocking`.
//!
//! One request types at a time: a write request holds the typing lock from
//! its first piece to its last, so a long body is never mixed with another
//! request's text on the host.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::body::Body;
use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use futures_util::StreamExt;
use hidg_core::TypeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::Typist;
use crate::domain::{Pacing, PayloadSource, ServerSettings};

/// Logged payload previews are cut to this many bytes.
const PREVIEW_LEN: usize = 20;

/// How often the shutdown watcher checks the flag.
const SHUTDOWN_POLL: Duration = Duration::from_millis(200);

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    typist: Arc<dyn Typist>,
    input_buffer_size: usize,
    /// Held by a write request for all of its pieces.
    typing_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// `input_buffer_size` is clamped to at least one byte.
    pub fn new(typist: Arc<dyn Typist>, input_buffer_size: usize) -> Self {
        Self {
            typist,
            input_buffer_size: input_buffer_size.max(1),
            typing_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Error type for a single ingress request.
#[derive(Debug, Error)]
pub enum IngressError {
    #[error("unsupported content type")]
    UnsupportedMediaType,

    #[error("failed to read request body: {0}")]
    ReadBody(String),

    #[error("failed to read form input: {0}")]
    ReadForm(String),

    #[error("form field '{}' is required", PayloadSource::FORM_FIELD)]
    MissingText,

    #[error(transparent)]
    Keyboard(#[from] TypeError),

    #[error("typing task failed: {0}")]
    Task(String),
}

impl IngressError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::UnsupportedMediaType => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported content type.")
            }
            Self::ReadBody(_) => (StatusCode::SERVICE_UNAVAILABLE, "Failed to read input."),
            Self::ReadForm(_) => (StatusCode::SERVICE_UNAVAILABLE, "Failed to read form input."),
            Self::MissingText => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Form field 'text' is required",
            ),
            Self::Keyboard(TypeError::Cancelled { .. }) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Server is shutting down.")
            }
            Self::Keyboard(TypeError::Io { .. }) => {
                (StatusCode::BAD_GATEWAY, "Failed to type message.")
            }
            Self::Task(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error."),
        }
    }
}

impl IntoResponse for IngressError {
    fn into_response(self) -> Response {
        let (status, msg) = self.status_and_message();
        let body = serde_json::json!({ "error": msg });
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct AcceptedResponse {
    msg: String,
}

#[derive(Debug, Deserialize)]
struct TextForm {
    #[serde(default)]
    text: String,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Builds the ingress router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/write/string", post(write_string))
        .route("/write/stream", post(write_stream))
        .route("/health", get(health))
        .with_state(state)
}

/// Serves the ingress on `settings.bind_addr` until `shutdown` is set.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run_server(
    settings: &ServerSettings,
    typist: Arc<dyn Typist>,
    shutdown: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", settings.bind_addr))?;

    info!("listening on {}", settings.bind_addr);

    let state = AppState::new(typist, settings.input_buffer_size);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(wait_for_shutdown(shutdown))
        .await
        .context("HTTP server error")?;

    Ok(())
}

async fn wait_for_shutdown(shutdown: Arc<AtomicBool>) {
    while !shutdown.load(Ordering::Relaxed) {
        tokio::time::sleep(SHUTDOWN_POLL).await;
    }
    info!("shutdown flag set; no longer accepting requests");
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn write_string(State(state): State<AppState>, request: Request) -> Response {
    handle_write(state, request, Pacing::Paced).await
}

async fn write_stream(State(state): State<AppState>, request: Request) -> Response {
    handle_write(state, request, Pacing::Unpaced).await
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_write(state: AppState, request: Request, pacing: Pacing) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("write", %request_id, ?pacing);

    async move {
        match dispatch(&state, request, pacing).await {
            Ok(received) => {
                info!(received, "message accepted");
                let body = AcceptedResponse {
                    msg: format!("Message received ({received} char) and is being typed out"),
                };
                (StatusCode::ACCEPTED, Json(body)).into_response()
            }
            Err(e) => {
                match &e {
                    IngressError::Keyboard(TypeError::Io { .. }) | IngressError::Task(_) => {
                        error!("{e}")
                    }
                    _ => warn!("{e}"),
                }
                e.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

/// Resolves the payload source from `Content-Type` and types the text.
///
/// Returns the number of payload bytes received.
async fn dispatch(
    state: &AppState,
    request: Request,
    pacing: Pacing,
) -> Result<usize, IngressError> {
    let source = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(PayloadSource::from_content_type)
        .ok_or(IngressError::UnsupportedMediaType)?;

    let _typing = state.typing_lock.lock().await;
    debug!("acquired typing lock");

    match source {
        PayloadSource::RawBody => type_raw_body(state, request.into_body(), pacing).await,
        PayloadSource::FormField => type_form_field(state, request, pacing).await,
    }
}

/// Types a raw body as it streams in, `input_buffer_size` bytes at a time.
async fn type_raw_body(
    state: &AppState,
    body: Body,
    pacing: Pacing,
) -> Result<usize, IngressError> {
    let piece_size = state.input_buffer_size;
    let mut stream = body.into_data_stream();
    let mut pending: Vec<u8> = Vec::with_capacity(piece_size);
    let mut received = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| IngressError::ReadBody(e.to_string()))?;
        pending.extend_from_slice(&chunk);

        while pending.len() >= piece_size {
            let rest = pending.split_off(piece_size);
            let piece = std::mem::replace(&mut pending, rest);
            received += piece.len();
            type_piece(state, piece, pacing).await?;
        }
    }

    if !pending.is_empty() {
        received += pending.len();
        type_piece(state, pending, pacing).await?;
    }

    debug!("reached end of body");
    Ok(received)
}

async fn type_form_field(
    state: &AppState,
    request: Request,
    pacing: Pacing,
) -> Result<usize, IngressError> {
    let Form(form) = Form::<TextForm>::from_request(request, &())
        .await
        .map_err(|rejection| IngressError::ReadForm(rejection.body_text()))?;

    if form.text.is_empty() {
        return Err(IngressError::MissingText);
    }

    let received = form.text.len();
    type_piece(state, form.text.into_bytes(), pacing).await?;
    Ok(received)
}

/// Runs one blocking typing call off the async runtime.
async fn type_piece(
    state: &AppState,
    payload: Vec<u8>,
    pacing: Pacing,
) -> Result<usize, IngressError> {
    let preview = preview(&payload);
    let typist = Arc::clone(&state.typist);

    let written = tokio::task::spawn_blocking(move || typist.type_text(&payload, pacing))
        .await
        .map_err(|e| IngressError::Task(e.to_string()))??;

    debug!(written, "wrote '{preview}'...");
    Ok(written)
}

fn preview(payload: &[u8]) -> String {
    let end = payload.len().min(PREVIEW_LEN);
    String::from_utf8_lossy(&payload[..end]).into_owned()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::typist::MockTypist;
    use axum::body::to_bytes;
    use axum::http::Method;
    use std::io;
    use std::sync::Mutex;
    use tower::ServiceExt;

    fn router(mock: MockTypist, input_buffer_size: usize) -> Router {
        app(AppState::new(Arc::new(mock), input_buffer_size))
    }

    fn post(uri: &str, content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().method(Method::POST).uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn json_body(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_plain_text_is_typed_paced_and_accepted() {
        // Arrange
        let mut mock = MockTypist::new();
        mock.expect_type_text()
            .withf(|payload, pacing| payload == b"Hello" && *pacing == Pacing::Paced)
            .times(1)
            .returning(|payload: &[u8], _: Pacing| Ok(payload.len() * 16));

        // Act
        let resp = router(mock, 500)
            .oneshot(post("/write/string", Some("text/plain"), "Hello"))
            .await
            .unwrap();

        // Assert
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(
            json_body(resp).await["msg"],
            "Message received (5 char) and is being typed out"
        );
    }

    #[tokio::test]
    async fn test_stream_route_types_unpaced() {
        let mut mock = MockTypist::new();
        mock.expect_type_text()
            .withf(|_, pacing| *pacing == Pacing::Unpaced)
            .times(1)
            .returning(|payload: &[u8], _: Pacing| Ok(payload.len() * 16));

        let resp = router(mock, 500)
            .oneshot(post("/write/stream", Some("text/plain; charset=utf-8"), "fast"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_raw_body_is_typed_in_input_buffer_sized_pieces() {
        // Arrange
        let pieces = Arc::new(Mutex::new(Vec::<Vec<u8>>::new()));
        let recorded = Arc::clone(&pieces);
        let mut mock = MockTypist::new();
        mock.expect_type_text()
            .times(3)
            .returning(move |payload: &[u8], _: Pacing| {
                recorded.lock().unwrap().push(payload.to_vec());
                Ok(payload.len() * 16)
            });

        // Act
        let resp = router(mock, 4)
            .oneshot(post("/write/string", Some("text/plain"), "abcdefghij"))
            .await
            .unwrap();

        // Assert
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(
            *pieces.lock().unwrap(),
            vec![b"abcd".to_vec(), b"efgh".to_vec(), b"ij".to_vec()]
        );
        assert_eq!(
            json_body(resp).await["msg"],
            "Message received (10 char) and is being typed out"
        );
    }

    #[tokio::test]
    async fn test_empty_raw_body_types_nothing() {
        let mut mock = MockTypist::new();
        mock.expect_type_text().times(0);

        let resp = router(mock, 500)
            .oneshot(post("/write/string", Some("text/plain"), ""))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_form_field_text_is_typed() {
        let mut mock = MockTypist::new();
        mock.expect_type_text()
            .withf(|payload, pacing| payload == b"hi there!" && *pacing == Pacing::Paced)
            .times(1)
            .returning(|payload: &[u8], _: Pacing| Ok(payload.len() * 16));

        let resp = router(mock, 500)
            .oneshot(post(
                "/write/string",
                Some("application/x-www-form-urlencoded"),
                "text=hi+there%21",
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(
            json_body(resp).await["msg"],
            "Message received (9 char) and is being typed out"
        );
    }

    #[tokio::test]
    async fn test_form_without_text_field_is_unprocessable() {
        let mut mock = MockTypist::new();
        mock.expect_type_text().times(0);

        let resp = router(mock, 500)
            .oneshot(post(
                "/write/string",
                Some("application/x-www-form-urlencoded"),
                "other=value",
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(resp).await["error"], "Form field 'text' is required");
    }

    #[tokio::test]
    async fn test_unsupported_content_type_is_rejected() {
        let mut mock = MockTypist::new();
        mock.expect_type_text().times(0);

        let resp = router(mock, 500)
            .oneshot(post("/write/string", Some("application/json"), "{}"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_rejected() {
        let mut mock = MockTypist::new();
        mock.expect_type_text().times(0);

        let resp = router(mock, 500)
            .oneshot(post("/write/string", None, "abc"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_device_failure_is_bad_gateway() {
        let mut mock = MockTypist::new();
        mock.expect_type_text().times(1).returning(|_: &[u8], _: Pacing| {
            Err(TypeError::Io {
                bytes_written: 8,
                index: 0,
                source: io::Error::from(io::ErrorKind::BrokenPipe),
            })
        });

        let resp = router(mock, 500)
            .oneshot(post("/write/string", Some("text/plain"), "abc"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(resp).await["error"], "Failed to type message.");
    }

    #[tokio::test]
    async fn test_device_failure_stops_remaining_pieces() {
        let mut mock = MockTypist::new();
        mock.expect_type_text().times(1).returning(|_: &[u8], _: Pacing| {
            Err(TypeError::Io {
                bytes_written: 0,
                index: 0,
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            })
        });

        let resp = router(mock, 2)
            .oneshot(post("/write/string", Some("text/plain"), "abcdef"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_cancelled_typing_is_service_unavailable() {
        let mut mock = MockTypist::new();
        mock.expect_type_text().returning(|_: &[u8], _: Pacing| {
            Err(TypeError::Cancelled {
                bytes_written: 0,
                index: 0,
            })
        });

        let resp = router(mock, 500)
            .oneshot(post("/write/string", Some("text/plain"), "abc"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let resp = router(MockTypist::new(), 500)
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["status"], "ok");
    }

    #[test]
    fn test_preview_truncates_long_payloads() {
        assert_eq!(preview(b"short"), "short");
        assert_eq!(preview(&[b'x'; 64]).len(), PREVIEW_LEN);
    }

    #[test]
    fn test_task_failure_is_internal_error() {
        let (status, msg) = IngressError::Task("panicked".to_string()).status_and_message();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "Internal error.");
    }

    #[test]
    fn test_app_state_clamps_zero_buffer_size() {
        let state = AppState::new(Arc::new(MockTypist::new()), 0);
        assert_eq!(state.input_buffer_size, 1);
    }
}
