//! HTTP webhook receiver.
//!
//! Mounts the Slack events route, a liveness check, and a failure snapshot
//! behind an axum router. Every event route request is verified, parsed,
//! and handed to a spawned handler task; the HTTP response is sent as soon
//! as the handler acknowledges.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::report::EventKind;
use crate::slack::ack::Ack;
use crate::slack::events::{InboundEvent, InboundRequest};
use crate::slack::handlers;
use crate::slack::signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::state::AppState;
use crate::{AppError, Result};

/// Handler for `GET /health`: returns 200 OK with a plain-text body.
async fn health() -> &'static str {
    "ok"
}

/// Handler for `GET /failures`: failure counts by event and error kind.
async fn failures(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, u64>> {
    Json(state.reporter.snapshot())
}

/// Build the receiver router for `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let events_path = state.config.events_path.clone();
    Router::new()
        .route(&events_path, post(handle_events))
        .route("/health", get(health))
        .route("/failures", get(failures))
        .with_state(state)
}

/// Serve the receiver on an already-bound listener until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Io` if the server fails.
pub async fn serve(listener: TcpListener, state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, events_path = state.config.events_path, "approval relay listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await
        .map_err(|err| AppError::Io(format!("http server error: {err}")))?;

    info!("approval relay shut down");
    Ok(())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn handle_events(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(err) = state.verifier.verify(
        header_str(&headers, TIMESTAMP_HEADER),
        &body,
        header_str(&headers, SIGNATURE_HEADER),
    ) {
        warn!(%err, "rejected webhook request");
        state.reporter.report(EventKind::Request, &err);
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let content_type = header_str(&headers, header::CONTENT_TYPE.as_str());
    match InboundRequest::parse(content_type, &body) {
        Ok(InboundRequest::UrlVerification { challenge }) => {
            info!("answered url verification challenge");
            Json(serde_json::json!({ "challenge": challenge })).into_response()
        }
        Ok(InboundRequest::SslCheck) => {
            debug!("answered ssl check");
            StatusCode::OK.into_response()
        }
        Ok(InboundRequest::Event(event)) => acknowledge_and_handle(state, event).await,
        Err(err) => {
            state.reporter.report(EventKind::Request, &err);
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

/// Run the handler in its own task and answer once it acknowledges.
///
/// The follow-up call keeps running after the response is sent; its
/// outcome goes to the failure reporter.
async fn acknowledge_and_handle(state: Arc<AppState>, event: InboundEvent) -> Response {
    let kind = event.kind();
    let (ack, acked) = Ack::channel();

    tokio::spawn(async move {
        if let Err(err) = handlers::dispatch(event, ack, &state).await {
            state.reporter.report(kind, &err);
        }
    });

    if acked.await.is_err() {
        warn!(event_kind = %kind, "handler finished without acknowledging");
    }
    StatusCode::OK.into_response()
}
