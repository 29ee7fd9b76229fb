//! HTTP handlers for the event gateway.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::{HeaderMap, StatusCode};

use crate::application::Dispatcher;
use crate::domain::dialog::Prompt;

use super::dto::{ErrorDto, InboundEventDto, PromptDto};
use super::signature::{SignatureError, SignatureVerifier, SIGNATURE_HEADER};

/// Shared state handed to every gateway handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub verifier: Arc<SignatureVerifier>,
}

impl AppState {
    /// Creates the gateway state.
    pub fn new(dispatcher: Arc<Dispatcher>, verifier: SignatureVerifier) -> Self {
        Self {
            dispatcher,
            verifier: Arc::new(verifier),
        }
    }
}

/// `POST /v1/events` - verifies, decodes, and dispatches one inbound event.
pub async fn receive_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let Some(signature) = signature else {
        return unauthorized(SignatureError::MissingHeader);
    };
    if let Err(err) = state.verifier.verify(&body, signature) {
        return unauthorized(err);
    }

    let dto: InboundEventDto = match serde_json::from_slice(&body) {
        Ok(dto) => dto,
        Err(err) => {
            return bad_request(format!("invalid event body: {}", err));
        }
    };

    let envelope = match dto.into_envelope() {
        Ok(envelope) => envelope,
        Err(err) => {
            return bad_request(err.to_string());
        }
    };

    match state.dispatcher.dispatch(envelope).await {
        Ok(prompt) => (StatusCode::OK, Json(PromptDto::from(prompt))).into_response(),
        // The engine answers recoverable conditions with notice prompts
        // itself; should one still surface here, it stays in-band.
        Err(err) if err.is_user_recoverable() => {
            tracing::warn!(error = %err, "recoverable dialog error reached the gateway");
            (
                StatusCode::OK,
                Json(PromptDto::from(Prompt::text(err.message))),
            )
                .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "event dispatch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorDto::new("internal", "event processing failed")),
            )
                .into_response()
        }
    }
}

/// `GET /healthz` - liveness probe.
pub async fn healthz() -> &'static str {
    "ok"
}

fn unauthorized(err: SignatureError) -> Response {
    tracing::warn!(error = %err, "rejected unsigned or mis-signed request");
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorDto::new("unauthorized", err.to_string())),
    )
        .into_response()
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorDto::new("bad_request", message)),
    )
        .into_response()
}
