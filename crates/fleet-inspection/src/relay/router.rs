use super::email::{InspectionEmail, RelayPayload};
use super::provider::{MailError, MailProvider, OutgoingMail};
use crate::config::MailConfig;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Local;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const SEND_INSPECTION_PATH: &str = "/api/send-inspection";

/// Everything the relay handler needs per request.
#[derive(Clone)]
pub struct RelayState {
    provider: Arc<dyn MailProvider>,
    from: String,
    to: Vec<String>,
}

impl RelayState {
    pub fn new(provider: Arc<dyn MailProvider>, config: &MailConfig) -> Self {
        Self {
            provider,
            from: config.from.clone(),
            to: config.to.clone(),
        }
    }
}

pub fn relay_router(state: RelayState) -> Router {
    Router::new()
        .route(SEND_INSPECTION_PATH, post(send_handler))
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

pub(crate) async fn send_handler(
    State(state): State<RelayState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(%rejection, "rejected relay request body");
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Corps de requête invalide : {}", rejection.body_text()),
            );
        }
    };

    let form_type = body
        .get("formType")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|tag| !tag.is_empty());
    let raw_payload = body.get("payload").filter(|payload| payload.is_object());
    let (Some(form_type), Some(raw_payload)) = (form_type, raw_payload) else {
        return error_response(StatusCode::BAD_REQUEST, "formType et payload sont requis");
    };

    let payload: RelayPayload = match serde_json::from_value(raw_payload.clone()) {
        Ok(payload) => payload,
        Err(err) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("payload invalide : {err}"),
            )
        }
    };

    if state.to.is_empty() {
        error!("relay has no recipients configured");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            MailError::NoRecipients.to_string(),
        );
    }

    let email = InspectionEmail::compose(form_type, &payload, Local::now().naive_local());
    let mail = OutgoingMail {
        from: state.from.clone(),
        to: state.to.clone(),
        subject: email.subject,
        html: email.html,
    };

    match state.provider.send(&mail).await {
        Ok(id) => {
            info!(form_type, %id, subject = %mail.subject, "inspection email sent");
            (StatusCode::OK, Json(json!({ "success": true, "id": id }))).into_response()
        }
        Err(err) => {
            error!(form_type, error = %err, "inspection email failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}
