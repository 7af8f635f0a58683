use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::config::MailConfig;
use crate::relay::provider::{MailError, MailProvider, OutgoingMail};
use crate::relay::router::{relay_router, RelayState, SEND_INSPECTION_PATH};

/// Records every message and answers with a canned outcome.
#[derive(Default)]
pub(super) struct RecordingProvider {
    sent: Mutex<Vec<OutgoingMail>>,
    failure: Option<String>,
}

impl RecordingProvider {
    pub(super) fn failing(message: &str) -> Self {
        Self {
            sent: Mutex::default(),
            failure: Some(message.to_string()),
        }
    }

    pub(super) fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().expect("provider mutex poisoned").clone()
    }
}

#[async_trait]
impl MailProvider for RecordingProvider {
    async fn send(&self, mail: &OutgoingMail) -> Result<String, MailError> {
        self.sent
            .lock()
            .expect("provider mutex poisoned")
            .push(mail.clone());
        match &self.failure {
            Some(message) => Err(MailError::Rejected {
                status: 422,
                message: message.clone(),
            }),
            None => Ok("email_123".to_string()),
        }
    }
}

pub(super) fn mail_config() -> MailConfig {
    MailConfig {
        api_key: Some("re_test".to_string()),
        api_url: "http://127.0.0.1:9/emails".to_string(),
        from: "Inspections <inspections@example.com>".to_string(),
        to: vec!["garage@example.com".to_string()],
    }
}

pub(super) fn router_with(provider: Arc<RecordingProvider>) -> Router {
    relay_router(RelayState::new(provider, &mail_config()))
}

pub(super) fn post_json(body: impl Into<Body>) -> Request<Body> {
    Request::post(SEND_INSPECTION_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request builds")
}

pub(super) async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}
