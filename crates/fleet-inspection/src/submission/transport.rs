//! Delivery of submission payloads to a webhook automation or the relay.

use super::payload::SubmissionPayload;
use crate::config::TransportConfig;
use crate::inspection::FormType;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Acknowledgement returned by a successful delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Provider message id, when the remote side reports one.
    pub id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("erreur réseau : {0}")]
    Network(String),
    #[error("délai d'attente dépassé après {} s", .0.as_secs())]
    Timeout(Duration),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("réponse invalide : {0}")]
    InvalidResponse(String),
    #[error("aucune destination configurée pour le formulaire {}", .0.tag())]
    Unrouted(FormType),
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            return Self::Network(format!("délai dépassé ({value})"));
        }
        Self::Network(value.to_string())
    }
}

/// Something that can carry a payload to its destination.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, payload: &SubmissionPayload) -> Result<Delivery, TransportError>;
}

/// Best human-readable reason out of a failed response: the body's
/// `message`, then `error`, then the raw body, then the status line.
pub(crate) fn rejection_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = fields.get(key).and_then(Value::as_str) {
                if !text.trim().is_empty() {
                    return text.to_string();
                }
            }
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status_line(status)
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {reason}", status.as_u16()),
        None => format!("HTTP {}", status.as_u16()),
    }
}

/// Posts the payload JSON to a webhook automation URL.
#[derive(Debug, Clone)]
pub struct WebhookTransport {
    client: reqwest::Client,
    url: String,
}

impl WebhookTransport {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Transport for WebhookTransport {
    async fn send(&self, payload: &SubmissionPayload) -> Result<Delivery, TransportError> {
        debug!(url = %self.url, form = payload.form_type.tag(), "posting to webhook");
        let response = self.client.post(&self.url).json(payload).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(Delivery::default());
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status_line(status)
        } else {
            body
        };
        Err(TransportError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayEnvelope<'a> {
    form_type: &'static str,
    payload: &'a SubmissionPayload,
}

#[derive(Debug, Deserialize)]
struct RelayAck {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Posts `{formType, payload}` to the email relay endpoint.
#[derive(Debug, Clone)]
pub struct RelayTransport {
    client: reqwest::Client,
    url: String,
}

impl RelayTransport {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Transport for RelayTransport {
    async fn send(&self, payload: &SubmissionPayload) -> Result<Delivery, TransportError> {
        debug!(url = %self.url, form = payload.form_type.tag(), "posting to relay");
        let envelope = RelayEnvelope {
            form_type: payload.form_type.tag(),
            payload,
        };
        let response = self.client.post(&self.url).json(&envelope).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status, &body),
            });
        }

        let ack: RelayAck = serde_json::from_str(&body)
            .map_err(|err| TransportError::InvalidResponse(err.to_string()))?;
        if !ack.success {
            return Err(TransportError::InvalidResponse(
                ack.error
                    .unwrap_or_else(|| "le relais n'a pas confirmé l'envoi".to_string()),
            ));
        }
        Ok(Delivery { id: ack.id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Webhook(String),
    Relay(String),
}

/// Static table deciding where each form is delivered.
#[derive(Debug, Clone, Default)]
pub struct TransportRoutes {
    routes: BTreeMap<FormType, Route>,
}

impl TransportRoutes {
    /// Every form goes to the relay unless a webhook URL is configured for it.
    pub fn from_config(config: &TransportConfig) -> Self {
        let routes = FormType::ordered()
            .into_iter()
            .map(|form| {
                let route = match config.webhooks.get(&form) {
                    Some(url) => Route::Webhook(url.clone()),
                    None => Route::Relay(config.relay_url.clone()),
                };
                (form, route)
            })
            .collect();
        Self { routes }
    }

    pub fn with_route(mut self, form: FormType, route: Route) -> Self {
        self.routes.insert(form, route);
        self
    }

    pub fn route(&self, form: FormType) -> Option<&Route> {
        self.routes.get(&form)
    }
}

/// Dispatches each payload according to [`TransportRoutes`].
#[derive(Debug, Clone)]
pub struct RoutedTransport {
    client: reqwest::Client,
    routes: TransportRoutes,
}

impl RoutedTransport {
    pub fn new(client: reqwest::Client, routes: TransportRoutes) -> Self {
        Self { client, routes }
    }

    pub fn routes(&self) -> &TransportRoutes {
        &self.routes
    }
}

#[async_trait]
impl Transport for RoutedTransport {
    async fn send(&self, payload: &SubmissionPayload) -> Result<Delivery, TransportError> {
        match self.routes.route(payload.form_type) {
            Some(Route::Webhook(url)) => {
                WebhookTransport::new(self.client.clone(), url.as_str())
                    .send(payload)
                    .await
            }
            Some(Route::Relay(url)) => {
                RelayTransport::new(self.client.clone(), url.as_str())
                    .send(payload)
                    .await
            }
            None => Err(TransportError::Unrouted(payload.form_type)),
        }
    }
}
