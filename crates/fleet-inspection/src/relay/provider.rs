use crate::config::MailConfig;
use crate::submission::transport::rejection_message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Request body accepted by the transactional email API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("clé API du fournisseur de courriel non configurée")]
    MissingCredential,
    #[error("aucun destinataire configuré")]
    NoRecipients,
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("erreur réseau : {0}")]
    Network(#[from] reqwest::Error),
    #[error("réponse invalide du fournisseur : {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait MailProvider: Send + Sync {
    /// Send one message and return the provider's message id.
    async fn send(&self, mail: &OutgoingMail) -> Result<String, MailError>;
}

#[derive(Debug, Deserialize)]
struct ProviderAck {
    id: String,
}

/// Bearer-authenticated JSON client for the provider's `/emails` endpoint.
#[derive(Debug, Clone)]
pub struct HttpMailProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl HttpMailProvider {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key,
        }
    }

    pub fn from_config(client: reqwest::Client, config: &MailConfig) -> Self {
        Self::new(client, config.api_url.clone(), config.api_key.clone())
    }
}

#[async_trait]
impl MailProvider for HttpMailProvider {
    async fn send(&self, mail: &OutgoingMail) -> Result<String, MailError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(MailError::MissingCredential)?;

        debug!(url = %self.api_url, subject = %mail.subject, "sending email");
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(mail)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(MailError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status, &body),
            });
        }

        let ack: ProviderAck = serde_json::from_str(&body)
            .map_err(|err| MailError::InvalidResponse(err.to_string()))?;
        Ok(ack.id)
    }
}
