use crate::inspection::FormType;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_MAIL_API_URL: &str = "https://api.resend.com/emails";
const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000/api/send-inspection";
const DEFAULT_MAIL_FROM: &str = "Inspections <inspections@example.com>";
const DEFAULT_TRANSPORT_TIMEOUT_SECS: u64 = 30;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub mail: MailConfig,
    pub transport: TransportConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            mail: MailConfig::from_env()?,
            transport: TransportConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Transactional email provider used by the relay endpoint.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Absent keys are reported per request, not at startup.
    pub api_key: Option<String>,
    pub api_url: String,
    pub from: String,
    pub to: Vec<String>,
}

impl MailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = non_empty_var("MAIL_API_KEY");
        let api_url = non_empty_var("MAIL_API_URL").unwrap_or_else(|| DEFAULT_MAIL_API_URL.into());
        check_url("MAIL_API_URL", &api_url)?;

        let from = non_empty_var("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.into());
        let to = non_empty_var("MAIL_TO")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|address| !address.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            api_key,
            api_url,
            from,
            to,
        })
    }
}

/// Where each form is delivered and how long a delivery may take.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub relay_url: String,
    /// Forms listed here skip the relay and post straight to the webhook.
    pub webhooks: BTreeMap<FormType, String>,
    pub timeout: Duration,
}

impl TransportConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let relay_url = non_empty_var("RELAY_URL").unwrap_or_else(|| DEFAULT_RELAY_URL.into());
        check_url("RELAY_URL", &relay_url)?;

        let mut webhooks = BTreeMap::new();
        for form in FormType::ordered() {
            let name = webhook_var(form);
            if let Some(url) = non_empty_var(&name) {
                check_url(&name, &url)?;
                webhooks.insert(form, url);
            }
        }

        let timeout_secs = match non_empty_var("TRANSPORT_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            None => DEFAULT_TRANSPORT_TIMEOUT_SECS,
        };

        Ok(Self {
            relay_url,
            webhooks,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// `WEBHOOK_URL_<FORM>` with the form tag upper-snake-cased.
pub fn webhook_var(form: FormType) -> String {
    format!(
        "WEBHOOK_URL_{}",
        form.tag().replace('-', "_").to_ascii_uppercase()
    )
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn check_url(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidUrl { name: String, value: String },
    InvalidTimeout(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidUrl { name, value } => {
                write!(f, "{name} must be an http(s) URL, got '{value}'")
            }
            ConfigError::InvalidTimeout(value) => write!(
                f,
                "TRANSPORT_TIMEOUT_SECS must be a positive number of seconds, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidUrl { .. }
            | ConfigError::InvalidTimeout(_) => None,
        }
    }
}
