use crate::cli::ServeArgs;
use crate::infra::{http_client, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fleet_inspection::config::AppConfig;
use fleet_inspection::error::AppError;
use fleet_inspection::relay::{HttpMailProvider, RelayState};
use fleet_inspection::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if config.mail.api_key.is_none() {
        warn!("MAIL_API_KEY is not set; relay requests will fail until it is configured");
    }
    if config.mail.to.is_empty() {
        warn!("MAIL_TO is empty; relay requests have no recipients");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let client = http_client(config.transport.timeout).map_err(std::io::Error::other)?;
    let provider = Arc::new(HttpMailProvider::from_config(client, &config.mail));
    let relay = RelayState::new(provider, &config.mail);

    let app = with_service_routes(relay)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "inspection relay ready");

    axum::serve(listener, app).await?;
    Ok(())
}
