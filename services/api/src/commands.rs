use crate::infra::{http_client, parse_form, sample_checklist, sample_session};
use chrono::Local;
use clap::Args;
use fleet_inspection::config::AppConfig;
use fleet_inspection::error::AppError;
use fleet_inspection::inspection::FormType;
use fleet_inspection::submission::{Route, RoutedTransport, SubmissionOrchestrator, TransportRoutes};
use fleet_inspection::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// Form tag: monitor, medical-supply, mechanical or cleaning
    #[arg(long, value_parser = parse_form)]
    pub(crate) form: FormType,
    /// Write the report to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Form tag: monitor, medical-supply, mechanical or cleaning
    #[arg(long, value_parser = parse_form)]
    pub(crate) form: FormType,
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let checklist = sample_checklist(args.form, sample_session()?)?;
    let html = checklist.render(Local::now().naive_local());

    match args.output {
        Some(path) => {
            std::fs::write(&path, html)?;
            println!("Rapport {} écrit dans {}", args.form.tag(), path.display());
        }
        None => print!("{html}"),
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let routes = TransportRoutes::from_config(&config.transport);
    match routes.route(args.form) {
        Some(Route::Webhook(url)) => println!("Destination : webhook {url}"),
        Some(Route::Relay(url)) => println!("Destination : relais {url}"),
        None => {}
    }

    let client = http_client(config.transport.timeout).map_err(std::io::Error::other)?;
    let transport = Arc::new(RoutedTransport::new(client, routes));
    let mut orchestrator =
        SubmissionOrchestrator::new(transport).with_timeout(config.transport.timeout);

    let mut checklist = sample_checklist(args.form, sample_session()?)?;
    orchestrator.request_submit(&checklist)?;
    info!(form = args.form.tag(), "sample checklist validated, sending");

    let receipt = orchestrator.confirm(&mut checklist).await?;
    println!("{} ({})", receipt.message, receipt.file_name);
    if let Some(id) = receipt.delivery_id {
        println!("Identifiant du message : {id}");
    }
    Ok(())
}
