use crate::commands::{run_demo, run_preview, DemoArgs, PreviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fleet_inspection::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Fleet Inspection",
    about = "Serve the inspection email relay and exercise the checklist forms",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP relay service (default command)
    Serve(ServeArgs),
    /// Render the HTML report of a sample completed checklist
    Preview(PreviewArgs),
    /// Fill a sample checklist and submit it through the configured routes
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Preview(args) => run_preview(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
