use crate::demo::{run_demo, run_predict, DemoArgs, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use cutoff_compass::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Cutoff Compass",
    about = "Estimate college admission chances from round-wise cutoff history",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a single prediction against the configured catalog
    Predict(PredictArgs),
    /// Walk through sample predictions on the built-in catalog
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
        Command::Predict(args) => run_predict(args),
        Command::Demo(args) => run_demo(args),
    }
}
