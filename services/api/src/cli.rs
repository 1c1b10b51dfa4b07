use crate::console::{run_list, run_metrics, run_resolve, ListArgs, MetricsArgs, ResolveArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use saas_classifier::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "SaaS Classifier",
    about = "Serve and inspect the application classification dashboard",
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
    /// Print the classification table
    List(ListArgs),
    /// Print the metrics summary panel
    Metrics(MetricsArgs),
    /// Resolve the effective productivity verdict for one record
    Resolve(ResolveArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CatalogArgs {
    /// Catalog CSV export to load instead of the configured source
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::List(args) => run_list(args),
        Command::Metrics(args) => run_metrics(args),
        Command::Resolve(args) => run_resolve(args),
    }
}
