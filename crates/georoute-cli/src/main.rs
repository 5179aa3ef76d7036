mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use georoute_cli::args::RouteArgs;
use georoute_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Geospatial shortest-path routing")]
struct Cli {
    /// Log filter (e.g. `debug`, `georoute_lib=trace`); falls back to `RUST_LOG`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a route between two coordinates.
    Route(RouteArgs),
    /// Compute a route and replay the search step by step.
    Trace(RouteArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match &cli.command {
        Command::Route(args) => commands::route::handle_route_command(args, cli.format),
        Command::Trace(args) => commands::trace::handle_trace_command(args, cli.format),
    }
}

fn init_tracing(level: Option<&str>) {
    let env_filter = level
        .map(|l| EnvFilter::try_new(l).map_err(|_| ()))
        .unwrap_or_else(|| EnvFilter::try_from_default_env().map_err(|_| ()))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
