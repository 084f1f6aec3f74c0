//! Command-line interface for planning donation pickup and delivery routes.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

mod error;
mod fs;
mod request;
mod route;

pub use error::CliError;

use route::{RouteArgs, RouteKind, run_route};

const ARG_REQUEST: &str = "request";
const ARG_STRATEGY: &str = "strategy";
const ARG_API_KEY: &str = "api-key";
const ARG_BASE_URL: &str = "base-url";
const ARG_ASSUMED_SPEED: &str = "assumed-speed-kmh";
const ARG_PER_STOP_MINUTES: &str = "per-stop-minutes";
const ARG_REQUEST_TIMEOUT: &str = "request-timeout-secs";
const ENV_REQUEST: &str = "FOODROUTE_REQUEST_PATH";

/// Run the foodroute CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments, configuration or the request are
/// unusable, or when the response cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.verbose);
    match cli.command {
        Command::Pickup(args) => run_route(RouteKind::Pickup, args),
        Command::Deliver(args) => run_route(RouteKind::Deliver, args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Parser)]
#[command(
    name = "foodroute",
    about = "Route planning for food donation pickups and camp deliveries",
    version
)]
struct Cli {
    /// Log debug detail, including per-pair distance fallbacks.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Order pending pickups nearest-first, optionally ending at a destination.
    Pickup(RouteArgs),
    /// Route to the nearest collection camp.
    Deliver(RouteArgs),
}

#[cfg(test)]
mod tests;
