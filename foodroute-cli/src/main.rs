//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use foodroute_cli::CliError;

fn main() {
    match foodroute_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("foodroute: {err}");
            std::process::exit(1);
        }
    }
}
