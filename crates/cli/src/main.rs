//! sx - DigitalOcean Spaces browser
//!
//! A command-line interface for listing buckets and objects in Spaces and
//! other S3-compatible services that accept legacy signed requests.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*};

use spaces_cli::commands::{self, Cli};
use spaces_cli::exit_code::ExitCode;
use spaces_cli::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for --json
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(logging::filter(cli.debug))
        .init();

    let exit_code = tokio::select! {
        code = commands::execute(cli) => code,
        _ = tokio::signal::ctrl_c() => ExitCode::Interrupted,
    };

    std::process::exit(exit_code.as_i32());
}
