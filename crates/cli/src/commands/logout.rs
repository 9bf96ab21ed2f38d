//! logout command - Forget stored access keys

use anyhow::Context;
use clap::Args;
use sx_core::CredentialStore;

use super::session::{report, Session};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove stored access keys
#[derive(Args, Debug)]
pub struct LogoutArgs {}

/// Execute the logout command
pub async fn execute(_args: LogoutArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    match run(&formatter) {
        Ok(()) => ExitCode::Success,
        Err(e) => report(&formatter, e),
    }
}

fn run(formatter: &Formatter) -> anyhow::Result<()> {
    let session = Session::load()?;
    let was_logged_in = session.store.get()?.is_some();
    session.store.clear().context("failed to remove credentials")?;

    if formatter.is_json() {
        formatter.json(&serde_json::json!({ "logged_out": was_logged_in }));
    } else if was_logged_in {
        formatter.success("Logged out");
    } else {
        formatter.println("Not logged in");
    }
    Ok(())
}
