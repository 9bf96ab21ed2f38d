//! login command - Store access keys for later commands
//!
//! The keys are checked with a bucket listing before they are saved, so a
//! typo is caught here rather than on the next `ls`.

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use sx_core::{credentials::DEFAULT_REGION, CredentialStore, Credentials};
use sx_s3::RequestSigner;

use super::session::{report, Session};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, Spinner};

/// Save Spaces access keys
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Access key ID
    #[arg(env = "SX_ACCESS_KEY")]
    pub access_key: String,

    /// Secret access key
    #[arg(env = "SX_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Region the keys are used against
    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Save the keys without contacting the service
    #[arg(long)]
    pub no_verify: bool,
}

#[derive(Debug, Serialize)]
struct LoginOutput {
    access_key_id: String,
    region: String,
    verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    buckets: Option<usize>,
}

/// Execute the login command
pub async fn execute(args: LoginArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    match run(args, &formatter).await {
        Ok(()) => ExitCode::Success,
        Err(e) => report(&formatter, e),
    }
}

async fn run(args: LoginArgs, formatter: &Formatter) -> anyhow::Result<()> {
    let credentials = Credentials::new(args.access_key, args.secret_key, args.region);
    RequestSigner::new(&credentials).context("cannot sign requests with these keys")?;

    let session = Session::load()?;
    let buckets = if args.no_verify {
        None
    } else {
        let client = session.client_for(credentials.clone())?;
        let spinner = Spinner::start(formatter.config(), "Verifying access keys...");
        let buckets = client
            .list_buckets()
            .await
            .context("the service rejected these keys")?;
        spinner.finish();
        Some(buckets.len())
    };

    let output = LoginOutput {
        access_key_id: credentials.access_key_id.clone(),
        region: credentials.region.clone(),
        verified: buckets.is_some(),
        buckets,
    };
    session.store.put(credentials).context("failed to save credentials")?;
    tracing::debug!(region = %output.region, verified = output.verified, "stored credentials");

    if formatter.is_json() {
        formatter.json(&output);
    } else {
        match output.buckets {
            Some(count) => formatter.success(&format!(
                "Logged in to {} ({count} buckets)",
                output.region
            )),
            None => formatter.success(&format!(
                "Saved keys for {} without verification",
                output.region
            )),
        }
    }
    Ok(())
}
