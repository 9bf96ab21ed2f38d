//! url command - Print the public URL of an object
//!
//! No request is made; the URL is derived from the region and the
//! configured storage domain.

use clap::Args;
use serde::Serialize;
use sx_core::{credentials::DEFAULT_REGION, parse_object_path, CredentialStore};

use super::session::{report, Session};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Print the public URL of an object
#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Object path (bucket/key)
    pub path: String,

    /// Region of the bucket (defaults to the logged-in region)
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Debug, Serialize)]
struct UrlOutput {
    bucket: String,
    key: String,
    url: String,
}

/// Execute the url command
pub async fn execute(args: UrlArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    match run(args, &formatter) {
        Ok(()) => ExitCode::Success,
        Err(e) => report(&formatter, e),
    }
}

fn run(args: UrlArgs, formatter: &Formatter) -> anyhow::Result<()> {
    let (bucket, key) = parse_object_path(&args.path)?;
    let session = Session::load()?;

    let region = match args.region {
        Some(region) => region,
        None => session
            .store
            .get()?
            .map(|c| c.region)
            .unwrap_or_else(|| DEFAULT_REGION.to_string()),
    };
    let url = session.endpoint(&region)?.object_url(&bucket, &key);

    if formatter.is_json() {
        formatter.json(&UrlOutput { bucket, key, url });
    } else {
        formatter.println(&url);
    }
    Ok(())
}
