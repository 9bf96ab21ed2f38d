//! Credential and client resolution shared by the commands
//!
//! This is the only place the CLI turns stored state into a client. Errors
//! are collected with anyhow context and mapped back to an exit code by
//! walking the cause chain.

use std::time::Duration;

use anyhow::Context;
use sx_core::{
    Config, ConfigManager, CredentialStore, Credentials, Endpoint, Error, FileCredentialStore,
    ObjectStore, OperationError, SigningError, TransportError,
};
use sx_s3::{ReqwestTransport, SpacesClient};

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Config file plus the credential store living inside it
pub struct Session {
    pub config: Config,
    pub store: FileCredentialStore,
}

impl Session {
    /// Load the config file from the default location
    pub fn load() -> anyhow::Result<Self> {
        let manager = ConfigManager::new()?;
        let config = manager.load().with_context(|| {
            format!(
                "failed to load configuration from {}",
                manager.config_path().display()
            )
        })?;
        Ok(Self {
            config,
            store: FileCredentialStore::with_config_manager(manager),
        })
    }

    /// Client for the stored credentials
    pub fn client(&self) -> anyhow::Result<Box<dyn ObjectStore>> {
        let credentials = self.store.require()?;
        self.client_for(credentials)
    }

    /// Client for explicit credentials, using this session's endpoint and timeouts
    pub fn client_for(&self, credentials: Credentials) -> anyhow::Result<Box<dyn ObjectStore>> {
        let endpoint = self.endpoint(&credentials.region)?;
        let transport = ReqwestTransport::with_timeouts(
            Duration::from_millis(self.config.timeout.connect_ms),
            Duration::from_millis(self.config.timeout.read_ms),
        )
        .context("failed to initialize HTTP transport")?;

        let client = SpacesClient::with_endpoint(credentials, endpoint, transport)
            .context("invalid credentials")?;
        Ok(Box::new(client))
    }

    /// Endpoint for `region` under the configured storage domain
    pub fn endpoint(&self, region: &str) -> anyhow::Result<Endpoint> {
        Endpoint::from_config(region, &self.config.endpoint)
            .with_context(|| format!("invalid endpoint for region '{region}'"))
    }
}

/// Map an error to the exit code of the first typed cause in its chain
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<OperationError>() {
            return ExitCode::from(e);
        }
        if let Some(e) = cause.downcast_ref::<Error>() {
            return ExitCode::from(e);
        }
        if let Some(e) = cause.downcast_ref::<SigningError>() {
            return ExitCode::from(e);
        }
        if cause.downcast_ref::<TransportError>().is_some() {
            return ExitCode::NetworkError;
        }
    }
    ExitCode::GeneralError
}

/// Print the error with its causes and return the matching exit code
pub fn report(formatter: &Formatter, err: anyhow::Error) -> ExitCode {
    tracing::debug!(error = ?err, "command failed");
    formatter.error(&format!("{err:#}"));
    exit_code_for(&err)
}
