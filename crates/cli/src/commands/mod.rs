//! CLI command definitions and execution
//!
//! Each subcommand lives in its own module with an `Args` struct and an
//! `execute` function returning an exit code.

use clap::{Parser, Subcommand};
use sx_core::ConfigManager;

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

mod completions;
mod login;
mod logout;
mod ls;
mod session;
mod url;

/// sx - browse DigitalOcean Spaces from the terminal
///
/// Lists buckets and objects in S3-compatible Spaces storage, presenting
/// flat object keys as folders and files.
#[derive(Parser, Debug)]
#[command(name = "sx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinner
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save access keys, verifying them against the service
    Login(login::LoginArgs),

    /// Remove saved access keys
    Logout(logout::LogoutArgs),

    /// List buckets, or folders and files under a prefix
    Ls(ls::LsArgs),

    /// Print the public URL of an object
    Url(url::UrlArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

impl Cli {
    /// Output settings from the flags, merged with the config file defaults
    pub fn output_config(&self) -> OutputConfig {
        let flags = OutputConfig {
            json: self.json,
            no_color: self.no_color,
            no_progress: self.no_progress,
            quiet: self.quiet,
        };

        match ConfigManager::new().and_then(|m| m.load()) {
            Ok(config) => flags.with_defaults(&config.defaults),
            Err(e) => {
                tracing::debug!(error = %e, "using built-in output defaults");
                flags
            }
        }
    }
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = cli.output_config();

    match cli.command {
        Commands::Login(args) => login::execute(args, output_config).await,
        Commands::Logout(args) => logout::execute(args, output_config).await,
        Commands::Ls(args) => ls::execute(args, output_config).await,
        Commands::Url(args) => url::execute(args, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sx", "ls", "media/photos", "--json", "--recursive"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Ls(args) => {
                assert_eq!(args.path.as_deref(), Some("media/photos"));
                assert!(args.recursive);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_ls_without_path_lists_buckets() {
        let cli = Cli::try_parse_from(["sx", "ls"]).unwrap();
        assert!(matches!(cli.command, Commands::Ls(ls::LsArgs { path: None, .. })));
    }

    #[test]
    fn test_login_region_defaults() {
        let cli = Cli::try_parse_from(["sx", "login", "AKID", "secret"]).unwrap();
        match cli.command {
            Commands::Login(args) => {
                assert_eq!(args.access_key, "AKID");
                assert_eq!(args.region, "nyc3");
                assert!(!args.no_verify);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["sx", "cp", "a", "b"]).is_err());
    }
}
