//! Tracing filter for the binary

use tracing_subscriber::EnvFilter;

/// Crates whose events `--debug` raises to debug level
pub const DEBUG_TARGETS: [&str; 3] = ["spaces_cli", "sx_core", "sx_s3"];

/// `--debug` wins over `RUST_LOG`; without either only warnings are shown
pub fn filter(debug: bool) -> EnvFilter {
    if debug {
        let directives: Vec<String> = DEBUG_TARGETS
            .iter()
            .map(|target| format!("{target}=debug"))
            .collect();
        EnvFilter::new(directives.join(","))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}
