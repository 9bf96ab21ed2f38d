//! Output formatting utilities
//!
//! Formatters for human-readable and JSON output, plus the spinner shown
//! while a request is in flight.

mod formatter;
mod progress;

use sx_core::config::Defaults;

pub use formatter::Formatter;
pub use progress::Spinner;

/// Output configuration derived from CLI flags and config defaults
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Disable progress spinner
    pub no_progress: bool,
    /// Suppress non-error output
    pub quiet: bool,
}

impl OutputConfig {
    /// Apply the `[defaults]` table of the config file
    ///
    /// Flags can only switch features off, so a default never overrides one.
    pub fn with_defaults(mut self, defaults: &Defaults) -> Self {
        self.json |= defaults.output.eq_ignore_ascii_case("json");
        self.no_color |= defaults.color.eq_ignore_ascii_case("never");
        self.no_progress |= !defaults.progress;
        self
    }
}
