//! sx CLI library
//!
//! Exposes the command tree so the binary stays a thin entry point.

pub mod commands;
pub mod exit_code;
pub mod logging;
pub mod output;
