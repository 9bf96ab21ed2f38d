//! Process exit codes for sx
//!
//! Scripts rely on these values; changing one is a breaking change. The
//! numeric codes come from the library error types, so a new error variant
//! picks up its code there rather than here.

use sx_core::{Error, OperationError, SigningError};

/// How a command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,

    /// Bad flags, malformed path or bucket name
    UsageError = 2,

    /// Could not reach the endpoint
    NetworkError = 3,

    /// Not logged in, or the service refused the keys
    AuthError = 4,

    /// Bucket or key does not exist
    NotFound = 5,

    /// Ctrl+C while a request was in flight
    Interrupted = 130,
}

impl ExitCode {
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a library exit code back onto the enum; unknown codes are general errors
    const fn from_library(code: i32) -> Self {
        match code {
            2 => Self::UsageError,
            3 => Self::NetworkError,
            4 => Self::AuthError,
            5 => Self::NotFound,
            _ => Self::GeneralError,
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        Self::from_library(err.exit_code())
    }
}

impl From<&OperationError> for ExitCode {
    fn from(err: &OperationError) -> Self {
        Self::from_library(err.exit_code())
    }
}

impl From<&SigningError> for ExitCode {
    fn from(_: &SigningError) -> Self {
        Self::AuthError
    }
}
