//! Error types for sx-core
//!
//! `Error` covers local concerns (configuration, credential storage, paths).
//! `SigningError`, `DecodeError` and `OperationError` describe failures of the
//! protocol client and are defined here so every crate shares one taxonomy.
//! All of them map onto the CLI exit codes through `exit_code()`.

use thiserror::Error;

/// Result type alias for sx-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for local sx-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// No credentials have been stored yet
    #[error("Not logged in: run `sx login` first")]
    NotLoggedIn,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) => 2, // UsageError
            Error::Config(_) => 2,      // UsageError
            Error::NotLoggedIn => 4,    // AuthError
            _ => 1,                     // GeneralError
        }
    }
}

/// Credential material could not be loaded into the signing primitive
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// Access key id is empty
    #[error("Access key id must not be empty")]
    EmptyAccessKey,

    /// Secret key is empty
    #[error("Secret access key must not be empty")]
    EmptySecret,

    /// The keyed hash rejected the secret
    #[error("Secret access key rejected by signer: {0}")]
    InvalidKey(String),
}

/// A response body could not be turned into records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The body is not a well-formed XML document
    ///
    /// Only the body length is carried; the raw content never is.
    #[error("Malformed response body ({len} bytes): {reason}")]
    MalformedBody { len: usize, reason: String },

    /// A well-formed document of the wrong kind for the operation
    #[error("Unexpected response document: expected {expected}, found {found}")]
    UnexpectedDocument {
        expected: &'static str,
        found: &'static str,
    },
}

/// Coarse classification of transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, DNS failure, reset
    Connect,
    /// TLS negotiation or certificate failure
    Tls,
    /// Connect or read timeout
    Timeout,
    /// Anything else below the HTTP layer
    Other,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransportErrorKind::Connect => "connection failed",
            TransportErrorKind::Tls => "TLS negotiation failed",
            TransportErrorKind::Timeout => "timed out",
            TransportErrorKind::Other => "transport error",
        };
        f.write_str(name)
    }
}

/// A network-level failure reported by a transport
#[derive(Error, Debug)]
#[error("{kind}: {source}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new(
        kind: TransportErrorKind,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }
}

/// Failure of a list operation against the storage service
#[derive(Error, Debug)]
pub enum OperationError {
    /// Caller passed an unusable argument (e.g. empty bucket name)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The service answered with a structured error document
    #[error("{code}: {message}")]
    RemoteError { code: String, message: String },

    /// The service answered with a non-success status and no error document
    #[error("Unexpected HTTP status {status}")]
    Status { status: u16 },

    /// Network or TLS failure, never retried by the client
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl OperationError {
    /// Whether the failure happened below the HTTP layer
    pub fn is_transport(&self) -> bool {
        matches!(self, OperationError::Transport(_))
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            OperationError::InvalidArgument(_) => 2,
            OperationError::Transport(_) => 3,
            OperationError::RemoteError { code, .. } => match code.as_str() {
                "NoSuchBucket" | "NoSuchKey" => 5,
                "AccessDenied" | "SignatureDoesNotMatch" | "InvalidAccessKeyId" => 4,
                _ => 1,
            },
            OperationError::Status { status } => match status {
                401 | 403 => 4,
                404 => 5,
                _ => 1,
            },
            OperationError::Decode(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::NotLoggedIn.exit_code(), 4);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_operation_error_exit_codes() {
        let remote = |code: &str| OperationError::RemoteError {
            code: code.into(),
            message: String::new(),
        };
        assert_eq!(remote("NoSuchBucket").exit_code(), 5);
        assert_eq!(remote("SignatureDoesNotMatch").exit_code(), 4);
        assert_eq!(remote("InternalError").exit_code(), 1);
        assert_eq!(OperationError::Status { status: 403 }.exit_code(), 4);
        assert_eq!(OperationError::InvalidArgument("x".into()).exit_code(), 2);

        let transport = OperationError::from(TransportError::new(
            TransportErrorKind::Timeout,
            "deadline elapsed",
        ));
        assert!(transport.is_transport());
        assert_eq!(transport.exit_code(), 3);
    }

    #[test]
    fn test_error_display() {
        let err = OperationError::RemoteError {
            code: "NoSuchBucket".into(),
            message: "The specified bucket does not exist".into(),
        };
        assert_eq!(
            err.to_string(),
            "NoSuchBucket: The specified bucket does not exist"
        );

        let err = DecodeError::MalformedBody {
            len: 12,
            reason: "unexpected end".into(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed response body (12 bytes): unexpected end"
        );

        let err = TransportError::new(TransportErrorKind::Connect, "refused");
        assert_eq!(err.to_string(), "connection failed: refused");
    }
}
