//! sx-core: Core library for the sx Spaces client
//!
//! This crate provides the parts of the client that do not speak HTTP:
//! - Domain records decoded from list responses
//! - Credentials and the credential store abstraction
//! - Configuration management
//! - Projection of flat object keys into folders and files
//! - Path parsing and navigation
//! - The error taxonomy shared with the protocol crate

pub mod config;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod hierarchy;
pub mod path;
pub mod records;

pub use config::{Config, ConfigManager};
pub use credentials::{Credentials, CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use endpoint::Endpoint;
pub use error::{
    DecodeError, Error, OperationError, Result, SigningError, TransportError, TransportErrorKind,
};
pub use hierarchy::{project, HierarchyEntry, KeyIndex, Listing};
pub use path::{parse_bucket_path, parse_object_path, validate_bucket_name, BucketPath, Breadcrumb};
pub use records::{BucketRecord, ErrorRecord, ObjectPage, ObjectRecord, ObjectStore};
