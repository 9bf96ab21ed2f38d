//! sx-s3: Signed REST protocol client for Spaces storage
//!
//! This crate speaks the wire protocol: it signs requests with the legacy
//! HMAC-SHA1 scheme, sends them through a pluggable `Transport` and decodes
//! the XML list responses into sx-core records.

pub mod client;
pub mod decoder;
pub mod signer;
pub mod transport;

pub use client::SpacesClient;
pub use decoder::{decode, Document};
pub use signer::{http_date, RequestSigner};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
