//! Legacy "AWS" HMAC-SHA1 request signing
//!
//! String to sign:
//!
//! ```text
//! {METHOD}\n
//! \n            (no Content-MD5)
//! \n            (no Content-Type)
//! {Date}\n
//! /{resource}
//! ```
//!
//! The header value is `AWS {access_key_id}:{base64(hmac_sha1(secret, string_to_sign))}`.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use jiff::Timestamp;
use sha1::Sha1;

use sx_core::{Credentials, SigningError};

type HmacSha1 = Hmac<Sha1>;

/// Scheme name placed before the credential in the Authorization header
pub const SCHEME: &str = "AWS";

/// Signs requests with one set of credentials
///
/// Construction validates the key material, so `sign` cannot fail.
#[derive(Clone)]
pub struct RequestSigner {
    access_key_id: String,
    /// HMAC state keyed with the secret, cloned for every signature
    mac: HmacSha1,
}

impl RequestSigner {
    /// Create a signer, rejecting empty or unusable key material
    pub fn new(credentials: &Credentials) -> Result<Self, SigningError> {
        if credentials.access_key_id.is_empty() {
            return Err(SigningError::EmptyAccessKey);
        }
        if credentials.secret_access_key.is_empty() {
            return Err(SigningError::EmptySecret);
        }

        let mac = HmacSha1::new_from_slice(credentials.secret_access_key.as_bytes())
            .map_err(|e| SigningError::InvalidKey(e.to_string()))?;

        Ok(Self {
            access_key_id: credentials.access_key_id.clone(),
            mac,
        })
    }

    /// Compute the Authorization header value
    ///
    /// `date` must be the exact value sent in the `Date` header.
    /// `resource` is the request path without query, with or without a leading '/'.
    pub fn sign(&self, method: &str, resource: &str, date: &str) -> String {
        let string_to_sign = string_to_sign(method, resource, date);

        let mut mac = self.mac.clone();
        mac.update(string_to_sign.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());

        format!("{SCHEME} {}:{signature}", self.access_key_id)
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

/// Canonical string to sign for a request without body headers
pub fn string_to_sign(method: &str, resource: &str, date: &str) -> String {
    format!("{method}\n\n\n{date}\n/{}", resource.trim_start_matches('/'))
}

/// RFC 1123 date as used in the `Date` header, e.g. `Wed, 06 Mar 2024 10:00:00 GMT`
pub fn http_date(timestamp: Timestamp) -> String {
    timestamp.strftime("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
