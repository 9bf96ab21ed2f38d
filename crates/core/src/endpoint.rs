//! Region-qualified storage endpoint

use url::Url;

use crate::config::EndpointConfig;
use crate::error::{Error, Result};

/// Default provider storage domain
pub const DEFAULT_STORAGE_DOMAIN: &str = "digitaloceanspaces.com";

/// Default URL scheme
pub const DEFAULT_SCHEME: &str = "https";

/// Host of the storage service for one region: `{region}.{storage_domain}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    host: String,
}

impl Endpoint {
    /// Endpoint for a region on the default provider domain
    pub fn for_region(region: &str) -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: format!("{region}.{DEFAULT_STORAGE_DOMAIN}"),
        }
    }

    /// Endpoint for a region using configured domain and scheme
    pub fn from_config(region: &str, config: &EndpointConfig) -> Result<Self> {
        if region.is_empty() {
            return Err(Error::Config("Region cannot be empty".into()));
        }
        let domain = config.storage_domain.trim_matches('.');
        if domain.is_empty() {
            return Err(Error::Config("Storage domain cannot be empty".into()));
        }
        let scheme = match config.scheme.as_str() {
            "https" | "http" => config.scheme.clone(),
            other => {
                return Err(Error::Config(format!(
                    "Unsupported scheme '{other}', expected https or http"
                )));
            }
        };

        let endpoint = Self {
            scheme,
            host: format!("{region}.{domain}"),
        };
        // Reject hosts the URL parser cannot represent
        Url::parse(&endpoint.base_url())?;
        Ok(endpoint)
    }

    /// Host name, e.g. `nyc3.digitaloceanspaces.com`
    pub fn host(&self) -> &str {
        &self.host
    }

    /// URL scheme
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// `https://{host}`
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    /// URL of a request path (which must start with `/`) on this endpoint
    pub fn url_for(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url(), path_and_query)
    }

    /// Public, virtual-hosted URL of an object: `https://{bucket}.{host}/{key}`
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        let encoded: Vec<String> = key.split('/').map(encode_segment).collect();
        format!(
            "{}://{}.{}/{}",
            self.scheme,
            bucket,
            self.host,
            encoded.join("/")
        )
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base_url())
    }
}

/// Percent-encode one path segment, leaving unreserved characters alone
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_region() {
        let endpoint = Endpoint::for_region("nyc3");
        assert_eq!(endpoint.host(), "nyc3.digitaloceanspaces.com");
        assert_eq!(endpoint.base_url(), "https://nyc3.digitaloceanspaces.com");
        assert_eq!(
            endpoint.url_for("/bucket?prefix=a%2F"),
            "https://nyc3.digitaloceanspaces.com/bucket?prefix=a%2F"
        );
    }

    #[test]
    fn test_from_config() {
        let config = EndpointConfig {
            storage_domain: "example.test.".to_string(),
            scheme: "http".to_string(),
        };
        let endpoint = Endpoint::from_config("local", &config).unwrap();
        assert_eq!(endpoint.to_string(), "http://local.example.test");
    }

    #[test]
    fn test_from_config_rejects_bad_input() {
        let config = EndpointConfig::default();
        assert!(Endpoint::from_config("", &config).is_err());

        let config = EndpointConfig {
            scheme: "ftp".to_string(),
            ..Default::default()
        };
        assert!(Endpoint::from_config("nyc3", &config).is_err());
    }

    #[test]
    fn test_object_url() {
        let endpoint = Endpoint::for_region("ams3");
        assert_eq!(
            endpoint.object_url("media", "photos/2024/my cat.jpg"),
            "https://media.ams3.digitaloceanspaces.com/photos/2024/my%20cat.jpg"
        );
    }
}
