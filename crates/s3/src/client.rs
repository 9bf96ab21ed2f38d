//! Signed REST client for the listing API
//!
//! Every call builds a `GET`, stamps it with the current time, signs it,
//! hands it to the transport and decodes the body. There are no retries and
//! no cached signatures; the client holds only immutable state, so one
//! instance can serve concurrent calls.

use async_trait::async_trait;
use jiff::Timestamp;

use sx_core::{
    validate_bucket_name, BucketRecord, Credentials, DecodeError, Endpoint, ObjectPage,
    ObjectStore, OperationError, SigningError,
};

use crate::decoder::{decode, Document};
use crate::signer::{http_date, RequestSigner};
use crate::transport::{HttpRequest, ReqwestTransport, Transport};

/// Client for one account in one region
pub struct SpacesClient<T = ReqwestTransport> {
    signer: RequestSigner,
    endpoint: Endpoint,
    region: String,
    transport: T,
}

impl<T: Transport> SpacesClient<T> {
    /// Create a client for the credentials' region on the default provider domain
    pub fn new(credentials: Credentials, transport: T) -> Result<Self, SigningError> {
        let endpoint = Endpoint::for_region(&credentials.region);
        Self::with_endpoint(credentials, endpoint, transport)
    }

    /// Create a client against an explicit endpoint
    pub fn with_endpoint(
        credentials: Credentials,
        endpoint: Endpoint,
        transport: T,
    ) -> Result<Self, SigningError> {
        let signer = RequestSigner::new(&credentials)?;
        tracing::debug!(endpoint = %endpoint, region = %credentials.region, "created Spaces client");
        Ok(Self {
            signer,
            endpoint,
            region: credentials.region,
            transport,
        })
    }

    /// Endpoint this client talks to
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Region of the client's credentials
    pub fn region(&self) -> &str {
        &self.region
    }

    /// List buckets owned by the account
    pub async fn list_buckets(&self) -> Result<Vec<BucketRecord>, OperationError> {
        match self.get("/", "").await? {
            Document::Buckets(buckets) => Ok(buckets),
            Document::Empty => Ok(Vec::new()),
            other => Err(unexpected("bucket list", &other)),
        }
    }

    /// List one page of objects, with the echoed prefix and truncation flag
    pub async fn list_objects_page(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<ObjectPage, OperationError> {
        // The name is signed and placed in the URL path verbatim
        validate_bucket_name(bucket)
            .map_err(|e| OperationError::InvalidArgument(e.to_string()))?;

        let resource = format!("/{bucket}");
        let query = if prefix.is_empty() {
            String::new()
        } else {
            format!("?prefix={}", urlencoding::encode(prefix))
        };

        match self.get(&resource, &query).await? {
            Document::Objects(page) => Ok(page),
            Document::Empty => Ok(ObjectPage::default()),
            other => Err(unexpected("object list", &other)),
        }
    }

    /// Send a signed GET and decode the response
    ///
    /// `resource` is what gets signed; `query` is appended to the URL only.
    async fn get(&self, resource: &str, query: &str) -> Result<Document, OperationError> {
        let date = http_date(Timestamp::now());
        let authorization = self.signer.sign("GET", resource, &date);

        let request = HttpRequest {
            method: "GET".to_string(),
            url: self.endpoint.url_for(&format!("{resource}{query}")),
            headers: vec![
                ("Date".to_string(), date),
                ("Authorization".to_string(), authorization),
            ],
        };

        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send(request).await?;
        tracing::debug!(
            status = response.status,
            len = response.body.len(),
            "received response"
        );

        let document = match decode(&response.body, &self.region) {
            Ok(document) => document,
            Err(_) if !response.is_success() => {
                return Err(OperationError::Status {
                    status: response.status,
                });
            }
            Err(e) => return Err(e.into()),
        };

        match document {
            Document::Error(record) => Err(record.into()),
            _ if !response.is_success() => Err(OperationError::Status {
                status: response.status,
            }),
            document => Ok(document),
        }
    }
}

fn unexpected(expected: &'static str, found: &Document) -> OperationError {
    DecodeError::UnexpectedDocument {
        expected,
        found: found.kind(),
    }
    .into()
}

#[async_trait]
impl<T: Transport> ObjectStore for SpacesClient<T> {
    async fn list_buckets(&self) -> Result<Vec<BucketRecord>, OperationError> {
        SpacesClient::<T>::list_buckets(self).await
    }

    async fn list_objects_page(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<ObjectPage, OperationError> {
        SpacesClient::<T>::list_objects_page(self, bucket, prefix).await
    }
}
