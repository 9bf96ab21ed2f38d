//! Domain records and the ObjectStore trait
//!
//! Records are plain values decoded from list responses. They carry no
//! reference back to the client that produced them.

use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::OperationError;

/// One bucket owned by the authenticated account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRecord {
    /// Bucket name
    pub name: String,

    /// Region of the client that listed the bucket
    pub region: String,

    /// Creation time as reported by the service
    ///
    /// When the service omits it this holds the decode time and is not authoritative.
    pub created_at: Timestamp,
}

/// One object from a list-objects response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Full '/'-delimited key from the bucket root
    pub key: String,

    /// Size in bytes
    pub size: u64,

    /// Last modified time, verbatim from the response (ISO-8601 expected)
    pub last_modified: String,

    /// ETag with quote characters stripped
    pub etag: String,
}

impl ObjectRecord {
    /// Create a record with only key and size set
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: String::new(),
            etag: String::new(),
        }
    }

    /// Last path segment of the key
    pub fn name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }

    /// Parsed last-modified time, if it is a valid timestamp
    pub fn last_modified_at(&self) -> Option<Timestamp> {
        self.last_modified.parse().ok()
    }

    /// Human-readable size
    pub fn size_human(&self) -> String {
        humansize::format_size(self.size, humansize::BINARY)
    }
}

/// Structured error returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub code: String,
    pub message: String,
}

impl From<ErrorRecord> for OperationError {
    fn from(record: ErrorRecord) -> Self {
        OperationError::RemoteError {
            code: record.code,
            message: record.message,
        }
    }
}

/// A single list-objects response page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectPage {
    /// The prefix echoed back by the service, if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Objects in the order the service listed them
    pub objects: Vec<ObjectRecord>,

    /// Whether the service holds more keys than this page contains
    pub truncated: bool,
}

/// Read-only listing operations against an object store
///
/// Implemented by the signed REST client and by test doubles.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List buckets owned by the account
    async fn list_buckets(&self) -> Result<Vec<BucketRecord>, OperationError>;

    /// List one page of objects whose keys start with `prefix`
    async fn list_objects_page(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<ObjectPage, OperationError>;

    /// List objects in a bucket whose keys start with `prefix`
    ///
    /// Only the first page is read; a truncated listing is logged.
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectRecord>, OperationError> {
        let page = self.list_objects_page(bucket, prefix).await?;
        if page.truncated {
            tracing::warn!(
                bucket,
                prefix,
                returned = page.objects.len(),
                "object listing is truncated; only the first page was returned"
            );
        }
        Ok(page.objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_record_name() {
        assert_eq!(ObjectRecord::new("a/b/c.txt", 1).name(), "c.txt");
        assert_eq!(ObjectRecord::new("top.txt", 1).name(), "top.txt");
        assert_eq!(ObjectRecord::new("dir/", 0).name(), "");
    }

    #[test]
    fn test_object_record_last_modified() {
        let mut record = ObjectRecord::new("a.txt", 10);
        assert!(record.last_modified_at().is_none());

        record.last_modified = "2024-03-01T12:30:00.000Z".to_string();
        let ts = record.last_modified_at().unwrap();
        assert_eq!(ts.as_second(), 1709296200);
    }

    #[test]
    fn test_object_record_size_human() {
        assert_eq!(ObjectRecord::new("a", 2048).size_human(), "2 KiB");
    }

    #[test]
    fn test_error_record_into_operation_error() {
        let err: OperationError = ErrorRecord {
            code: "AccessDenied".into(),
            message: "Access Denied".into(),
        }
        .into();
        assert!(matches!(
            err,
            OperationError::RemoteError { ref code, .. } if code == "AccessDenied"
        ));
    }
}
