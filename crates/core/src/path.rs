//! Path parsing and navigation
//!
//! Handles paths in the format `bucket[/prefix]`. A prefix is the current
//! "directory" inside a bucket and always ends with '/' unless empty.

use crate::error::{Error, Result};

/// A location inside a bucket: the bucket plus a directory prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketPath {
    /// Bucket name
    pub bucket: String,
    /// Directory prefix (empty for bucket root, otherwise ends with '/')
    pub prefix: String,
}

impl BucketPath {
    /// Create a new BucketPath, normalizing the prefix to end with '/'
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let prefix = if prefix.is_empty() || prefix.ends_with('/') {
            prefix
        } else {
            format!("{prefix}/")
        };
        Self {
            bucket: bucket.into(),
            prefix,
        }
    }

    /// Get the parent directory (one level up)
    pub fn parent(&self) -> Option<Self> {
        parent_prefix(&self.prefix).map(|prefix| Self {
            bucket: self.bucket.clone(),
            prefix,
        })
    }

    /// Descend into a child folder
    pub fn join(&self, folder: &str) -> Self {
        Self {
            bucket: self.bucket.clone(),
            prefix: child_prefix(&self.prefix, folder),
        }
    }

    /// Navigation trail from the bucket root to this prefix
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumbs(&self.prefix)
    }
}

impl std::fmt::Display for BucketPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.prefix)
    }
}

/// One step of a navigation trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    /// Display label ("Root" for the bucket root)
    pub label: String,
    /// Prefix to navigate to
    pub prefix: String,
}

/// Label used for the bucket root in breadcrumbs
pub const ROOT_LABEL: &str = "Root";

/// Build the trail `Root > a > b` for prefix `a/b/`
pub fn breadcrumbs(prefix: &str) -> Vec<Breadcrumb> {
    let mut trail = vec![Breadcrumb {
        label: ROOT_LABEL.to_string(),
        prefix: String::new(),
    }];

    let mut current = String::new();
    for part in prefix.split('/').filter(|p| !p.is_empty()) {
        current.push_str(part);
        current.push('/');
        trail.push(Breadcrumb {
            label: part.to_string(),
            prefix: current.clone(),
        });
    }

    trail
}

/// Prefix of a child folder: `prefix + folder + "/"`
pub fn child_prefix(prefix: &str, folder: &str) -> String {
    format!("{prefix}{}/", folder.trim_end_matches('/'))
}

/// Prefix one level up, or `None` at the bucket root
pub fn parent_prefix(prefix: &str) -> Option<String> {
    if prefix.is_empty() {
        return None;
    }
    let trimmed = prefix.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(pos) => Some(format!("{}/", &trimmed[..pos])),
        None => Some(String::new()),
    }
}

/// Parse `bucket[/prefix]` into a BucketPath
pub fn parse_bucket_path(path: &str) -> Result<BucketPath> {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    let (bucket, prefix) = path.split_once('/').unwrap_or((path, ""));
    validate_bucket_name(bucket)?;
    Ok(BucketPath::new(bucket, prefix))
}

/// Parse `bucket/key` naming a single object
pub fn parse_object_path(path: &str) -> Result<(String, String)> {
    let path = path.trim_start_matches('/');
    let Some((bucket, key)) = path.split_once('/') else {
        return Err(Error::InvalidPath(format!(
            "Path '{path}' is incomplete. Use format: bucket/key"
        )));
    };

    validate_bucket_name(bucket)?;
    if key.is_empty() || key.ends_with('/') {
        return Err(Error::InvalidPath(format!(
            "Path '{path}' names a folder, not an object"
        )));
    }
    Ok((bucket.to_string(), key.to_string()))
}

/// Check bucket naming rules: 3-63 chars of lowercase letters, digits, '-' and '.'
pub fn validate_bucket_name(name: &str) -> Result<()> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
    let valid_edges = name
        .chars()
        .next()
        .zip(name.chars().last())
        .is_some_and(|(first, last)| first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric());

    if (3..=63).contains(&name.len()) && valid_chars && valid_edges {
        Ok(())
    } else {
        Err(Error::InvalidPath(format!("Invalid bucket name: '{name}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket_only() {
        let path = parse_bucket_path("my-bucket").unwrap();
        assert_eq!(path.bucket, "my-bucket");
        assert_eq!(path.prefix, "");
    }

    #[test]
    fn test_parse_bucket_with_prefix() {
        let path = parse_bucket_path("my-bucket/photos/2024").unwrap();
        assert_eq!(path.bucket, "my-bucket");
        assert_eq!(path.prefix, "photos/2024/");

        let path = parse_bucket_path("my-bucket/photos/").unwrap();
        assert_eq!(path.prefix, "photos/");
    }

    #[test]
    fn test_parse_invalid_paths() {
        assert!(parse_bucket_path("").is_err());
        assert!(parse_bucket_path("ab").is_err());
        assert!(parse_bucket_path("Upper").is_err());
        assert!(parse_bucket_path("-dash").is_err());
    }

    #[test]
    fn test_parse_object_path() {
        let (bucket, key) = parse_object_path("media/a/b.txt").unwrap();
        assert_eq!(bucket, "media");
        assert_eq!(key, "a/b.txt");

        assert!(parse_object_path("media").is_err());
        assert!(parse_object_path("media/a/").is_err());
    }

    #[test]
    fn test_parent_and_join() {
        let path = BucketPath::new("media", "a/b/");
        let parent = path.parent().unwrap();
        assert_eq!(parent.prefix, "a/");

        let root = parent.parent().unwrap();
        assert_eq!(root.prefix, "");
        assert!(root.parent().is_none());

        let child = root.join("docs");
        assert_eq!(child.prefix, "docs/");
        assert_eq!(child.to_string(), "media/docs/");
    }

    #[test]
    fn test_breadcrumbs() {
        let trail = breadcrumbs("a/b/");
        let pairs: Vec<(&str, &str)> = trail
            .iter()
            .map(|b| (b.label.as_str(), b.prefix.as_str()))
            .collect();
        assert_eq!(pairs, vec![("Root", ""), ("a", "a/"), ("b", "a/b/")]);

        assert_eq!(breadcrumbs("").len(), 1);
    }

    #[test]
    fn test_child_prefix() {
        assert_eq!(child_prefix("", "a"), "a/");
        assert_eq!(child_prefix("a/", "b"), "a/b/");
    }
}
