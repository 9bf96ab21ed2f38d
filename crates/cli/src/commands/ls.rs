//! ls command - List buckets and objects
//!
//! Lists buckets when given no path, or one directory level of a bucket when
//! given `bucket[/prefix/]`. With `--recursive` every key under the prefix is
//! printed flat instead of being grouped into folders.

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use sx_core::{
    parse_bucket_path, project, BucketPath, BucketRecord, HierarchyEntry, Listing, ObjectRecord,
    ObjectStore,
};

use super::session::{report, Session};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, Spinner};

const BLANK_DATE: &str = "                   ";

/// List buckets or objects
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Bucket path (bucket[/prefix/]); omit to list buckets
    pub path: Option<String>,

    /// List every key under the prefix instead of one level
    #[arg(short, long)]
    pub recursive: bool,

    /// Summarize output (show totals)
    #[arg(long)]
    pub summarize: bool,
}

/// JSON shape of a bucket listing
#[derive(Debug, Serialize)]
struct BucketsOutput {
    buckets: Vec<BucketRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

/// JSON shape of an object listing
#[derive(Debug, Serialize)]
struct ObjectsOutput {
    bucket: String,
    prefix: String,
    breadcrumbs: Vec<String>,
    items: Vec<HierarchyEntry>,
    truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
struct Summary {
    total_folders: usize,
    total_objects: usize,
    total_size_bytes: u64,
    total_size_human: String,
}

impl Summary {
    fn new(total_folders: usize, total_objects: usize, total_size_bytes: u64) -> Self {
        Self {
            total_folders,
            total_objects,
            total_size_bytes,
            total_size_human: humansize::format_size(total_size_bytes, humansize::BINARY),
        }
    }

    fn of(listing: &Listing) -> Self {
        Self::new(listing.folders.len(), listing.files.len(), listing.total_size())
    }
}

/// Execute the ls command
pub async fn execute(args: LsArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let path = match args.path.as_deref().map(parse_bucket_path).transpose() {
        Ok(path) => path,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };

    match run(path.as_ref(), &args, &formatter).await {
        Ok(()) => ExitCode::Success,
        Err(e) => report(&formatter, e),
    }
}

async fn run(path: Option<&BucketPath>, args: &LsArgs, formatter: &Formatter) -> anyhow::Result<()> {
    let client = Session::load()?.client()?;
    match path {
        None => list_buckets(client.as_ref(), args, formatter).await,
        Some(path) => list_objects(client.as_ref(), path, args, formatter).await,
    }
}

async fn list_buckets(
    client: &dyn ObjectStore,
    args: &LsArgs,
    formatter: &Formatter,
) -> anyhow::Result<()> {
    let spinner = Spinner::start(formatter.config(), "Listing buckets...");
    let buckets = client
        .list_buckets()
        .await
        .context("failed to list buckets")?;
    spinner.finish();

    if formatter.is_json() {
        let summary = args.summarize.then(|| Summary::new(buckets.len(), 0, 0));
        formatter.json(&BucketsOutput { buckets, summary });
        return Ok(());
    }

    for bucket in &buckets {
        let date = bucket.created_at.strftime("%Y-%m-%d %H:%M:%S").to_string();
        formatter.println(&format!(
            "{}     0B {}",
            formatter.dim(&format!("[{date}]")),
            formatter.folder(&bucket.name)
        ));
    }
    if args.summarize {
        formatter.println(&format!("\nTotal: {} buckets", buckets.len()));
    }
    Ok(())
}

async fn list_objects(
    client: &dyn ObjectStore,
    path: &BucketPath,
    args: &LsArgs,
    formatter: &Formatter,
) -> anyhow::Result<()> {
    let spinner = Spinner::start(formatter.config(), &format!("Listing {path}..."));
    let page = client
        .list_objects_page(&path.bucket, &path.prefix)
        .await
        .with_context(|| format!("failed to list objects in {path}"))?;
    spinner.finish();

    let listing = level(page.objects, &path.prefix, args.recursive);

    if page.truncated {
        formatter.warning("The service returned a partial listing; narrow the prefix to see more");
    }

    if formatter.is_json() {
        let summary = args.summarize.then(|| Summary::of(&listing));
        formatter.json(&ObjectsOutput {
            bucket: path.bucket.clone(),
            prefix: path.prefix.clone(),
            breadcrumbs: path.breadcrumbs().into_iter().map(|b| b.prefix).collect(),
            items: listing.entries().collect(),
            truncated: page.truncated,
            summary,
        });
        return Ok(());
    }

    if !args.recursive {
        formatter.println(&formatter.dim(&trail(path)));
    }
    for name in &listing.folders {
        formatter.println(&format!(
            "{}     0B {}",
            formatter.dim(&format!("[{BLANK_DATE}]")),
            formatter.folder(name)
        ));
    }
    for file in &listing.files {
        let date = file
            .last_modified_at()
            .map(|d| d.strftime("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| BLANK_DATE.to_string());
        let label = if args.recursive {
            file.key.as_str()
        } else {
            file.name()
        };
        formatter.println(&format!(
            "{} {:>9} {label}",
            formatter.dim(&format!("[{date}]")),
            file.size_human()
        ));
    }

    if args.summarize {
        let summary = Summary::of(&listing);
        formatter.println(&format!(
            "\nTotal: {} folders, {} objects, {}",
            summary.total_folders, summary.total_objects, summary.total_size_human
        ));
    }
    Ok(())
}

/// What one `ls` shows under `prefix`: a directory level, or every key when recursive
fn level(objects: Vec<ObjectRecord>, prefix: &str, recursive: bool) -> Listing {
    if recursive {
        let files = objects
            .into_iter()
            .filter(|o| o.key.starts_with(prefix) && o.key != prefix)
            .collect();
        Listing {
            folders: Vec::new(),
            files,
        }
    } else {
        project(&objects, prefix)
    }
}

/// `bucket: Root > a > b` header line for a directory level
fn trail(path: &BucketPath) -> String {
    let labels: Vec<String> = path.breadcrumbs().into_iter().map(|b| b.label).collect();
    format!("{}: {}", path.bucket, labels.join(" > "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::session::exit_code_for;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use sx_core::{ObjectPage, OperationError};

    /// Store answering one listing with a fixed page and recording what was asked
    struct FixedStore {
        page: Mutex<Option<Result<ObjectPage, OperationError>>>,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl FixedStore {
        fn new(page: Result<ObjectPage, OperationError>) -> Self {
            Self {
                page: Mutex::new(Some(page)),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ObjectStore for FixedStore {
        async fn list_buckets(&self) -> Result<Vec<BucketRecord>, OperationError> {
            Ok(Vec::new())
        }

        async fn list_objects_page(
            &self,
            bucket: &str,
            prefix: &str,
        ) -> Result<ObjectPage, OperationError> {
            self.requests
                .lock()
                .unwrap()
                .push((bucket.to_string(), prefix.to_string()));
            self.page.lock().unwrap().take().unwrap()
        }
    }

    fn quiet() -> Formatter {
        Formatter::new(OutputConfig {
            quiet: true,
            no_progress: true,
            ..Default::default()
        })
    }

    fn args(recursive: bool) -> LsArgs {
        LsArgs {
            path: None,
            recursive,
            summarize: true,
        }
    }

    #[test]
    fn test_trail_at_bucket_root() {
        let path = BucketPath::new("media", "");
        assert_eq!(trail(&path), "media: Root");
    }

    #[test]
    fn test_trail_nested() {
        let path = parse_bucket_path("media/photos/2024").unwrap();
        assert_eq!(path.prefix, "photos/2024/");
        assert_eq!(trail(&path), "media: Root > photos > 2024");
    }

    #[test]
    fn test_summary_totals() {
        let objects = vec![
            ObjectRecord::new("x/1", 1),
            ObjectRecord::new("a", 1024),
            ObjectRecord::new("b", 1024),
        ];
        let summary = Summary::of(&level(objects, "", false));
        assert_eq!(summary.total_folders, 1);
        assert_eq!(summary.total_objects, 2);
        assert_eq!(summary.total_size_bytes, 2048);
        assert_eq!(summary.total_size_human, "2 KiB");
    }

    #[test]
    fn test_level_groups_one_directory() {
        let objects = vec![
            ObjectRecord::new("a/", 0),
            ObjectRecord::new("a/b.txt", 10),
            ObjectRecord::new("a/deep/c.txt", 20),
            ObjectRecord::new("other.txt", 30),
        ];
        let listing = level(objects, "a/", false);
        let items: Vec<HierarchyEntry> = listing.entries().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            HierarchyEntry::Folder {
                name: "deep".into()
            }
        );
        assert!(matches!(&items[1], HierarchyEntry::File(f) if f.key == "a/b.txt"));
    }

    #[test]
    fn test_level_recursive_is_flat() {
        let objects = vec![
            ObjectRecord::new("a/", 0),
            ObjectRecord::new("a/b.txt", 10),
            ObjectRecord::new("a/deep/c.txt", 20),
        ];
        let listing = level(objects, "a/", true);
        assert!(listing.folders.is_empty());
        let keys: Vec<&str> = listing.files.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["a/b.txt", "a/deep/c.txt"]);
    }

    #[tokio::test]
    async fn test_list_objects_asks_the_store_for_the_path() {
        let store = FixedStore::new(Ok(ObjectPage {
            prefix: Some("photos/".into()),
            objects: vec![ObjectRecord::new("photos/a.jpg", 5)],
            truncated: false,
        }));
        let path = parse_bucket_path("media/photos").unwrap();

        list_objects(&store, &path, &args(false), &quiet())
            .await
            .unwrap();

        let requests = store.requests.lock().unwrap();
        assert_eq!(*requests, [("media".to_string(), "photos/".to_string())]);
    }

    #[tokio::test]
    async fn test_list_objects_keeps_the_store_error() {
        let store = FixedStore::new(Err(OperationError::RemoteError {
            code: "NoSuchBucket".into(),
            message: "missing".into(),
        }));
        let path = BucketPath::new("gone", "");

        let err = list_objects(&store, &path, &args(true), &quiet())
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("failed to list objects in gone"));
        assert_eq!(exit_code_for(&err), ExitCode::NotFound);
    }

    #[test]
    fn test_objects_output_json_shape() {
        let output = ObjectsOutput {
            bucket: "media".into(),
            prefix: "a/".into(),
            breadcrumbs: vec![String::new(), "a/".into()],
            items: vec![
                HierarchyEntry::Folder { name: "deep".into() },
                HierarchyEntry::File(ObjectRecord::new("a/b.txt", 10)),
            ],
            truncated: false,
            summary: None,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["items"][0]["type"], "folder");
        assert_eq!(json["items"][0]["name"], "deep");
        assert_eq!(json["items"][1]["type"], "file");
        assert_eq!(json["items"][1]["key"], "a/b.txt");
        assert!(json.get("summary").is_none());
    }
}
