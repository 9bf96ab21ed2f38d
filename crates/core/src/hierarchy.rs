//! Flat key space to folder/file projection
//!
//! Object storage has no directories. A "folder" is the first path segment
//! after the current prefix that is shared by one or more keys.

use std::collections::HashSet;

use serde::Serialize;

use crate::records::ObjectRecord;

/// One entry of a directory level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HierarchyEntry {
    /// Immediate child folder, named by its path segment
    Folder { name: String },
    /// Immediate child object
    File(ObjectRecord),
}

/// Folders and files directly under one prefix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// Folder names, deduplicated, in order of first occurrence
    pub folders: Vec<String>,

    /// Files in input order
    pub files: Vec<ObjectRecord>,
}

impl Listing {
    /// Folders first, then files
    pub fn entries(&self) -> impl Iterator<Item = HierarchyEntry> + '_ {
        self.folders
            .iter()
            .map(|name| HierarchyEntry::Folder { name: name.clone() })
            .chain(self.files.iter().cloned().map(HierarchyEntry::File))
    }

    /// Total size of the files at this level
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Partition `objects` into the folders and files directly under `prefix`
///
/// Keys not starting with `prefix` are ignored. A key equal to `prefix`
/// (the folder placeholder object) is neither a folder nor a file.
pub fn project(objects: &[ObjectRecord], prefix: &str) -> Listing {
    project_iter(objects.iter(), prefix)
}

fn project_iter<'a>(objects: impl Iterator<Item = &'a ObjectRecord>, prefix: &str) -> Listing {
    let mut listing = Listing::default();
    let mut seen = HashSet::new();

    for object in objects {
        let Some(relative) = object.key.strip_prefix(prefix) else {
            continue;
        };

        match relative.split_once('/') {
            Some((folder, _)) => {
                if seen.insert(folder) {
                    listing.folders.push(folder.to_string());
                }
            }
            None if object.key != prefix => listing.files.push(object.clone()),
            None => {}
        }
    }

    listing
}

/// A response set sorted once so repeated projections at different
/// prefixes only visit the keys under each prefix
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    objects: Vec<ObjectRecord>,
}

impl KeyIndex {
    /// Build an index over a response set
    pub fn new(objects: impl IntoIterator<Item = ObjectRecord>) -> Self {
        let mut objects: Vec<ObjectRecord> = objects.into_iter().collect();
        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Self { objects }
    }

    /// Number of indexed objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Same result as [`project`] over the indexed objects, with folders
    /// and files in key order
    pub fn project(&self, prefix: &str) -> Listing {
        let start = self.objects.partition_point(|o| o.key.as_str() < prefix);
        let under_prefix = self.objects[start..]
            .iter()
            .take_while(|o| o.key.starts_with(prefix));
        project_iter(under_prefix, prefix)
    }
}
