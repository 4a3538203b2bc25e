use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One named export within an indexed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportIndexEntry {
    pub name: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,

    /// When the export first appeared in history.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub first_commit_date: Option<OffsetDateTime>,

    /// File pathname plus `#anchor` when the export has a name or slug,
    /// the bare file pathname otherwise.
    pub href: String,

    pub file_pathname: String,

    /// Inherited from the parent file.
    pub breadcrumb: String,
}

/// One indexed source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileIndexEntry {
    /// Route path, normalized with a leading slash.
    pub pathname: String,

    /// Path of the backing file inside the remote repository, when known.
    pub repository_path: Option<String>,

    /// Human path segments joined with `" / "`.
    pub breadcrumb: String,

    pub title: Option<String>,
    pub description: Option<String>,

    #[serde(with = "time::serde::rfc3339::option", default)]
    pub last_commit_date: Option<OffsetDateTime>,

    pub export_entries: Vec<ExportIndexEntry>,
}

/// Aggregate index over the whole source tree.
///
/// Immutable after construction; rebuilt only on process restart since the
/// underlying tree is a point-in-time snapshot.
#[derive(Debug, Default)]
pub struct TslIndex {
    pub files: Vec<FileIndexEntry>,

    /// Flattened exports, file traversal order then export declaration order.
    pub export_entries: Vec<ExportIndexEntry>,

    files_by_path: HashMap<String, usize>,
}

impl TslIndex {
    pub(crate) fn new(files: Vec<FileIndexEntry>) -> Self {
        let mut files_by_path = HashMap::with_capacity(files.len());
        let mut export_entries = Vec::new();
        for (idx, file) in files.iter().enumerate() {
            files_by_path.insert(file.pathname.clone(), idx);
            export_entries.extend(file.export_entries.iter().cloned());
        }
        Self {
            files,
            export_entries,
            files_by_path,
        }
    }

    /// Look up a file by its normalized pathname.
    pub fn file(&self, pathname: &str) -> Option<&FileIndexEntry> {
        self.files_by_path
            .get(pathname)
            .and_then(|idx| self.files.get(*idx))
    }
}
