use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::error::Result;

/// A named export declared by a source file.
#[async_trait]
pub trait SourceExport: Send + Sync {
    fn name(&self) -> Option<String>;
    fn title(&self) -> Option<String>;
    fn slug(&self) -> Option<String>;
    fn description(&self) -> Option<String>;

    /// When this export first appeared in history. Suspends on network IO
    /// for remote trees; `None` when history is unavailable.
    async fn first_commit_date(&self) -> Result<Option<OffsetDateTime>>;
}

/// A single source file in the tree.
#[async_trait]
pub trait SourceFile: Send + Sync {
    fn title(&self) -> Option<String>;
    fn description(&self) -> Option<String>;

    /// Route-style path. Not guaranteed to carry a leading slash; consumers
    /// normalize.
    fn pathname(&self) -> String;

    /// Human path segments, used to assemble breadcrumbs.
    fn pathname_segments(&self) -> Vec<String>;

    /// Path of the backing file inside the remote repository, when known.
    /// Keys the remote commit-map fallback.
    fn repository_path(&self) -> Option<String> {
        None
    }

    async fn last_commit_date(&self) -> Result<Option<OffsetDateTime>>;

    async fn exports(&self) -> Result<Vec<Arc<dyn SourceExport>>>;
}

/// A directory of files and nested directories.
#[async_trait]
pub trait SourceDirectory: Send + Sync {
    fn title(&self) -> Option<String>;
    fn slug(&self) -> String;

    async fn entries(&self) -> Result<Vec<SourceEntry>>;
}

/// One child of a directory.
#[derive(Clone)]
pub enum SourceEntry {
    Directory(Arc<dyn SourceDirectory>),
    File(Arc<dyn SourceFile>),
}

impl SourceEntry {
    pub fn is_directory(&self) -> bool {
        matches!(self, SourceEntry::Directory(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, SourceEntry::File(_))
    }
}
