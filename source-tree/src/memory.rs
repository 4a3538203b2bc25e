use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::error::Result;
use crate::tree::{SourceDirectory, SourceEntry, SourceExport, SourceFile};

/// In-memory export fixture.
#[derive(Debug, Clone, Default)]
pub struct MemoryExport {
    name: Option<String>,
    title: Option<String>,
    slug: Option<String>,
    description: Option<String>,
    first_commit_date: Option<OffsetDateTime>,
}

impl MemoryExport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// An export the reflection layer could not name at all.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_first_commit_date(mut self, date: OffsetDateTime) -> Self {
        self.first_commit_date = Some(date);
        self
    }
}

#[async_trait]
impl SourceExport for MemoryExport {
    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn slug(&self) -> Option<String> {
        self.slug.clone()
    }

    fn description(&self) -> Option<String> {
        self.description.clone()
    }

    async fn first_commit_date(&self) -> Result<Option<OffsetDateTime>> {
        Ok(self.first_commit_date)
    }
}

/// In-memory file fixture. Pathname segments derive from the path.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    pathname: String,
    repository_path: Option<String>,
    title: Option<String>,
    description: Option<String>,
    last_commit_date: Option<OffsetDateTime>,
    exports: Vec<MemoryExport>,
}

impl MemoryFile {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            repository_path: None,
            title: None,
            description: None,
            last_commit_date: None,
            exports: Vec::new(),
        }
    }

    pub fn with_repository_path(mut self, path: impl Into<String>) -> Self {
        self.repository_path = Some(path.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_last_commit_date(mut self, date: OffsetDateTime) -> Self {
        self.last_commit_date = Some(date);
        self
    }

    pub fn with_export(mut self, export: MemoryExport) -> Self {
        self.exports.push(export);
        self
    }
}

#[async_trait]
impl SourceFile for MemoryFile {
    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn description(&self) -> Option<String> {
        self.description.clone()
    }

    fn pathname(&self) -> String {
        self.pathname.clone()
    }

    fn repository_path(&self) -> Option<String> {
        self.repository_path.clone()
    }

    fn pathname_segments(&self) -> Vec<String> {
        self.pathname
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    }

    async fn last_commit_date(&self) -> Result<Option<OffsetDateTime>> {
        Ok(self.last_commit_date)
    }

    async fn exports(&self) -> Result<Vec<Arc<dyn SourceExport>>> {
        Ok(self
            .exports
            .iter()
            .cloned()
            .map(|export| Arc::new(export) as Arc<dyn SourceExport>)
            .collect())
    }
}

/// In-memory directory fixture, assembled builder-style.
#[derive(Clone, Default)]
pub struct MemoryDirectory {
    slug: String,
    title: Option<String>,
    entries: Vec<SourceEntry>,
}

impl MemoryDirectory {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: None,
            entries: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_file(mut self, file: MemoryFile) -> Self {
        self.entries.push(SourceEntry::File(Arc::new(file)));
        self
    }

    pub fn with_dir(mut self, dir: MemoryDirectory) -> Self {
        self.entries.push(SourceEntry::Directory(Arc::new(dir)));
        self
    }

    pub fn into_arc(self) -> Arc<dyn SourceDirectory> {
        Arc::new(self)
    }
}

#[async_trait]
impl SourceDirectory for MemoryDirectory {
    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn slug(&self) -> String {
        self.slug.clone()
    }

    async fn entries(&self) -> Result<Vec<SourceEntry>> {
        Ok(self.entries.clone())
    }
}
