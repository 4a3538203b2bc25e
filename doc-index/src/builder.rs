use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use tsldocs_async_utils::map_concurrent;
use tsldocs_source_tree::{Result as TreeResult, SourceDirectory, SourceEntry, SourceFile};

use crate::model::{ExportIndexEntry, FileIndexEntry, TslIndex};

/// Fan-out while listing directory children.
pub const DIR_FAN_OUT: usize = 8;

/// Fan-out while extracting per-export metadata within one file.
pub const EXPORT_FAN_OUT: usize = 10;

/// Memoized index accessor. The first caller triggers the traversal; every
/// caller, including concurrent ones during the first build, awaits the same
/// in-flight build and receives the same `Arc`.
pub struct IndexService {
    root: Arc<dyn SourceDirectory>,
    cell: OnceCell<Arc<TslIndex>>,
}

impl IndexService {
    pub fn new(root: Arc<dyn SourceDirectory>) -> Self {
        Self {
            root,
            cell: OnceCell::new(),
        }
    }

    pub async fn index(&self) -> Arc<TslIndex> {
        self.cell
            .get_or_init(|| build_index(Arc::clone(&self.root)))
            .await
            .clone()
    }
}

async fn build_index(root: Arc<dyn SourceDirectory>) -> Arc<TslIndex> {
    let files = collect_files(root).await;
    debug!(files = files.len(), "index build complete");
    Arc::new(TslIndex::new(files))
}

/// Depth-first traversal with bounded fan-out at every directory level.
/// A file that fails metadata extraction is skipped, never fatal.
fn collect_files(dir: Arc<dyn SourceDirectory>) -> BoxFuture<'static, Vec<FileIndexEntry>> {
    Box::pin(async move {
        let entries = match dir.entries().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(slug = %dir.slug(), error = %err, "failed to list directory, skipping");
                return Vec::new();
            }
        };

        let groups = map_concurrent(entries, DIR_FAN_OUT, |entry, _| async move {
            match entry {
                SourceEntry::Directory(child) => collect_files(child).await,
                SourceEntry::File(file) => match index_file(file.as_ref()).await {
                    Ok(entry) => vec![entry],
                    Err(err) => {
                        warn!(error = %err, "failed to index file, skipping");
                        Vec::new()
                    }
                },
            }
        })
        .await;

        groups.into_iter().flatten().collect()
    })
}

async fn index_file(file: &dyn SourceFile) -> TreeResult<FileIndexEntry> {
    let pathname = normalize_pathname(&file.pathname());
    let breadcrumb = file.pathname_segments().join(" / ");
    let last_commit_date = file.last_commit_date().await?;
    let exports = file.exports().await?;

    let pathname_ref = &pathname;
    let breadcrumb_ref = &breadcrumb;
    let export_entries = map_concurrent(exports, EXPORT_FAN_OUT, |export, _| async move {
        let name = export.name();
        let title = export.title();
        let slug = export.slug();
        let description = export.description();
        // A history lookup failure degrades to "no date" rather than
        // dropping the export.
        let first_commit_date = export.first_commit_date().await.ok().flatten();

        let anchor = name.clone().or_else(|| slug.clone());
        let href = match anchor {
            Some(anchor) => format!("{pathname_ref}#{anchor}"),
            None => pathname_ref.clone(),
        };

        ExportIndexEntry {
            name,
            title,
            slug,
            description,
            first_commit_date,
            href,
            file_pathname: pathname_ref.clone(),
            breadcrumb: breadcrumb_ref.clone(),
        }
    })
    .await;

    Ok(FileIndexEntry {
        pathname,
        repository_path: file.repository_path(),
        breadcrumb,
        title: file.title(),
        description: file.description(),
        last_commit_date,
        export_entries,
    })
}

fn normalize_pathname(pathname: &str) -> String {
    if pathname.starts_with('/') {
        pathname.to_string()
    } else {
        format!("/{pathname}")
    }
}
