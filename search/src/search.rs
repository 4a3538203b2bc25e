use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;
use tsldocs_doc_index::{ExportIndexEntry, FileIndexEntry, IndexService, TslIndex};

use crate::filter::ExcludedPathnames;
use crate::result::SearchResult;

/// Memoized search corpus over the documentation index.
///
/// Export-level granularity is preferred: a file with exports contributes one
/// result per export, a file without exports contributes one file-level
/// result. Every navigable unit is searchable exactly once thanks to the
/// case-insensitive href dedup.
pub struct SearchService {
    index: Arc<IndexService>,
    excluded: ExcludedPathnames,
    cell: OnceCell<Arc<Vec<SearchResult>>>,
}

impl SearchService {
    pub fn new(index: Arc<IndexService>) -> Self {
        Self::with_exclusions(index, ExcludedPathnames::default())
    }

    pub fn with_exclusions(index: Arc<IndexService>, excluded: ExcludedPathnames) -> Self {
        Self {
            index,
            excluded,
            cell: OnceCell::new(),
        }
    }

    pub async fn search_results(&self) -> Arc<Vec<SearchResult>> {
        self.cell
            .get_or_init(|| async {
                let index = self.index.index().await;
                Arc::new(build_search_results(&index, &self.excluded))
            })
            .await
            .clone()
    }
}

fn build_search_results(index: &TslIndex, excluded: &ExcludedPathnames) -> Vec<SearchResult> {
    let mut results = Vec::new();

    for file in &index.files {
        if excluded.is_excluded(&file.pathname) {
            continue;
        }
        if file.export_entries.is_empty() {
            if let Some(result) = result_from_file(file) {
                results.push(result);
            }
            continue;
        }
        for export in &file.export_entries {
            if let Some(result) = result_from_export(export, file) {
                results.push(result);
            }
        }
    }

    let mut results = dedupe_by_href(results);
    results.sort_by(|a, b| {
        a.title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.title.cmp(&b.title))
    });
    debug!(results = results.len(), "search corpus built");
    results
}

fn result_from_file(file: &FileIndexEntry) -> Option<SearchResult> {
    let title = file.title.clone()?;
    Some(SearchResult::build(
        title,
        file.description.clone(),
        file.pathname.clone(),
        file.breadcrumb.clone(),
        file.last_commit_date,
    ))
}

fn result_from_export(export: &ExportIndexEntry, file: &FileIndexEntry) -> Option<SearchResult> {
    // Title falls back to the export name; entries with neither are not
    // searchable.
    let title = export.title.clone().or_else(|| export.name.clone())?;
    let created = export.first_commit_date.or(file.last_commit_date);
    Some(SearchResult::build(
        title,
        export.description.clone(),
        export.href.clone(),
        export.breadcrumb.clone(),
        created,
    ))
}

/// First occurrence wins; later entries with an equal lowercased href drop.
fn dedupe_by_href(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|result| seen.insert(result.href.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use time::macros::datetime;
    use tsldocs_source_tree::{MemoryDirectory, MemoryExport, MemoryFile, SourceDirectory};

    fn service_over(root: Arc<dyn SourceDirectory>) -> SearchService {
        SearchService::new(Arc::new(IndexService::new(root)))
    }

    #[tokio::test]
    async fn export_results_preferred_with_file_fallback() {
        let root = MemoryDirectory::new("nodes")
            .with_file(
                MemoryFile::new("/math/math-node")
                    .with_title("Math Node File")
                    .with_export(
                        MemoryExport::new("add")
                            .with_title("Add")
                            .with_description("Adds two nodes"),
                    ),
            )
            .with_file(MemoryFile::new("/guide").with_title("Guide"))
            .with_file(MemoryFile::new("/untitled"))
            .into_arc();

        let results = service_over(root).search_results().await;

        // One export result, one file-level result; the untitled file is
        // dropped.
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Add");
        assert_eq!(results[0].href, "/math/math-node#add");
        assert_eq!(results[1].title, "Guide");
        assert_eq!(results[1].href, "/guide");
    }

    #[tokio::test]
    async fn title_falls_back_to_export_name() {
        let root = MemoryDirectory::new("nodes")
            .with_file(
                MemoryFile::new("/core/node")
                    .with_export(MemoryExport::new("Node"))
                    .with_export(MemoryExport::anonymous()),
            )
            .into_arc();

        let results = service_over(root).search_results().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Node");
    }

    #[tokio::test]
    async fn dedup_is_case_insensitive_first_wins() {
        let root = MemoryDirectory::new("nodes")
            .with_file(
                MemoryFile::new("/a")
                    .with_export(MemoryExport::new("Shared").with_description("first")),
            )
            .with_file(
                MemoryFile::new("/A")
                    .with_export(MemoryExport::new("shared").with_description("second")),
            )
            .into_arc();

        let results = service_over(root).search_results().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].description.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn results_sorted_by_title_ascending() {
        let root = MemoryDirectory::new("nodes")
            .with_file(MemoryFile::new("/z").with_export(MemoryExport::new("zebra")))
            .with_file(MemoryFile::new("/a").with_export(MemoryExport::new("Apple")))
            .with_file(MemoryFile::new("/m").with_export(MemoryExport::new("mango")))
            .into_arc();

        let results = service_over(root).search_results().await;
        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "mango", "zebra"]);
    }

    #[tokio::test]
    async fn excluded_pathnames_never_surface() {
        let root = MemoryDirectory::new("nodes")
            .with_file(MemoryFile::new("/core/tsl-base").with_export(MemoryExport::new("barrel")))
            .with_file(MemoryFile::new("/core/node").with_export(MemoryExport::new("Node")))
            .into_arc();

        let results = service_over(root).search_results().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Node");
    }

    #[tokio::test]
    async fn export_created_at_falls_back_to_file_commit_date() {
        let root = MemoryDirectory::new("nodes")
            .with_file(
                MemoryFile::new("/core/node")
                    .with_last_commit_date(datetime!(2026-03-04 00:00:00 UTC))
                    .with_export(MemoryExport::new("Node")),
            )
            .into_arc();

        let results = service_over(root).search_results().await;
        assert_eq!(
            results[0].created_at.as_deref(),
            Some("2026-03-04T00:00:00Z")
        );
        assert_eq!(results[0].created_at_label.as_deref(), Some("Mar 4, 2026"));
    }

    #[tokio::test]
    async fn corpus_is_memoized() {
        let root = MemoryDirectory::new("nodes")
            .with_file(MemoryFile::new("/a").with_export(MemoryExport::new("A")))
            .into_arc();
        let service = service_over(root);

        let first = service.search_results().await;
        let second = service.search_results().await;
        assert!(Arc::ptr_eq(&first, &second));
    }
}
