use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::OnceCell;
use tracing::debug;
use tsldocs_doc_index::{IndexService, TslIndex};
use tsldocs_github_commits::{CommitMap, CommitMapClient};

use crate::filter::ExcludedPathnames;

/// Exports younger than this many days count as recently added.
pub const RECENT_WINDOW_DAYS: i64 = 365;

/// Badge shown next to recent exports on rendered cards.
pub const RECENT_BADGE_LABEL: &str = "New";

/// One recently added export, newest first in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentExport {
    pub name: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,

    /// Resolved creation date; the recency cutoff and sort key.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Route pathname for the file, starting with `/`.
    pub file_pathname: String,

    /// Full link to the export, hash fragment included.
    pub href: String,

    /// Path-like label showing where the export lives.
    pub breadcrumb: String,
}

/// Memoized recency feed.
///
/// The primary path reads first-commit dates straight off the index. When a
/// commit-map client is supplied, files whose exports carry no date of their
/// own are resolved through the remote map keyed by repository path; without
/// a client recency simply degrades to "unknown" for those exports.
pub struct RecentService {
    index: Arc<IndexService>,
    commit_map: Option<Arc<CommitMapClient>>,
    excluded: ExcludedPathnames,
    window_days: i64,
    cell: OnceCell<Arc<Vec<RecentExport>>>,
}

impl RecentService {
    pub fn new(index: Arc<IndexService>) -> Self {
        Self {
            index,
            commit_map: None,
            excluded: ExcludedPathnames::default(),
            window_days: RECENT_WINDOW_DAYS,
            cell: OnceCell::new(),
        }
    }

    pub fn with_commit_map(mut self, client: Arc<CommitMapClient>) -> Self {
        self.commit_map = Some(client);
        self
    }

    pub fn with_exclusions(mut self, excluded: ExcludedPathnames) -> Self {
        self.excluded = excluded;
        self
    }

    pub fn with_window_days(mut self, days: i64) -> Self {
        self.window_days = days;
        self
    }

    /// The recency feed, truncated to `limit` entries after the full sort.
    pub async fn recent_exports(&self, limit: Option<usize>) -> Vec<RecentExport> {
        let all = self
            .cell
            .get_or_init(|| async {
                let index = self.index.index().await;
                let remote = match &self.commit_map {
                    Some(client) if wants_remote_dates(&index) => client.commit_map().await,
                    _ => None,
                };
                Arc::new(build_recent_exports(
                    &index,
                    remote.as_deref(),
                    &self.excluded,
                    self.window_days,
                    OffsetDateTime::now_utc(),
                ))
            })
            .await;

        match limit {
            Some(limit) => all.iter().take(limit).cloned().collect(),
            None => all.as_ref().clone(),
        }
    }
}

/// The remote map is only worth fetching when some export has no local date.
fn wants_remote_dates(index: &TslIndex) -> bool {
    index
        .export_entries
        .iter()
        .any(|export| export.first_commit_date.is_none())
}

fn build_recent_exports(
    index: &TslIndex,
    remote: Option<&CommitMap>,
    excluded: &ExcludedPathnames,
    window_days: i64,
    now: OffsetDateTime,
) -> Vec<RecentExport> {
    let cutoff = now - time::Duration::days(window_days);
    let mut recent = Vec::new();

    for file in &index.files {
        if excluded.is_excluded(&file.pathname) {
            continue;
        }
        let remote_date = remote.and_then(|map| {
            file.repository_path
                .as_deref()
                .and_then(|path| map.get(path))
                .copied()
        });

        for export in &file.export_entries {
            let Some(created_at) = export.first_commit_date.or(remote_date) else {
                continue;
            };
            if created_at < cutoff {
                continue;
            }
            // An export we cannot link to is useless in the feed.
            let Some(name) = export.name.clone().or_else(|| export.slug.clone()) else {
                continue;
            };
            let title = export.title.clone().unwrap_or_else(|| name.clone());
            let slug = export.slug.clone().unwrap_or_else(|| name.clone());

            recent.push(RecentExport {
                name,
                title,
                slug,
                description: export.description.clone(),
                created_at,
                file_pathname: export.file_pathname.clone(),
                href: export.href.clone(),
                breadcrumb: export.breadcrumb.clone(),
            });
        }
    }

    // Stable sort: identical dates retain traversal order.
    recent.sort_by_key(|export| std::cmp::Reverse(export.created_at));
    debug!(recent = recent.len(), "recency feed built");
    recent
}
