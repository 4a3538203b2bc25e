use std::sync::Arc;

use serde::Serialize;
use tracing::warn;
use tsldocs_source_tree::{SourceDirectory, SourceEntry};

/// One sidebar category, derived from a top-level directory of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub key: String,
    pub label: String,
}

/// Top-level directories exposed as sidebar categories, in tree order.
/// Files at the root level carry no category and are not listed here.
pub async fn categories(root: &Arc<dyn SourceDirectory>) -> Vec<Category> {
    let entries = match root.entries().await {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, "failed to list root directory for categories");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| match entry {
            SourceEntry::Directory(dir) => {
                let key = dir.slug();
                let label = dir.title().unwrap_or_else(|| titleize(&key));
                Some(Category { key, label })
            }
            SourceEntry::File(_) => None,
        })
        .collect()
}

/// `"math-ops"` -> `"Math Ops"`.
fn titleize(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
