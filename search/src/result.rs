use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// One searchable unit: an export, or a file without exports.
///
/// Shadow `*_lower` fields are pre-computed at build time so query-time
/// matching never re-lowercases the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub description: Option<String>,

    /// Route-relative link, `#anchor` included for exports.
    pub href: String,

    pub breadcrumb: String,

    /// RFC 3339 creation timestamp, when history supplied one.
    pub created_at: Option<String>,

    /// Human-readable creation date, e.g. `"Jan 2, 2026"`.
    pub created_at_label: Option<String>,

    pub title_lower: String,
    pub description_lower: String,
    pub breadcrumb_lower: String,
}

impl SearchResult {
    pub(crate) fn build(
        title: String,
        description: Option<String>,
        href: String,
        breadcrumb: String,
        created: Option<OffsetDateTime>,
    ) -> Self {
        let (created_at, created_at_label) = serialize_date(created);
        Self {
            title_lower: title.to_lowercase(),
            description_lower: description.as_deref().unwrap_or_default().to_lowercase(),
            breadcrumb_lower: breadcrumb.to_lowercase(),
            title,
            description,
            href,
            breadcrumb,
            created_at,
            created_at_label,
        }
    }
}

/// RFC 3339 string plus a short display label, both `None` when no date or
/// when formatting fails.
fn serialize_date(date: Option<OffsetDateTime>) -> (Option<String>, Option<String>) {
    let Some(date) = date else {
        return (None, None);
    };
    let label_format = format_description!("[month repr:short] [day padding:none], [year]");
    (
        date.format(&Rfc3339).ok(),
        date.format(&label_format).ok(),
    )
}
