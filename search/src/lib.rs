//! Search and recency surfaces derived from the documentation index.
//!
//! [`SearchService`] flattens the index into a deduplicated, pre-lowercased,
//! title-sorted list of [`SearchResult`]s; [`RecentService`] derives a
//! time-windowed, newest-first [`RecentExport`] feed, optionally augmented by
//! the remote commit-map fallback. Both are memoized for the process
//! lifetime, matching the static-export build model.

mod filter;
mod recent;
mod result;
mod search;

pub use filter::ExcludedPathnames;
pub use recent::{RECENT_BADGE_LABEL, RECENT_WINDOW_DAYS, RecentExport, RecentService};
pub use result::SearchResult;
pub use search::SearchService;
