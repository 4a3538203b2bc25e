//! Site-wide documentation index.
//!
//! Walks a [`tsldocs_source_tree`] snapshot once per process and produces the
//! flat [`TslIndex`] every other surface (search, recency, suggestions) reads.
//! The build is memoized behind a shared future, so concurrent first callers
//! all await the same traversal and later callers get the cached `Arc`.

mod builder;
mod categories;
mod model;

pub use builder::{DIR_FAN_OUT, EXPORT_FAN_OUT, IndexService};
pub use categories::{Category, categories};
pub use model::{ExportIndexEntry, FileIndexEntry, TslIndex};
