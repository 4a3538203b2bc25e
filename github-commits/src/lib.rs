//! Remote commit-map fallback.
//!
//! When the source tree cannot supply per-file commit history cheaply, the
//! recency surface falls back to the host's commit API: a bounded, paginated
//! commit listing filtered by ref, path prefix and since-date, followed by a
//! worker-pool detail-fetch stage that records the latest commit date seen
//! per changed file path.
//!
//! The whole fetch is raced against a timeout and memoized for the process
//! lifetime; a rate-limit signal or timeout discards the cached in-flight
//! future so a later call can retry. Callers always degrade to "no recency
//! data" instead of failing the page.

mod api;
mod client;
mod config;
mod error;

pub use client::{CommitMap, CommitMapClient};
pub use config::{COMMITS_TOKEN_ENV, CommitMapConfig};
pub use error::{CommitMapError, Result};
