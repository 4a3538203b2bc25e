//! Bounded-concurrency async mapping.
//!
//! Remote source trees rate-limit aggressively, so every fan-out in the
//! indexing pipeline goes through [`map_concurrent`] (or its fallible twin
//! [`try_map_concurrent`]) instead of joining an unbounded set of futures.
//! Output order always matches input order regardless of completion order.

use std::future::Future;

use futures::StreamExt;
use futures::TryStreamExt;
use futures::stream;

/// Map `items` through `f` with at most `limit` calls in flight at once.
///
/// Results land at the same position their input occupied. An empty input
/// resolves immediately without driving any futures. A `limit` of zero is
/// treated as one.
pub async fn map_concurrent<T, R, F, Fut>(items: Vec<T>, limit: usize, f: F) -> Vec<R>
where
    F: Fn(T, usize) -> Fut,
    Fut: Future<Output = R>,
{
    if items.is_empty() {
        return Vec::new();
    }
    stream::iter(items.into_iter().enumerate().map(|(idx, item)| f(item, idx)))
        .buffered(limit.max(1))
        .collect()
        .await
}

/// Fallible variant of [`map_concurrent`].
///
/// The first error any call produces is surfaced and the remaining work is
/// dropped. Callers that must tolerate partial failure catch per item inside
/// `f` instead (the file-level index traversal does exactly that).
pub async fn try_map_concurrent<T, R, E, F, Fut>(
    items: Vec<T>,
    limit: usize,
    f: F,
) -> Result<Vec<R>, E>
where
    F: Fn(T, usize) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    if items.is_empty() {
        return Ok(Vec::new());
    }
    stream::iter(
        items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| Ok(f(item, idx))),
    )
    .try_buffered(limit.max(1))
    .try_collect()
    .await
}
