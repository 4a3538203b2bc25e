use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tsldocs_search::SearchResult;

use crate::context::SuggestionContext;
use crate::provider::{Suggestion, SuggestionProvider};

const PROVIDER_ID: &str = "tsl-search";

/// Completion provider backed by the pre-built search corpus.
///
/// The query must be a strict case-insensitive prefix of a candidate field,
/// tried in order: title, then breadcrumb, then description. Confidence
/// grows with how much of the title the query already covers, floored at 70;
/// a perfect-confidence match short-circuits the scan.
pub struct SearchResultsProvider {
    results: Arc<Vec<SearchResult>>,
}

impl SearchResultsProvider {
    pub fn new(results: Arc<Vec<SearchResult>>) -> Self {
        Self { results }
    }
}

#[async_trait]
impl SuggestionProvider for SearchResultsProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> i32 {
        100
    }

    async fn suggest(
        &self,
        ctx: &SuggestionContext,
        cancel: &CancellationToken,
    ) -> Option<Suggestion> {
        if cancel.is_cancelled() {
            return None;
        }
        let query = ctx.query();
        if query.is_empty() {
            return None;
        }
        let normalized = query.to_lowercase();
        let query_chars = query.chars().count();

        let mut best: Option<Suggestion> = None;
        for item in self.results.iter() {
            let Some(text) = completion(&normalized, query_chars, item) else {
                continue;
            };
            let confidence = compute_confidence(query_chars, item.title.chars().count());
            if best
                .as_ref()
                .is_none_or(|current| confidence > current.confidence)
            {
                best = Some(Suggestion {
                    text,
                    confidence,
                    provider_id: PROVIDER_ID.to_string(),
                });
            }
            if confidence == 100 {
                break;
            }
        }

        if cancel.is_cancelled() {
            return None;
        }
        best
    }
}

/// The field's remainder past the query, for the first field the query
/// strictly prefixes.
fn completion(normalized: &str, query_chars: usize, item: &SearchResult) -> Option<String> {
    try_field(&item.title, &item.title_lower, normalized, query_chars)
        .or_else(|| {
            try_field(
                &item.breadcrumb,
                &item.breadcrumb_lower,
                normalized,
                query_chars,
            )
        })
        .or_else(|| {
            item.description.as_ref().and_then(|description| {
                try_field(description, &item.description_lower, normalized, query_chars)
            })
        })
}

fn try_field(field: &str, lower: &str, normalized: &str, query_chars: usize) -> Option<String> {
    if field.chars().count() <= query_chars {
        return None;
    }
    if !lower.starts_with(normalized) {
        return None;
    }
    let remainder: String = field.chars().skip(query_chars).collect();
    (!remainder.is_empty()).then_some(remainder)
}

/// Monotonic in `query_chars / title_chars`, clamped to 70..=100.
fn compute_confidence(query_chars: usize, title_chars: usize) -> u8 {
    if title_chars == 0 {
        return 0;
    }
    let ratio = (query_chars as f64 / title_chars as f64).min(1.0);
    let score = (75.0 + ratio * 25.0).round();
    score.clamp(70.0, 100.0) as u8
}
