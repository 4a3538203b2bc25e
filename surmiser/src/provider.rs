use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::context::SuggestionContext;

/// A proposed completion: the remainder to append, never the full string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,

    /// 0-100; the search provider never goes below its 70 floor.
    pub confidence: u8,

    pub provider_id: String,
}

/// Source of completions.
///
/// Implementations must treat the token cooperatively: check it on entry and
/// again before returning, so a superseded request can never produce a
/// visible suggestion. Any internal failure degrades to `None`.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    fn id(&self) -> &'static str;

    /// Higher-priority providers are consulted first.
    fn priority(&self) -> i32 {
        0
    }

    async fn suggest(
        &self,
        ctx: &SuggestionContext,
        cancel: &CancellationToken,
    ) -> Option<Suggestion>;
}
