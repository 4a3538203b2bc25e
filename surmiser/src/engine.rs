use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::context::SuggestionContext;
use crate::provider::{Suggestion, SuggestionProvider};

pub type SuggestionCallback = Arc<dyn Fn(Option<Suggestion>) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// A new keystroke within this window cancels the prior pending request.
    pub debounce: Duration,

    /// Suggestions below this confidence are dropped.
    pub min_confidence: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(120),
            min_confidence: 70,
        }
    }
}

/// Debouncing, cancelling suggestion engine.
///
/// Every request gets a fresh cancellation token and a generation stamp.
/// Issuing a new request cancels the previous token; on completion the stamp
/// is compared against the latest one, so even a provider that ignores its
/// token cannot apply a stale result.
pub struct SurmiserEngine {
    providers: Vec<Arc<dyn SuggestionProvider>>,
    config: EngineConfig,
    generation: AtomicU64,
    current: Mutex<Option<Suggestion>>,
    active: Mutex<CancellationToken>,
    on_suggestion: Option<SuggestionCallback>,
}

impl SurmiserEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            providers: Vec::new(),
            config,
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
            active: Mutex::new(CancellationToken::new()),
            on_suggestion: None,
        }
    }

    /// Providers are consulted highest priority first.
    pub fn with_provider(mut self, provider: Arc<dyn SuggestionProvider>) -> Self {
        self.providers.push(provider);
        self.providers
            .sort_by_key(|provider| std::cmp::Reverse(provider.priority()));
        self
    }

    pub fn with_on_suggestion(mut self, callback: SuggestionCallback) -> Self {
        self.on_suggestion = Some(callback);
        self
    }

    pub fn current_suggestion(&self) -> Option<Suggestion> {
        self.lock(&self.current).clone()
    }

    /// Submit a new context. The previous pending request, if any, is
    /// cancelled immediately; the new one resolves after the debounce window.
    pub fn request_suggestion(self: &Arc<Self>, ctx: SuggestionContext) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = self.replace_active_token();

        let engine = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(engine.config.debounce) => {}
            }

            let mut accepted = None;
            for provider in &engine.providers {
                if token.is_cancelled() {
                    return;
                }
                if let Some(suggestion) = provider.suggest(&ctx, &token).await {
                    if suggestion.confidence >= engine.config.min_confidence {
                        accepted = Some(suggestion);
                        break;
                    }
                    debug!(
                        provider = provider.id(),
                        confidence = suggestion.confidence,
                        "suggestion below confidence floor"
                    );
                }
            }

            // Stale results must not touch state, even when the token was
            // never observed by the provider.
            if token.is_cancelled() || engine.generation.load(Ordering::SeqCst) != generation {
                return;
            }
            engine.apply(accepted);
        });
    }

    /// Cancel any pending request and drop the current suggestion.
    pub fn clear_suggestion(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.lock(&self.active).cancel();
        self.apply(None);
    }

    fn apply(&self, suggestion: Option<Suggestion>) {
        *self.lock(&self.current) = suggestion.clone();
        if let Some(callback) = &self.on_suggestion {
            callback(suggestion);
        }
    }

    fn replace_active_token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = std::mem::replace(&mut *self.lock(&self.active), token.clone());
        previous.cancel();
        token
    }

    fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;
    use tokio::time::{advance, sleep};

    struct EchoProvider {
        delay: Duration,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SuggestionProvider for EchoProvider {
        fn id(&self) -> &'static str {
            "echo"
        }

        async fn suggest(
            &self,
            ctx: &SuggestionContext,
            _cancel: &CancellationToken,
        ) -> Option<Suggestion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            sleep(self.delay).await;
            Some(Suggestion {
                text: format!("<{}>", ctx.query()),
                confidence: 90,
                provider_id: "echo".to_string(),
            })
        }
    }

    fn engine_with(provider: EchoProvider) -> Arc<SurmiserEngine> {
        Arc::new(SurmiserEngine::new(EngineConfig::default()).with_provider(Arc::new(provider)))
    }

    #[tokio::test(start_paused = true)]
    async fn suggestion_arrives_after_debounce() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = engine_with(EchoProvider {
            delay: Duration::ZERO,
            calls: Arc::clone(&calls),
        });

        engine.request_suggestion(SuggestionContext::new("math", 4));
        assert_eq!(engine.current_suggestion(), None);

        sleep(Duration::from_millis(200)).await;
        let suggestion = engine.current_suggestion().expect("suggestion");
        assert_eq!(suggestion.text, "<math>");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn keystroke_within_debounce_window_cancels_prior_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = engine_with(EchoProvider {
            delay: Duration::ZERO,
            calls: Arc::clone(&calls),
        });

        engine.request_suggestion(SuggestionContext::new("ma", 2));
        advance(Duration::from_millis(50)).await;
        engine.request_suggestion(SuggestionContext::new("mat", 3));

        sleep(Duration::from_millis(300)).await;
        // Exactly one applied suggestion, from the second request.
        let suggestion = engine.current_suggestion().expect("suggestion");
        assert_eq!(suggestion.text, "<mat>");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_stale_result_never_overwrites_newer_one() {
        let calls = Arc::new(AtomicUsize::new(0));
        // Provider slower than the debounce window: the first request's
        // provider call is already running when the second request lands.
        let engine = engine_with(EchoProvider {
            delay: Duration::from_millis(100),
            calls: Arc::clone(&calls),
        });

        engine.request_suggestion(SuggestionContext::new("first", 5));
        advance(Duration::from_millis(150)).await;
        engine.request_suggestion(SuggestionContext::new("second", 6));

        sleep(Duration::from_millis(500)).await;
        let suggestion = engine.current_suggestion().expect("suggestion");
        assert_eq!(suggestion.text, "<second>");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_cancels_pending_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = engine_with(EchoProvider {
            delay: Duration::ZERO,
            calls: Arc::clone(&calls),
        });

        engine.request_suggestion(SuggestionContext::new("math", 4));
        engine.clear_suggestion();

        sleep(Duration::from_millis(300)).await;
        assert_eq!(engine.current_suggestion(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    struct NoneProvider;

    #[async_trait]
    impl SuggestionProvider for NoneProvider {
        fn id(&self) -> &'static str {
            "none"
        }

        async fn suggest(
            &self,
            _ctx: &SuggestionContext,
            _cancel: &CancellationToken,
        ) -> Option<Suggestion> {
            None
        }
    }

    #[tokio::test(start_paused = true)]
    async fn no_match_clears_the_previous_suggestion() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = Arc::new(
            SurmiserEngine::new(EngineConfig::default())
                .with_provider(Arc::new(EchoProvider {
                    delay: Duration::ZERO,
                    calls: Arc::clone(&calls),
                }))
                .with_provider(Arc::new(NoneProvider)),
        );

        engine.request_suggestion(SuggestionContext::new("math", 4));
        sleep(Duration::from_millis(200)).await;
        assert!(engine.current_suggestion().is_some());

        engine.clear_suggestion();
        assert_eq!(engine.current_suggestion(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn low_confidence_suggestions_are_dropped() {
        struct WeakProvider;

        #[async_trait]
        impl SuggestionProvider for WeakProvider {
            fn id(&self) -> &'static str {
                "weak"
            }

            async fn suggest(
                &self,
                _ctx: &SuggestionContext,
                _cancel: &CancellationToken,
            ) -> Option<Suggestion> {
                Some(Suggestion {
                    text: "weak".to_string(),
                    confidence: 10,
                    provider_id: "weak".to_string(),
                })
            }
        }

        let engine =
            Arc::new(SurmiserEngine::new(EngineConfig::default()).with_provider(Arc::new(WeakProvider)));
        engine.request_suggestion(SuggestionContext::new("math", 4));
        sleep(Duration::from_millis(200)).await;
        assert_eq!(engine.current_suggestion(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn callback_observes_transitions() {
        let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_in_callback = Arc::clone(&seen);
        let callback: SuggestionCallback = Arc::new(move |suggestion: Option<Suggestion>| {
            let mut log = seen_in_callback
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            log.push(suggestion.map(|s| s.text));
        });

        let engine = Arc::new(
            SurmiserEngine::new(EngineConfig::default())
                .with_provider(Arc::new(EchoProvider {
                    delay: Duration::ZERO,
                    calls: Arc::new(AtomicUsize::new(0)),
                }))
                .with_on_suggestion(callback),
        );

        engine.request_suggestion(SuggestionContext::new("a", 1));
        sleep(Duration::from_millis(200)).await;
        engine.clear_suggestion();

        let log = seen.lock().unwrap_or_else(PoisonError::into_inner).clone();
        assert_eq!(log, vec![Some("<a>".to_string()), None]);
    }
}
