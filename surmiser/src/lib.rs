//! Surmiser: inline search-completion engine and input binding.
//!
//! This crate is rendering-agnostic: it takes input text plus a cursor
//! position and produces at most one ghost-text completion, sourced from the
//! pre-built search corpus. [`SurmiserEngine`] owns debouncing, provider
//! fan-out, cancellation and stale-result rejection; [`InputBinding`] is the
//! headless state machine a UI layer drives with key, composition, focus and
//! pointer events.
//!
//! Per attached input the engine moves Idle -> Pending -> Suggested ->
//! (Accepted | Dismissed) -> Idle. A superseded request's late result is
//! rejected twice over: its cancellation token fires, and its generation
//! stamp no longer matches.

mod binding;
mod context;
mod engine;
mod provider;
mod search_provider;

pub use binding::{BindingAction, InputBinding, Key};
pub use context::SuggestionContext;
pub use engine::{EngineConfig, SuggestionCallback, SurmiserEngine};
pub use provider::{Suggestion, SuggestionProvider};
pub use search_provider::SearchResultsProvider;
