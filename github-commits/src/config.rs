use serde::{Deserialize, Serialize};

/// Environment variable carrying the commit-history token. Its absence
/// disables the fallback path entirely.
pub const COMMITS_TOKEN_ENV: &str = "TSLDOCS_COMMITS_TOKEN";

/// Tunables for the commit-map fetch. Page/worker/timeout bounds are fixed
/// heuristics; there is no backoff beyond the retry-permitting cache
/// invalidation in the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitMapConfig {
    /// API base, overridable for tests.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    pub owner: String,
    pub repo: String,

    /// Branch ref to walk.
    #[serde(default = "default_git_ref")]
    pub git_ref: String,

    /// Only commits touching this path prefix are listed.
    #[serde(default)]
    pub path_prefix: String,

    /// Only commits newer than this many days are listed.
    #[serde(default = "default_since_days")]
    pub since_days: i64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// How many of the most recent commits get a detail fetch.
    #[serde(default = "default_max_detail_commits")]
    pub max_detail_commits: usize,

    /// Worker pool width for the detail-fetch stage.
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,

    /// Hard deadline for the whole fetch, in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Auth token. Never serialized.
    #[serde(skip)]
    pub token: Option<String>,
}

impl CommitMapConfig {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            api_base: default_api_base(),
            owner: owner.into(),
            repo: repo.into(),
            git_ref: default_git_ref(),
            path_prefix: String::new(),
            since_days: default_since_days(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            max_detail_commits: default_max_detail_commits(),
            detail_concurrency: default_detail_concurrency(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            token: None,
        }
    }

    /// Read the token from [`COMMITS_TOKEN_ENV`], keeping an explicit token
    /// if one was already set.
    pub fn with_token_from_env(mut self) -> Self {
        if self.token.is_none() {
            self.token = std::env::var(COMMITS_TOKEN_ENV)
                .ok()
                .filter(|token| !token.is_empty());
        }
        self
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_git_ref() -> String {
    "main".to_string()
}

fn default_since_days() -> i64 {
    365
}

fn default_page_size() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    3
}

fn default_max_detail_commits() -> usize {
    30
}

fn default_detail_concurrency() -> usize {
    5
}

fn default_fetch_timeout_ms() -> u64 {
    8_000
}
