use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use reqwest::StatusCode;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};
use tsldocs_async_utils::try_map_concurrent;

use crate::api::{CommitDetail, CommitSummary};
use crate::config::CommitMapConfig;
use crate::error::{CommitMapError, Result};

/// Latest commit date seen per repository file path.
pub type CommitMap = HashMap<String, OffsetDateTime>;

const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
const USER_AGENT: &str = "tsldocs-github-commits";

/// Why a fetch produced no map. Cloneable so the shared in-flight future can
/// hand the same outcome to every waiter.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FetchFailure {
    RateLimited,
    TimedOut,
    Other(String),
}

type FetchOutcome = std::result::Result<Arc<CommitMap>, FetchFailure>;
type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

enum CacheSlot {
    Empty,
    InFlight(SharedFetch),
    Ready(Arc<CommitMap>),
}

/// Memoized commit-map fetcher.
///
/// The in-flight future is stored before the first await so concurrent first
/// callers share one fetch. Success is cached for the process lifetime;
/// rate-limit and timeout outcomes reset the slot so a later call may retry.
pub struct CommitMapClient {
    http: reqwest::Client,
    config: Arc<CommitMapConfig>,
    cache: Mutex<CacheSlot>,
}

impl CommitMapClient {
    /// Build a client. Fails when no token is configured, since the fallback
    /// path is disabled without one.
    pub fn new(config: CommitMapConfig) -> Result<Self> {
        if config.token.is_none() {
            return Err(CommitMapError::MissingToken);
        }
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
            cache: Mutex::new(CacheSlot::Empty),
        })
    }

    /// Build a client with the token taken from the environment, or `None`
    /// when the variable is unset and the fallback stays disabled.
    pub fn from_env(config: CommitMapConfig) -> Option<Self> {
        Self::new(config.with_token_from_env()).ok()
    }

    /// The commit map, or `None` when remote data is unavailable this call.
    pub async fn commit_map(&self) -> Option<Arc<CommitMap>> {
        let fetch = {
            let mut slot = self.cache.lock().await;
            match &*slot {
                CacheSlot::Ready(map) => return Some(Arc::clone(map)),
                CacheSlot::InFlight(fetch) => fetch.clone(),
                CacheSlot::Empty => {
                    let fetch = fetch_commit_map(self.http.clone(), Arc::clone(&self.config))
                        .boxed()
                        .shared();
                    *slot = CacheSlot::InFlight(fetch.clone());
                    fetch
                }
            }
        };

        match fetch.await {
            Ok(map) => {
                let mut slot = self.cache.lock().await;
                *slot = CacheSlot::Ready(Arc::clone(&map));
                Some(map)
            }
            Err(failure) => {
                // Discard the cached future so a later call can retry.
                let mut slot = self.cache.lock().await;
                if matches!(&*slot, CacheSlot::InFlight(_)) {
                    *slot = CacheSlot::Empty;
                }
                match failure {
                    FetchFailure::RateLimited => {
                        warn!("commit API rate limit exhausted, proceeding without remote data");
                    }
                    FetchFailure::TimedOut => {
                        warn!("commit map fetch timed out, proceeding without remote data");
                    }
                    FetchFailure::Other(reason) => {
                        warn!(%reason, "commit map fetch failed, proceeding without remote data");
                    }
                }
                None
            }
        }
    }
}

async fn fetch_commit_map(http: reqwest::Client, config: Arc<CommitMapConfig>) -> FetchOutcome {
    let deadline = Duration::from_millis(config.fetch_timeout_ms);
    match timeout(deadline, fetch_inner(&http, config.as_ref())).await {
        Ok(outcome) => outcome,
        Err(_) => Err(FetchFailure::TimedOut),
    }
}

async fn fetch_inner(http: &reqwest::Client, config: &CommitMapConfig) -> FetchOutcome {
    let mut commits = list_commits(http, config).await?;
    debug!(commits = commits.len(), "commit listing complete");

    commits.truncate(config.max_detail_commits);

    // Detail fetches run through the worker pool; a rate-limit signal aborts
    // the stage, anything else degrades to "no data for this commit".
    let details = try_map_concurrent(commits, config.detail_concurrency, |summary, _| {
        fetch_detail(http, config, summary)
    })
    .await?;

    // Commits arrive newest first, so the first writer per path wins.
    let mut map = CommitMap::new();
    for detail in details.into_iter().flatten() {
        let Some(date) = detail.commit.date() else {
            continue;
        };
        for file in detail.files {
            map.entry(file.filename).or_insert(date);
        }
    }

    debug!(paths = map.len(), "commit map assembled");
    Ok(Arc::new(map))
}

async fn list_commits(
    http: &reqwest::Client,
    config: &CommitMapConfig,
) -> std::result::Result<Vec<CommitSummary>, FetchFailure> {
    let since = OffsetDateTime::now_utc() - time::Duration::days(config.since_days);
    let since = since
        .format(&Rfc3339)
        .map_err(|err| FetchFailure::Other(err.to_string()))?;

    let url = format!(
        "{}/repos/{}/{}/commits",
        config.api_base, config.owner, config.repo
    );

    let mut commits = Vec::new();
    for page in 1..=config.max_pages {
        let mut request = http
            .get(&url)
            .header("accept", "application/vnd.github+json")
            .query(&[
                ("sha", config.git_ref.as_str()),
                ("path", config.path_prefix.as_str()),
                ("since", since.as_str()),
            ])
            .query(&[("per_page", config.page_size), ("page", page)]);
        if let Some(token) = &config.token {
            request = request.header("authorization", format!("Bearer {token}"));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(page, error = %err, "commit listing request failed");
                break;
            }
        };
        if is_rate_limited(&response) {
            return Err(FetchFailure::RateLimited);
        }
        if !response.status().is_success() {
            warn!(page, status = %response.status(), "commit listing returned non-OK status");
            break;
        }

        let page_commits: Vec<CommitSummary> = match response.json().await {
            Ok(page_commits) => page_commits,
            Err(err) => {
                warn!(page, error = %err, "commit listing returned malformed JSON");
                break;
            }
        };

        let page_len = page_commits.len();
        commits.extend(page_commits);
        if page_len < config.page_size as usize {
            break;
        }
    }

    Ok(commits)
}

async fn fetch_detail(
    http: &reqwest::Client,
    config: &CommitMapConfig,
    summary: CommitSummary,
) -> std::result::Result<Option<CommitDetail>, FetchFailure> {
    let url = format!(
        "{}/repos/{}/{}/commits/{}",
        config.api_base, config.owner, config.repo, summary.sha
    );

    let mut request = http.get(&url).header("accept", "application/vnd.github+json");
    if let Some(token) = &config.token {
        request = request.header("authorization", format!("Bearer {token}"));
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => {
            warn!(sha = %summary.sha, error = %err, "commit detail request failed");
            return Ok(None);
        }
    };
    if is_rate_limited(&response) {
        return Err(FetchFailure::RateLimited);
    }
    if !response.status().is_success() {
        warn!(sha = %summary.sha, status = %response.status(), "commit detail returned non-OK status");
        return Ok(None);
    }

    match response.json().await {
        Ok(detail) => Ok(Some(detail)),
        Err(err) => {
            warn!(sha = %summary.sha, error = %err, "commit detail returned malformed JSON");
            Ok(None)
        }
    }
}

/// 429, or 403 with a zero remaining quota header.
fn is_rate_limited(response: &reqwest::Response) -> bool {
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    response.status() == StatusCode::FORBIDDEN
        && response
            .headers()
            .get(RATE_LIMIT_REMAINING_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.trim() == "0")
}
