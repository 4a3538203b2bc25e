//! Wire types for the commit API, limited to the fields the client reads.

use serde::Deserialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CommitSummary {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitDetail {
    pub commit: CommitInfo,

    #[serde(default)]
    pub files: Vec<CommitFile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitInfo {
    #[serde(default)]
    pub committer: Option<CommitSignature>,

    #[serde(default)]
    pub author: Option<CommitSignature>,
}

impl CommitInfo {
    /// Committer date, falling back to the author date.
    pub(crate) fn date(&self) -> Option<OffsetDateTime> {
        self.committer
            .as_ref()
            .and_then(|sig| sig.date)
            .or_else(|| self.author.as_ref().and_then(|sig| sig.date))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitSignature {
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub date: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitFile {
    pub filename: String,
}
