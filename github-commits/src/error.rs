use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommitMapError {
    #[error("commit-history token is not configured")]
    MissingToken,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CommitMapError>;
