use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("remote source error: {0}")]
    Remote(String),

    #[error("metadata extraction failed for {0}")]
    Metadata(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TreeError>;
