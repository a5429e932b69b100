use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to initialize store at {}: {source}", path.display())]
    Init {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt store file: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("item does not exist")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, StoreError>;
