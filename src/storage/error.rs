use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("filesystem error: {0}")]
    Fs(#[from] std::io::Error),

    #[error("malformed session file {path}: {source}")]
    Decode {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("could not encode session: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("invalid timestamp {0} in session file")]
    InvalidTimestamp(i64),
}
