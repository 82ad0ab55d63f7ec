use std::path::PathBuf;

use thiserror::Error;

use crate::http::error::RequestError;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("could not download {url}: {source}")]
    Download { url: String, source: RequestError },

    #[error("could not read {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed track list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid selector '{0}'")]
    Selector(String),

    #[error("unexpected page layout: {0}")]
    Layout(String),
}
