use thiserror::Error;

/// Fatal failures of the catalog session, each one aborts the run
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("authorization error: {0}")]
    Authorization(String),
}
