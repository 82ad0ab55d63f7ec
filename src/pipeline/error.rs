use thiserror::Error;

use crate::{
    catalog::error::CatalogError, scrapers::error::ScrapeError, storage::error::StorageError,
};

/// Conditions that abort the whole run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("scraping failed: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("could not create playlist '{0}'")]
    PlaylistNotCreated(String),

    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),
}
