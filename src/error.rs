//! Error taxonomy for the scrape pipeline.
//!
//! Per-item errors are caught at the runner's item boundary and recorded in
//! the ledger as failures. `Format` is only produced while loading the ledger
//! itself and aborts the whole run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The catalog search returned no result item for this code.
    #[error("no catalog match for code {0}")]
    NotFound(String),

    /// The detail page is missing fields the record cannot exist without.
    #[error("detail page unusable: {0}")]
    Parse(String),

    /// Transport failure, timeout, or non-2xx response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Filesystem read/write failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Cover image could not be decoded or re-encoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Ledger file exists but is not valid JSON of the expected shape.
    #[error("ledger file {path:?} is malformed: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
