//! Run orchestrator
//!
//! Walks the matched releases sequentially, gates each on the ledger, and
//! isolates per-release failures so one bad release never aborts the run.
//! The ledger is mutated in place; main persists it once after the run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::services::artwork;
use crate::services::catalog::{CatalogClient, MovieRecord};
use crate::services::ledger::{ItemStatus, Ledger};
use crate::services::nfo;

/// The catalog-facing operations the runner needs. The production
/// implementation is [CatalogClient]; tests substitute their own source.
#[async_trait]
pub trait ReleaseSource {
    async fn find_detail_link(&self, code: &str) -> Result<String, ScrapeError>;
    async fn fetch_detail(&self, link: &str) -> Result<MovieRecord, ScrapeError>;
    async fn fetch_artwork(&self, link: &str, dir: &Path) -> Result<(), ScrapeError>;
}

#[async_trait]
impl ReleaseSource for CatalogClient {
    async fn find_detail_link(&self, code: &str) -> Result<String, ScrapeError> {
        CatalogClient::find_detail_link(self, code).await
    }

    async fn fetch_detail(&self, link: &str) -> Result<MovieRecord, ScrapeError> {
        CatalogClient::fetch_detail(self, link).await
    }

    async fn fetch_artwork(&self, link: &str, dir: &Path) -> Result<(), ScrapeError> {
        artwork::fetch_and_crop(self, link, dir).await
    }
}

/// Counters for the operator-facing run summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Process every matched release once, updating the ledger in place.
///
/// Releases already marked done are skipped without any network traffic;
/// releases with no entry or a failed entry get the full pipeline. Any error
/// inside the pipeline is recorded as a failure and the run continues with
/// the next release.
pub async fn run<S: ReleaseSource>(
    source: &S,
    releases: &BTreeMap<String, PathBuf>,
    ledger: &mut Ledger,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for (code, dir) in releases {
        let dir_key = dir.to_string_lossy().to_string();
        if ledger.status(&dir_key) == Some(ItemStatus::Done) {
            info!(code = %code, dir = %dir.display(), "Already scraped, skipping");
            summary.skipped += 1;
            continue;
        }

        match process_release(source, code, dir).await {
            Ok(record) => {
                info!(code = %record.code, dir = %dir.display(), "Scraped release");
                ledger.record(&dir_key, ItemStatus::Done);
                summary.processed += 1;
            }
            Err(e) => {
                warn!(code = %code, dir = %dir.display(), error = %e, "Failed to scrape release");
                ledger.record(&dir_key, ItemStatus::Failed);
                summary.failed += 1;
            }
        }
    }

    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        failed = summary.failed,
        "Run complete"
    );
    summary
}

/// The full pipeline for one release: search, detail fetch, artwork, NFO.
async fn process_release<S: ReleaseSource>(
    source: &S,
    code: &str,
    dir: &Path,
) -> Result<MovieRecord, ScrapeError> {
    let link = source.find_detail_link(code).await?;
    let record = source.fetch_detail(&link).await?;
    source.fetch_artwork(&link, dir).await?;
    nfo::write_nfo(&record, &dir.join(nfo::NFO_FILENAME))?;
    Ok(record)
}
