//! End-to-end run: fetch, extract, write, sift.
//!
//! Stages run strictly in sequence. Only store creation in the write stage
//! is fatal here; fetch failures degrade to an empty page and a failed sift
//! stage is logged and reported as `sifted: None`.

use thiserror::Error;
use tracing::{error, info};

use crate::config::OutputPaths;
use crate::extract::extract_rows;
use crate::fetcher::{fetch_page_lenient, Fetcher};
use crate::sift::sift_store;
use crate::store::StoreError;
use crate::writer::write_outputs;

/// Fatal pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Cannot create structured store: {0}")]
    Store(#[from] StoreError),
}

/// What a run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Size of the fetched page in bytes.
    pub fetched_bytes: usize,
    /// Rows decoded from the page.
    pub extracted: usize,
    /// Fragments rejected by the extractor.
    pub rejected: usize,
    /// Rows written to the structured store.
    pub written: usize,
    /// Idle campaigns, `None` if the sift stage aborted.
    pub sifted: Option<usize>,
}

/// A configured run over one fetcher and one set of output paths.
pub struct Pipeline<F: Fetcher> {
    fetcher: F,
    paths: OutputPaths,
}

impl<F: Fetcher> Pipeline<F> {
    pub fn new(fetcher: F, paths: OutputPaths) -> Self {
        Self { fetcher, paths }
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    /// Run every stage against `url`.
    pub async fn run(&self, url: &str) -> Result<RunSummary, PipelineError> {
        let html = fetch_page_lenient(&self.fetcher, url).await;
        let fetched_bytes = html.len();

        let extraction = extract_rows(&html);
        drop(html);

        let written = write_outputs(&extraction.rows, &self.paths)?;
        info!("Successfully parsed {} rows", written.rows);

        let sifted = match sift_store(&self.paths) {
            Ok(summary) => Some(summary.kept),
            Err(e) => {
                error!("Sift stage aborted: {}", e);
                None
            }
        };

        Ok(RunSummary {
            fetched_bytes,
            extracted: extraction.rows.len(),
            rejected: extraction.rejected,
            written: written.rows,
            sifted,
        })
    }
}
