//! Sift stage: selects idle campaigns from a written store.
//!
//! A campaign is idle when its name does not carry the release prefix and
//! every tracked counter is zero. `announced` and `normal_archived` are not
//! tracked: a campaign whose workflows are only announced or archived still
//! counts as idle.

use std::io;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::OutputPaths;
use crate::report::ReportWriter;
use crate::status::StatusRow;
use crate::store::{RowStore, SqliteRowStore, StoreError};

/// Campaigns named after a software release are never idle.
pub const RELEASE_PREFIX: &str = "CMSSW_";

/// Errors that abort the sift stage.
#[derive(Debug, Error)]
pub enum SiftError {
    /// The input store is missing or unreadable.
    #[error("Cannot read input store: {0}")]
    Input(#[source] StoreError),

    /// The sifted store could not be written.
    #[error("Cannot write sifted store: {0}")]
    Output(#[source] StoreError),

    /// The sifted report could not be written.
    #[error("Cannot write sifted report: {0}")]
    Report(#[source] io::Error),
}

/// Result of the sift stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiftSummary {
    /// Rows read from the input store.
    pub scanned: usize,
    /// Rows that passed the idle predicate.
    pub kept: usize,
}

/// Idle-campaign predicate.
pub fn keep(row: &StatusRow) -> bool {
    let c = &row.counters;
    !row.campaign.starts_with(RELEASE_PREFIX)
        && c.new_count == 0
        && c.assignment_approved == 0
        && c.assigned == 0
        && c.acquired == 0
        && c.running_open == 0
        && c.running_closed == 0
        && c.completed == 0
        && c.closed_out == 0
        && c.aborted == 0
        && c.aborted_completed == 0
        && c.aborted_archived == 0
        && c.failed == 0
        && c.rejected == 0
        && c.rejected_archived == 0
        && c.other == 0
}

/// Read `paths.store`, keep idle campaigns, and write them to
/// `paths.sifted_store` and `paths.sifted_report`.
///
/// Nothing is written when the input store cannot be opened.
pub fn sift_store(paths: &OutputPaths) -> Result<SiftSummary, SiftError> {
    let rows = {
        let input = SqliteRowStore::open(&paths.store).map_err(SiftError::Input)?;
        input.rows().map_err(SiftError::Input)?
    };

    let kept: Vec<StatusRow> = rows.iter().filter(|row| keep(row)).cloned().collect();
    for row in &kept {
        debug!(campaign = %row.campaign, "Idle campaign");
    }

    let output = SqliteRowStore::create(&paths.sifted_store).map_err(SiftError::Output)?;
    let mut report =
        ReportWriter::create(&paths.sifted_report, &paths.tag).map_err(SiftError::Report)?;

    for row in &kept {
        report.write_row(row).map_err(SiftError::Report)?;
    }
    report.write_total(kept.len()).map_err(SiftError::Report)?;
    report.finish().map_err(SiftError::Report)?;
    info!(
        "Filtered {} entries into {}",
        kept.len(),
        paths.sifted_report.display()
    );

    output.append(&kept).map_err(SiftError::Output)?;
    info!(
        "Filtered {} entries into {}",
        kept.len(),
        paths.sifted_store.display()
    );

    Ok(SiftSummary {
        scanned: rows.len(),
        kept: kept.len(),
    })
}
