//! Tabular writer: persists extracted rows as a structured store plus a
//! delimited report.

use std::path::Path;

use tracing::{info, warn};

use crate::config::OutputPaths;
use crate::report::{format_general, ReportWriter};
use crate::status::{ExtractedRow, StatusRow};
use crate::store::{RowStore, SqliteRowStore, StoreError};

/// Result of the write stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    /// Rows persisted in the structured store.
    pub rows: usize,
    /// Whether the delimited report was written completely.
    pub report_written: bool,
}

/// Write `rows` to a fresh store at `paths.store` and a fresh report at
/// `paths.report`, replacing any previous files.
///
/// Store failures are returned; report failures are logged and only clear
/// [`WriteSummary::report_written`].
pub fn write_outputs(
    rows: &[ExtractedRow],
    paths: &OutputPaths,
) -> Result<WriteSummary, StoreError> {
    let store = SqliteRowStore::create(&paths.store)?;

    let status_rows: Vec<StatusRow> = rows.iter().map(StatusRow::from).collect();
    for row in rows {
        let values: Vec<String> = row.values.iter().map(|v| format_general(*v)).collect();
        info!("{}: {}", row.campaign, values.join(" "));
    }

    let report_written = match write_report(&status_rows, &paths.report, &paths.tag) {
        Ok(()) => {
            info!(
                "Wrote {} entries into {}",
                status_rows.len(),
                paths.report.display()
            );
            true
        }
        Err(e) => {
            warn!(path = %paths.report.display(), "Failed to write report: {}", e);
            false
        }
    };

    let written = store.append(&status_rows)?;
    info!("Wrote {} entries to {}", written, paths.store.display());

    Ok(WriteSummary {
        rows: written,
        report_written,
    })
}

fn write_report(rows: &[StatusRow], path: &Path, tag: &str) -> std::io::Result<()> {
    let mut report = ReportWriter::create(path, tag)?;
    for row in rows {
        report.write_row(row)?;
    }
    report.finish()?;
    Ok(())
}
