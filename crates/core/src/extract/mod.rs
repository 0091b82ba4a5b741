//! Row extraction from the status page.
//!
//! The page builds its chart with a series of `data.addRow([...]);`
//! statements. Each statement's bracketed contents is decoded by two
//! independent lexical scans: formatted `{v:X,f:'...'}` cells are collapsed
//! to `X`, then every comma-prefixed number is collected. A row must yield
//! exactly [`COLUMN_COUNT`](crate::status::COLUMN_COUNT) numbers or it is
//! rejected.

mod fragment;

pub use fragment::{campaign_of, normalize_fragment, numeric_tokens, parse_fragment};

use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::status::ExtractedRow;

/// `addRow([ ... ]);` statements, optionally qualified (`data.addRow`).
static ADD_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"addRow\s*\(\s*\[(.*?)\]\s*\)\s*;").expect("addRow pattern is valid")
});

/// Errors for a single row fragment.
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("Row {campaign:?}: need {expected} numeric columns, found {found}")]
    ColumnCount {
        campaign: String,
        expected: usize,
        found: usize,
    },
}

/// Outcome of scanning a whole page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Successfully decoded rows, in page order.
    pub rows: Vec<ExtractedRow>,
    /// Fragments dropped because they failed validation.
    pub rejected: usize,
}

impl Extraction {
    /// True when every fragment on the page decoded into a row.
    pub fn is_complete(&self) -> bool {
        self.rejected == 0
    }

    /// Total number of `addRow` fragments seen.
    pub fn fragments(&self) -> usize {
        self.rows.len() + self.rejected
    }
}

/// Decode every `addRow([...]);` fragment found in `html`.
///
/// Rejected fragments are logged and counted; the remaining rows are always
/// returned.
pub fn extract_rows(html: &str) -> Extraction {
    let mut extraction = Extraction::default();

    for caps in ADD_ROW.captures_iter(html) {
        let Some(fragment) = caps.get(1) else {
            continue;
        };
        debug!(fragment = fragment.as_str(), "Found addRow fragment");

        match parse_fragment(fragment.as_str()) {
            Ok(row) => extraction.rows.push(row),
            Err(e) => {
                warn!("{}", e);
                extraction.rejected += 1;
            }
        }
    }

    if extraction.is_complete() {
        info!(rows = extraction.rows.len(), "Extracted status rows");
    } else {
        warn!(
            rows = extraction.rows.len(),
            rejected = extraction.rejected,
            "Extracted status rows, some fragments were incomplete"
        );
    }

    extraction
}
