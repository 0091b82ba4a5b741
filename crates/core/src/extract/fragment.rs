//! Lexical scans over a single `addRow([...])` fragment.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::warn;

use crate::status::{ExtractedRow, COLUMN_COUNT};

use super::RowError;

/// `{v: <number>, f: '<markup>'}` display cells.
static FORMATTED_CELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{v:\s*([+-]?[0-9]*\.?[0-9]+)\s*,\s*f:\s*'[^']*'\s*\}")
        .expect("formatted cell pattern is valid")
});

/// `campaign=<token>` up to the next double quote.
static CAMPAIGN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"campaign=([^"]+)"#).expect("campaign pattern is valid"));

/// Comma-prefixed numeric token. The start of the fragment, with any leading
/// whitespace, counts as a comma.
static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^\s*|,)([+-]?[0-9]+(?:\.[0-9]+)?)").expect("number pattern is valid")
});

/// Collapse every `{v:X,f:'...'}` cell to its raw value `X`.
///
/// Idempotent: the output contains no `{v:` cells left to collapse.
pub fn normalize_fragment(fragment: &str) -> Cow<'_, str> {
    FORMATTED_CELL.replace_all(fragment, "$1")
}

/// Campaign identifier of a normalized fragment, if it carries one.
pub fn campaign_of(normalized: &str) -> Option<&str> {
    CAMPAIGN
        .captures(normalized)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Every comma-prefixed number in the fragment, left to right.
///
/// Tokens that fail to parse are logged and skipped.
pub fn numeric_tokens(normalized: &str) -> Vec<f64> {
    NUMBER
        .captures_iter(normalized)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| match m.as_str().parse::<f64>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(token = m.as_str(), error = %e, "Skipping unparsable numeric token");
                None
            }
        })
        .collect()
}

/// Decode the bracketed contents of one `addRow([...])` fragment.
pub fn parse_fragment(fragment: &str) -> Result<ExtractedRow, RowError> {
    let normalized = normalize_fragment(fragment);

    let campaign = match campaign_of(&normalized) {
        Some(campaign) => campaign.to_string(),
        None => {
            warn!(
                fragment = %normalized,
                "No campaign= token in row, using the whole fragment as campaign"
            );
            normalized.to_string()
        }
    };

    let tokens = numeric_tokens(&normalized);
    let found = tokens.len();
    // Rows with extra trailing numbers are rejected, never truncated.
    let values: [f64; COLUMN_COUNT] = tokens.try_into().map_err(|_| RowError::ColumnCount {
        campaign: campaign.clone(),
        expected: COLUMN_COUNT,
        found,
    })?;

    Ok(ExtractedRow { campaign, values })
}
