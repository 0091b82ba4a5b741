//! Campaign status rows.

use serde::{Deserialize, Serialize};

/// Number of numeric fields in every status row.
pub const COLUMN_COUNT: usize = 18;

/// A status row as decoded from one `addRow([...])` fragment.
///
/// `values` holds the 18 numeric cells in page order; index 0 is the
/// "days since last request" value, indices 1..=17 are the status counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRow {
    pub campaign: String,
    pub values: [f64; COLUMN_COUNT],
}

/// Per-status workflow counters for one campaign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounters {
    pub new_count: i64,
    pub assignment_approved: i64,
    pub assigned: i64,
    pub acquired: i64,
    pub running_open: i64,
    pub running_closed: i64,
    pub completed: i64,
    pub closed_out: i64,
    pub announced: i64,
    pub normal_archived: i64,
    pub aborted: i64,
    pub aborted_completed: i64,
    pub aborted_archived: i64,
    pub failed: i64,
    pub rejected: i64,
    pub rejected_archived: i64,
    pub other: i64,
}

impl StatusCounters {
    /// Counters in column order (store columns 2..=18).
    pub fn to_array(&self) -> [i64; COLUMN_COUNT - 1] {
        [
            self.new_count,
            self.assignment_approved,
            self.assigned,
            self.acquired,
            self.running_open,
            self.running_closed,
            self.completed,
            self.closed_out,
            self.announced,
            self.normal_archived,
            self.aborted,
            self.aborted_completed,
            self.aborted_archived,
            self.failed,
            self.rejected,
            self.rejected_archived,
            self.other,
        ]
    }

    pub fn from_array(c: [i64; COLUMN_COUNT - 1]) -> Self {
        Self {
            new_count: c[0],
            assignment_approved: c[1],
            assigned: c[2],
            acquired: c[3],
            running_open: c[4],
            running_closed: c[5],
            completed: c[6],
            closed_out: c[7],
            announced: c[8],
            normal_archived: c[9],
            aborted: c[10],
            aborted_completed: c[11],
            aborted_archived: c[12],
            failed: c[13],
            rejected: c[14],
            rejected_archived: c[15],
            other: c[16],
        }
    }
}

/// A typed status row as persisted in the structured store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRow {
    pub campaign: String,
    pub last_request_days: f64,
    pub counters: StatusCounters,
}

impl From<&ExtractedRow> for StatusRow {
    /// Counters are converted by truncation toward zero.
    fn from(row: &ExtractedRow) -> Self {
        let mut counters = [0i64; COLUMN_COUNT - 1];
        for (slot, value) in counters.iter_mut().zip(&row.values[1..]) {
            *slot = *value as i64;
        }
        Self {
            campaign: row.campaign.clone(),
            last_request_days: row.values[0],
            counters: StatusCounters::from_array(counters),
        }
    }
}

impl From<ExtractedRow> for StatusRow {
    fn from(row: ExtractedRow) -> Self {
        StatusRow::from(&row)
    }
}
