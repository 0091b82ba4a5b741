//! Row shapes shared by every pipeline stage.
//!
//! The extractor produces [`ExtractedRow`]s; the writer converts them into
//! [`StatusRow`]s, which is the shape persisted in the structured store and
//! read back by the sift stage.

mod types;

pub use types::*;

/// Store column names, in column order.
pub const STORE_COLUMNS: [&str; COLUMN_COUNT] = [
    "last_request_days",
    "new_count",
    "assignment_approved",
    "assigned",
    "acquired",
    "running_open",
    "running_closed",
    "completed",
    "closed_out",
    "announced",
    "normal_archived",
    "aborted",
    "aborted_completed",
    "aborted_archived",
    "failed",
    "rejected",
    "rejected_archived",
    "other",
];

/// Delimited report column headers, in column order.
// "Aborted-Achived" is the header downstream consumers key on.
pub const REPORT_HEADERS: [&str; COLUMN_COUNT] = [
    "LastReqDays",
    "New",
    "AssignmentApproved",
    "Assigned",
    "Acquired",
    "Running-open",
    "Running-closed",
    "Completed",
    "Closed-out",
    "Announced",
    "Normal-archived",
    "Aborted",
    "Aborted-Completed",
    "Aborted-Achived",
    "Failed",
    "Rejected",
    "Rejected-archived",
    "Other",
];
