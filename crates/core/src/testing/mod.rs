//! Testing utilities and mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use wfsift_core::testing::{fixtures, MockFetcher};
//!
//! let fetcher = MockFetcher::with_body(fixtures::status_page(&[
//!     fixtures::add_row("Run3Summer23", 1.5, &[0; 17]),
//! ]));
//! let pipeline = Pipeline::new(fetcher, output);
//! ```

mod mock_fetcher;

pub use mock_fetcher::MockFetcher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::status::{StatusCounters, StatusRow, COLUMN_COUNT};

    /// Render one `data.addRow([...]);` statement the way the status page does:
    /// a formatted days cell, a campaign link and 17 plain counters.
    pub fn add_row(campaign: &str, days: f64, counters: &[i64; COLUMN_COUNT - 1]) -> String {
        let counters: Vec<String> = counters.iter().map(|c| c.to_string()).collect();
        format!(
            "data.addRow([{{v:{days}, f:'<b>{days} d</b>'}},'<a href=\"campaign.php?campaign={campaign}\">{campaign}</a>',{}]);",
            counters.join(",")
        )
    }

    /// Wrap rows in a minimal chart page.
    pub fn status_page(rows: &[String]) -> String {
        let mut html = String::from(
            "<html><head><script type=\"text/javascript\">\n\
             google.charts.setOnLoadCallback(drawTable);\n\
             function drawTable() {\n\
             var data = new google.visualization.DataTable();\n",
        );
        for row in rows {
            html.push_str(row);
            html.push('\n');
        }
        html.push_str("}\n</script></head><body><div id=\"table_div\"></div></body></html>\n");
        html
    }

    /// A status row with every counter zero.
    pub fn idle_row(campaign: &str) -> StatusRow {
        StatusRow {
            campaign: campaign.to_string(),
            last_request_days: 30.0,
            counters: StatusCounters::default(),
        }
    }

    /// A status row with work in flight.
    pub fn busy_row(campaign: &str) -> StatusRow {
        StatusRow {
            campaign: campaign.to_string(),
            last_request_days: 0.5,
            counters: StatusCounters {
                running_open: 4,
                completed: 10,
                announced: 2,
                ..StatusCounters::default()
            },
        }
    }
}
