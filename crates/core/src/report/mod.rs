//! Pipe-delimited text report (`.fps` files).
//!
//! Layout:
//!
//! ```text
//! Campaign|LastReqDays|New|...|Other||<tag>
//! <campaign>|<days>|<new>|...|<other>
//! Total # Sifted = <n>        (sifted reports only)
//! ```

mod number;

pub use number::format_general;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::status::{StatusRow, REPORT_HEADERS};

/// Writes a delimited report line by line.
pub struct ReportWriter<W: Write> {
    out: W,
    lines: usize,
}

impl ReportWriter<BufWriter<File>> {
    /// Create (or truncate) a report file and write its header line.
    pub fn create(path: &Path, tag: &str) -> io::Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), tag)
    }
}

impl<W: Write> ReportWriter<W> {
    /// Wrap a writer and emit the header line for `tag`.
    pub fn new(out: W, tag: &str) -> io::Result<Self> {
        let mut writer = Self { out, lines: 0 };
        writer.write_line(&header_line(tag))?;
        Ok(writer)
    }

    /// Append one row.
    pub fn write_row(&mut self, row: &StatusRow) -> io::Result<()> {
        self.write_line(&row_line(row))
    }

    /// Append the `Total # Sifted = <n>` trailer.
    pub fn write_total(&mut self, total: usize) -> io::Result<()> {
        self.write_line(&format!("Total # Sifted = {}", total))
    }

    /// Number of lines written so far, header included.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)?;
        self.lines += 1;
        Ok(())
    }
}

/// Header naming every column, followed by `||<tag>`.
pub fn header_line(tag: &str) -> String {
    format!("Campaign|{}||{}", REPORT_HEADERS.join("|"), tag)
}

/// One row rendered as pipe-separated fields.
pub fn row_line(row: &StatusRow) -> String {
    let mut line = String::with_capacity(row.campaign.len() + 64);
    line.push_str(&row.campaign);
    line.push('|');
    line.push_str(&format_general(row.last_request_days));
    for counter in row.counters.to_array() {
        line.push('|');
        line.push_str(&counter.to_string());
    }
    line
}
