pub mod config;
pub mod extract;
pub mod fetcher;
pub mod pipeline;
pub mod report;
pub mod sift;
pub mod status;
pub mod store;
pub mod testing;
pub mod writer;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, validate_tag,
    Config, ConfigError, OutputConfig, OutputPaths, SourceConfig,
};
pub use extract::{extract_rows, Extraction, RowError};
pub use fetcher::{fetch_page_lenient, FetchError, Fetcher, HttpFetcher};
pub use pipeline::{Pipeline, PipelineError, RunSummary};
pub use report::ReportWriter;
pub use sift::{keep, sift_store, SiftError, SiftSummary};
pub use status::{ExtractedRow, StatusCounters, StatusRow, COLUMN_COUNT};
pub use store::{RowStore, SqliteRowStore, StoreError};
pub use writer::{write_outputs, WriteSummary};
