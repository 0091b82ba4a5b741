use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the status page is fetched from
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Status page URL
    #[serde(default = "default_url")]
    pub url: String,
    /// User-Agent sent with the request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds (unset: wait for the server)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

fn default_url() -> String {
    "https://dmytro.web.cern.ch/dmytro/cmsprodmon/status.php".to_string()
}

fn default_user_agent() -> String {
    format!("wfsift/{}", env!("CARGO_PKG_VERSION"))
}

/// Where and under which name the output files are written
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Output tag; every output file name is derived from it
    #[serde(default = "default_tag")]
    pub tag: String,
    /// Directory the output files are written into
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            dir: default_dir(),
        }
    }
}

fn default_tag() -> String {
    "wfStatus".to_string()
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

impl OutputConfig {
    /// Resolve the four output file paths for the configured tag.
    pub fn paths(&self) -> OutputPaths {
        OutputPaths::new(&self.dir, &self.tag)
    }
}

/// The four files a run produces, all named from the output tag `T`:
/// `T`, `T.fps`, `T.sift` and `T.sift.fps`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub tag: String,
    pub store: PathBuf,
    pub report: PathBuf,
    pub sifted_store: PathBuf,
    pub sifted_report: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: impl Into<PathBuf>, tag: &str) -> Self {
        let dir = dir.into();
        Self {
            tag: tag.to_string(),
            store: dir.join(tag),
            report: dir.join(format!("{tag}.fps")),
            sifted_store: dir.join(format!("{tag}.sift")),
            sifted_report: dir.join(format!("{tag}.sift.fps")),
        }
    }
}
