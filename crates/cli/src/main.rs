use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wfsift_core::{
    load_config, load_config_from_env, validate_config, Config, Fetcher, HttpFetcher, Pipeline,
    RunSummary,
};

/// Config file picked up from the working directory when present
const DEFAULT_CONFIG_FILE: &str = "wfsift.toml";

/// Fetch the workflow status page, store per-campaign counters and sift out
/// idle campaigns.
#[derive(Debug, Parser)]
#[command(name = "wfsift", version)]
struct Cli {
    /// Output tag: writes TAG, TAG.fps, TAG.sift and TAG.sift.fps
    tag: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let outcome = run(cli).await;
    if let Err(e) = &outcome {
        error!("Fatal error: {:#}", e);
    }
    std::process::exit(exit_code(&outcome));
}

/// Fatal errors exit with 1. Degraded runs, including a skipped sift stage,
/// exit with 0.
fn exit_code(outcome: &Result<RunSummary>) -> i32 {
    match outcome {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

async fn run(cli: Cli) -> Result<RunSummary> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = load_configuration()?;
    if let Some(tag) = cli.tag {
        config.output.tag = tag;
    }

    execute(&config).await
}

/// Validate the configuration, build the HTTP client and run one pass.
async fn execute(config: &Config) -> Result<RunSummary> {
    validate_config(config).context("Configuration validation failed")?;

    let fetcher = HttpFetcher::new(&config.source).context("Cannot initialize HTTP client")?;
    run_pipeline(config, fetcher).await
}

async fn run_pipeline<F: Fetcher>(config: &Config, fetcher: F) -> Result<RunSummary> {
    info!("Source URL: {}", config.source.url);
    info!("Output tag: {} (in {:?})", config.output.tag, config.output.dir);

    let summary = Pipeline::new(fetcher, config.output.paths())
        .run(&config.source.url)
        .await
        .context("Run aborted")?;

    if summary.rejected > 0 {
        warn!("{} rows were incomplete and skipped", summary.rejected);
    }
    match summary.sifted {
        Some(n) => info!("Done: {} rows written, {} idle campaigns", summary.written, n),
        None => info!("Done: {} rows written, sift stage skipped", summary.written),
    }

    Ok(summary)
}

/// Load configuration from `WFSIFT_CONFIG`, then `wfsift.toml`, then defaults.
fn load_configuration() -> Result<Config> {
    let env_path = std::env::var("WFSIFT_CONFIG").ok();
    match config_path(env_path, Path::new(DEFAULT_CONFIG_FILE)) {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        None => load_config_from_env().context("Failed to load configuration"),
    }
}

/// An explicit path always wins; the default file is used only if it exists.
fn config_path(explicit: Option<String>, default: &Path) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(PathBuf::from(path)),
        None if default.exists() => Some(default.to_path_buf()),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wfsift_core::testing::{fixtures, MockFetcher};
    use wfsift_core::{FetchError, OutputConfig, SourceConfig};

    fn config_in(dir: &Path) -> Config {
        Config {
            source: SourceConfig {
                url: "http://status.test/status.php".to_string(),
                ..SourceConfig::default()
            },
            output: OutputConfig {
                tag: "wfStatus".to_string(),
                dir: dir.to_path_buf(),
            },
        }
    }

    fn idle_page() -> String {
        fixtures::status_page(&[fixtures::add_row("Run3Winter24GS", 41.5, &[0; 17])])
    }

    #[test]
    fn test_cli_tag_is_optional() {
        let cli = Cli::try_parse_from(["wfsift"]).unwrap();
        assert!(cli.tag.is_none());

        let cli = Cli::try_parse_from(["wfsift", "today"]).unwrap();
        assert_eq!(cli.tag.as_deref(), Some("today"));
    }

    #[test]
    fn test_cli_rejects_extra_arguments() {
        assert!(Cli::try_parse_from(["wfsift", "a", "b"]).is_err());
        assert!(Cli::try_parse_from(["wfsift", "--all"]).is_err());
    }

    #[test]
    fn test_config_path_explicit_wins() {
        let dir = TempDir::new().unwrap();
        let default = dir.path().join("wfsift.toml");
        std::fs::write(&default, "").unwrap();

        assert_eq!(
            config_path(Some("/etc/wfsift.toml".to_string()), &default),
            Some(PathBuf::from("/etc/wfsift.toml"))
        );
    }

    #[test]
    fn test_config_path_default_only_if_present() {
        let dir = TempDir::new().unwrap();
        let default = dir.path().join("wfsift.toml");
        assert_eq!(config_path(None, &default), None);

        std::fs::write(&default, "").unwrap();
        assert_eq!(config_path(None, &default), Some(default.clone()));
    }

    #[test]
    fn test_exit_code_success() {
        let summary = RunSummary {
            fetched_bytes: 10,
            extracted: 1,
            rejected: 0,
            written: 1,
            sifted: Some(1),
        };
        assert_eq!(exit_code(&Ok(summary)), 0);
    }

    #[test]
    fn test_exit_code_client_init_failure() {
        let outcome: Result<RunSummary> =
            Err(anyhow::Error::new(FetchError::ClientInit("no TLS backend".to_string()))
                .context("Cannot initialize HTTP client"));
        assert_eq!(exit_code(&outcome), 1);
    }

    #[tokio::test]
    async fn test_invalid_config_exits_with_failure() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(dir.path());
        config.source.url = "ftp://status.test/status.php".to_string();

        let outcome = execute(&config).await;
        assert!(outcome.is_err());
        assert_eq!(exit_code(&outcome), 1);
        assert!(!dir.path().join("wfStatus").exists());
    }

    #[tokio::test]
    async fn test_store_creation_failure_exits_with_failure() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir.path().join("missing"));

        let outcome = run_pipeline(&config, MockFetcher::with_body(idle_page())).await;
        assert_eq!(exit_code(&outcome), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_exits_with_success() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let fetcher = MockFetcher::new();
        fetcher
            .set_next_error(FetchError::ConnectionFailed("connection refused".to_string()))
            .await;

        let outcome = run_pipeline(&config, fetcher).await;
        assert_eq!(exit_code(&outcome), 0);
        assert_eq!(outcome.unwrap().written, 0);
    }

    #[tokio::test]
    async fn test_failed_sift_stage_exits_with_success() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        // A directory in place of T.sift cannot be replaced by the sift stage
        std::fs::create_dir(dir.path().join("wfStatus.sift")).unwrap();

        let outcome = run_pipeline(&config, MockFetcher::with_body(idle_page())).await;
        assert_eq!(exit_code(&outcome), 0);

        let summary = outcome.unwrap();
        assert_eq!(summary.written, 1);
        assert_eq!(summary.sifted, None);
    }

    #[tokio::test]
    async fn test_tag_with_directory_writes_inside_it() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("reports")).unwrap();
        let mut config = config_in(dir.path());
        config.output.tag = "reports/today".to_string();
        validate_config(&config).unwrap();

        let outcome = run_pipeline(&config, MockFetcher::with_body(idle_page())).await;
        assert_eq!(exit_code(&outcome), 0);
        for name in ["today", "today.fps", "today.sift", "today.sift.fps"] {
            assert!(dir.path().join("reports").join(name).exists(), "{name}");
        }
    }
}
