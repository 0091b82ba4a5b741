use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Source URL is http(s)
/// - Output tag names a file
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let url = config.source.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "source.url must be an http(s) URL, got {:?}",
            config.source.url
        )));
    }

    if config.source.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "source.timeout_secs cannot be 0".to_string(),
        ));
    }

    validate_tag(&config.output.tag)
}

/// An output tag is a file name prefix relative to `output.dir`. It may carry
/// directories (`reports/today`) but its last component must name a file.
pub fn validate_tag(tag: &str) -> Result<(), ConfigError> {
    if tag.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "output.tag cannot be empty".to_string(),
        ));
    }
    let file_name = tag.rsplit(['/', '\\']).next().unwrap_or(tag);
    if file_name.is_empty() || file_name == "." || file_name == ".." {
        return Err(ConfigError::ValidationError(format!(
            "output.tag must end in a file name, got {:?}",
            tag
        )));
    }
    Ok(())
}
