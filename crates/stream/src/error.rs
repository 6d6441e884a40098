use seascape_common::ConfigError;

/// Failures while building a pipeline from a config file.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
