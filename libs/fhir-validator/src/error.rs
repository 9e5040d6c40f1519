use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
