use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read page file {path}: {source}")]
    PageFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse page file: {0}")]
    PageFileParse(#[source] serde_yaml::Error),

    #[error("page validation failed: {0}")]
    Validation(String),
}
