use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read vendors file {path}: {source}")]
    VendorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse vendors file: {0}")]
    VendorsFileParse(#[from] serde_yaml::Error),

    #[error("vendor catalog validation failed: {0}")]
    Validation(String),
}
