use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read usage file {path}: {source}")]
    UsageFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Pricing(#[from] PricingError),
}

#[derive(Debug, Error)]
pub(crate) enum PricingError {
    #[error("No pricing for model \"{model}\" (provider: {provider})")]
    UnknownModel { model: String, provider: String },

    #[error("Failed to fetch pricing: {0}")]
    Fetch(Box<ureq::Error>),

    #[error("Malformed pricing response: {0}")]
    Malformed(serde_json::Error),

    #[error("Pricing response contained no Claude models")]
    NoModels,

    #[error("Cache I/O error at {path}: {source}")]
    CacheIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode pricing cache: {0}")]
    CacheEncode(serde_json::Error),
}

impl From<ureq::Error> for PricingError {
    fn from(e: ureq::Error) -> Self {
        PricingError::Fetch(Box::new(e))
    }
}
