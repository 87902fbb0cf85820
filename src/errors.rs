use thiserror::Error;

#[derive(Error, Debug)]
pub enum StageError {
    #[error("Asset not found: {0}")]
    AssetNotFound(String),
    #[error("Malformed site configuration: {0}")]
    ConfigError(String),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
