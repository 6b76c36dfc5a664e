use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Stream connect error: {0}")]
    StreamConnect(String),

    #[error("Stream read error: {0}")]
    StreamRead(String),

    #[error("Stream closed: {0}")]
    StreamClosed(String),

    #[error("Detector error: {0}")]
    DetectorError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
