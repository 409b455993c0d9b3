use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Multipart request could not be read: {0}")]
    MultipartError(String),

    #[error("Upload exceeds the size limit: {0}")]
    PayloadTooLarge(String),

    #[error("Archive creation failed")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Configuration file is invalid: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Background encode task failed")]
    TaskJoinError(#[from] tokio::task::JoinError),

    #[error("Failed to build response: {0}")]
    ResponseBuildError(String),

    #[error("Underlying I/O error")]
    IoError(#[from] std::io::Error), // std::io::Error をラップ
}
