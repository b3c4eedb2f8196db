use thiserror::Error;

use crate::api::ApiError;

/// Errors surfaced to the presentation layer. Each message is meant to be
/// shown as-is.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Cannot reach the member directory: {0}")]
    Transport(String),

    #[error("The member directory refused the access key: {0}")]
    Auth(String),

    #[error("No member with id {id}")]
    NotFound { id: String },

    #[error("Invalid import file: {0}")]
    InvalidFormat(String),

    #[error("The member directory did not answer in time")]
    Timeout,

    #[error("The member directory is not configured - set a remote URL and access key")]
    Unconfigured,

    #[error("The member directory refused the change: {0}")]
    Rejected(String),
}

impl SyncError {
    pub fn not_found(id: &str) -> Self {
        SyncError::NotFound { id: id.to_string() }
    }
}

impl From<ApiError> for SyncError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NetworkError(msg) => SyncError::Transport(msg),
            ApiError::Timeout => SyncError::Timeout,
            ApiError::RateLimited => SyncError::Transport(err.to_string()),
            ApiError::ServerError(_) => SyncError::Transport(err.to_string()),
            ApiError::Unauthorized => SyncError::Auth("access key rejected".to_string()),
            ApiError::AccessDenied(body) => SyncError::Auth(body),
            ApiError::NotFound(body) => SyncError::Rejected(format!("members table not found: {}", body)),
            ApiError::Rejected(msg) | ApiError::InvalidResponse(msg) | ApiError::InvalidConfig(msg) => {
                SyncError::Rejected(msg)
            }
        }
    }
}
