/// Moderator API errors
///
/// The dashboard shows one generic message for all of these; the variant only
/// ends up in the log.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("{action} was not applied: {message}")]
    Rejected { action: &'static str, message: String },
}
