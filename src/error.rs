use thiserror::Error;

/// Failure of an outbound call to the messaging platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),

    #[error("Invalid game URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
