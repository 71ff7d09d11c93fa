pub mod telegram;

use async_trait::async_trait;

use crate::error::PlatformError;

/// Where a command came from
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTarget {
    /// Platform-specific chat ID
    pub chat_id: i64,
    /// Originating user, if the platform reported one
    pub user_id: Option<u64>,
}

/// A callback query asking to launch a game
#[derive(Debug, Clone, PartialEq)]
pub struct GameCallback {
    /// Identifier that must be used to answer the query
    pub query_id: String,
    pub user_id: u64,
    /// Game requested by the button, `None` for non-game callbacks
    pub game_short_name: Option<String>,
}

/// Outbound calls the router makes against the messaging platform.
#[async_trait]
pub trait GamePlatform: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), PlatformError>;

    async fn send_game(&self, chat_id: i64, game_short_name: &str) -> Result<(), PlatformError>;

    /// Answer a callback by redirecting the user to `url`.
    ///
    /// A callback query can be answered only once, so this must be the first
    /// and only answer for `query_id`.
    async fn answer_callback_url(&self, query_id: &str, url: &str) -> Result<(), PlatformError>;

    async fn answer_callback_text(&self, query_id: &str, text: &str) -> Result<(), PlatformError>;
}
