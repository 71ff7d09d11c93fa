use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::PlatformError;
use crate::platform::{ChatTarget, GameCallback, GamePlatform};

/// Routes commands and game callbacks to outbound platform calls.
///
/// Holds no per-user state: every update is handled on its own.
pub struct CommandRouter<P> {
    platform: P,
    config: Arc<Config>,
}

impl<P: GamePlatform> CommandRouter<P> {
    pub fn new(platform: P, config: Arc<Config>) -> Self {
        Self { platform, config }
    }

    /// Greet the user and send the game card.
    ///
    /// Failures are absorbed here: the user gets a fallback message instead,
    /// and nothing is propagated to the dispatcher.
    pub async fn on_start(&self, target: &ChatTarget) {
        info!(chat_id = target.chat_id, user_id = ?target.user_id, "/start");

        if let Err(e) = self.send_welcome_and_game(target.chat_id).await {
            error!(chat_id = target.chat_id, "Failed to send game: {}", e);
            if let Err(e) = self
                .platform
                .send_message(target.chat_id, &self.config.messages.start_failed)
                .await
            {
                error!(chat_id = target.chat_id, "Failed to send fallback message: {}", e);
            }
        }
    }

    async fn send_welcome_and_game(&self, chat_id: i64) -> Result<(), PlatformError> {
        self.platform
            .send_message(chat_id, &self.config.messages.welcome)
            .await?;
        self.platform
            .send_game(chat_id, &self.config.game.short_name)
            .await
    }

    pub async fn on_help(&self, target: &ChatTarget) -> Result<(), PlatformError> {
        info!(chat_id = target.chat_id, user_id = ?target.user_id, "/help");
        self.platform
            .send_message(target.chat_id, &self.config.messages.help)
            .await
    }

    /// Answer a game callback with the game URL, or with a notice for any other game.
    pub async fn on_callback(&self, callback: &GameCallback) -> Result<(), PlatformError> {
        let game = &self.config.game;

        match callback.game_short_name.as_deref() {
            Some(name) if name == game.short_name => {
                info!(user_id = callback.user_id, game = name, "Launching game");
                self.platform
                    .answer_callback_url(&callback.query_id, &game.url)
                    .await
            }
            other => {
                warn!(user_id = callback.user_id, game = ?other, "Unknown game requested");
                self.platform
                    .answer_callback_text(&callback.query_id, &self.config.messages.unknown_game)
                    .await
            }
        }
    }

    /// Log a handler failure together with the update that caused it.
    pub fn on_error(&self, update: &dyn fmt::Debug, err: &PlatformError) {
        error!(update = ?update, "Update caused error: {}", err);
    }

    /// Dispatcher entry for /help: failures go to `on_error` and stop there.
    pub async fn handle_help(&self, update: &(dyn fmt::Debug + Sync), target: &ChatTarget) {
        if let Err(e) = self.on_help(target).await {
            self.on_error(update, &e);
        }
    }

    /// Dispatcher entry for callback queries: failures go to `on_error` and stop there.
    pub async fn handle_callback(&self, update: &(dyn fmt::Debug + Sync), callback: &GameCallback) {
        if let Err(e) = self.on_callback(callback).await {
            self.on_error(update, &e);
        }
    }
}
