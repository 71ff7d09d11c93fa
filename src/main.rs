mod config;
mod error;
mod platform;
mod router;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use dialoguer::Password;
use teloxide::Bot;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, TOKEN_ENV_VAR};
use crate::platform::telegram::{self, TelegramPlatform};
use crate::router::CommandRouter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gamelauncher=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("  Game: {}", config.game.short_name);
    info!("  URL: {}", config.game.url);

    let token = match config.bot_token(|key| std::env::var(key).ok()) {
        Some(token) => token,
        None => prompt_token()?,
    };

    let bot = Bot::new(token);
    let router = Arc::new(CommandRouter::new(
        TelegramPlatform::new(bot.clone()),
        Arc::new(config),
    ));

    info!("Bot is starting...");
    telegram::run(bot, router).await?;

    Ok(())
}

/// Ask for the token on the terminal until a non-blank one is entered
fn prompt_token() -> Result<String> {
    warn!("{} is not set and config has no bot_token", TOKEN_ENV_VAR);

    loop {
        let token: String = Password::new()
            .with_prompt("Enter your Telegram bot token")
            .interact()
            .context("Failed to read bot token")?;
        let token = token.trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }
}
