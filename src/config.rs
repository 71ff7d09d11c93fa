use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Environment variable checked first when resolving the bot token.
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_BOT_TOKEN";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// The single game this bot launches.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    /// Short name registered for the game with @BotFather
    #[serde(default = "default_short_name")]
    pub short_name: String,
    /// Where players are redirected when they press "Play"
    #[serde(default = "default_game_url")]
    pub url: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            short_name: default_short_name(),
            url: default_game_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MessagesConfig {
    #[serde(default = "default_welcome")]
    pub welcome: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_start_failed")]
    pub start_failed: String,
    #[serde(default = "default_unknown_game")]
    pub unknown_game: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            welcome: default_welcome(),
            help: default_help(),
            start_failed: default_start_failed(),
            unknown_game: default_unknown_game(),
        }
    }
}

fn default_short_name() -> String {
    "engvocab".to_string()
}

fn default_game_url() -> String {
    "https://tgbot-orpin.vercel.app".to_string()
}

fn default_welcome() -> String {
    "Привет! Давай учить английские слова. Нажми «Играть» под сообщением ниже.".to_string()
}

fn default_help() -> String {
    "Отправь /start, чтобы получить игру, и нажми кнопку «Играть».\n\
     /help - показать эту подсказку"
        .to_string()
}

fn default_start_failed() -> String {
    "Не удалось запустить игру. Попробуйте позже.".to_string()
}

fn default_unknown_game() -> String {
    "Неизвестная игра".to_string()
}

impl Config {
    /// Load the config file if it exists, otherwise fall back to built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.game.short_name.trim().is_empty() {
            bail!("game.short_name must not be empty");
        }
        Url::parse(&self.game.url)
            .with_context(|| format!("game.url is not a valid URL: {}", self.game.url))?;
        Ok(())
    }

    /// Token from the environment, then from the config file. Blank values are skipped.
    ///
    /// `env` is the environment lookup, normally `std::env::var(..).ok()`.
    pub fn bot_token<F>(&self, env: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        env(TOKEN_ENV_VAR)
            .as_deref()
            .and_then(non_blank)
            .or_else(|| self.telegram.bot_token.as_deref().and_then(non_blank))
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
