use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::CallbackQueryId;
use teloxide::update_listeners;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};
use url::Url;

use crate::error::PlatformError;
use crate::platform::{ChatTarget, GameCallback, GamePlatform};
use crate::router::CommandRouter;

pub type TelegramRouter = CommandRouter<TelegramPlatform>;

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "Получить игру")]
    Start,
    #[command(description = "Показать подсказку")]
    Help,
}

/// `GamePlatform` backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramPlatform {
    bot: Bot,
}

impl TelegramPlatform {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl GamePlatform for TelegramPlatform {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), PlatformError> {
        self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }

    async fn send_game(&self, chat_id: i64, game_short_name: &str) -> Result<(), PlatformError> {
        self.bot.send_game(ChatId(chat_id), game_short_name).await?;
        Ok(())
    }

    async fn answer_callback_url(&self, query_id: &str, url: &str) -> Result<(), PlatformError> {
        let url = Url::parse(url)?;
        self.bot
            .answer_callback_query(CallbackQueryId(query_id.to_string()))
            .url(url)
            .await?;
        Ok(())
    }

    async fn answer_callback_text(&self, query_id: &str, text: &str) -> Result<(), PlatformError> {
        self.bot
            .answer_callback_query(CallbackQueryId(query_id.to_string()))
            .text(text)
            .await?;
        Ok(())
    }
}

fn chat_target(msg: &Message) -> ChatTarget {
    ChatTarget {
        chat_id: msg.chat.id.0,
        user_id: msg.from.as_ref().map(|user| user.id.0),
    }
}

fn game_callback(q: &CallbackQuery) -> GameCallback {
    GameCallback {
        query_id: q.id.to_string(),
        user_id: q.from.id.0,
        game_short_name: q.game_short_name.clone(),
    }
}

/// Put /start and /help into the client's command menu
async fn register_commands(bot: &Bot) {
    match bot.set_my_commands(Command::bot_commands()).await {
        Ok(_) => info!("Registered bot commands with Telegram"),
        Err(e) => warn!("Failed to register bot commands: {}", e),
    }
}

/// Run the long-polling dispatcher until the process is stopped.
///
/// Fails if Telegram cannot be reached at startup (bad token, no network).
pub async fn run(bot: Bot, router: Arc<TelegramRouter>) -> Result<()> {
    info!("Starting Telegram platform...");

    let me = bot
        .get_me()
        .await
        .context("Failed to reach Telegram, check the bot token and network")?;
    info!("Authorized as @{}", me.username());

    register_commands(&bot).await;
    let listener = update_listeners::polling_default(bot.clone()).await;

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .try_dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await
        .context("Failed to start dispatching, check the bot token and network")?;

    Ok(())
}

async fn handle_command(
    upd: Update,
    msg: Message,
    cmd: Command,
    router: Arc<TelegramRouter>,
) -> ResponseResult<()> {
    let target = chat_target(&msg);

    match cmd {
        Command::Start => router.on_start(&target).await,
        Command::Help => router.handle_help(&upd, &target).await,
    }

    Ok(())
}

async fn handle_callback(
    upd: Update,
    q: CallbackQuery,
    router: Arc<TelegramRouter>,
) -> ResponseResult<()> {
    router.handle_callback(&upd, &game_callback(&q)).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_commands_parse() {
        assert!(matches!(
            Command::parse("/start", "gamebot"),
            Ok(Command::Start)
        ));
        assert!(matches!(
            Command::parse("/help@gamebot", "gamebot"),
            Ok(Command::Help)
        ));
        assert!(Command::parse("/play", "gamebot").is_err());
    }

    #[test]
    fn test_command_menu_lists_both_commands() {
        let names: Vec<String> = Command::bot_commands()
            .into_iter()
            .map(|c| c.command.trim_start_matches('/').to_string())
            .collect();
        assert_eq!(names, vec!["start", "help"]);
    }

    #[test]
    fn test_command_menu_descriptions_are_russian() {
        let descriptions: Vec<String> = Command::bot_commands()
            .into_iter()
            .map(|c| c.description)
            .collect();
        assert_eq!(descriptions, vec!["Получить игру", "Показать подсказку"]);
    }

    #[tokio::test]
    async fn test_run_returns_error_when_telegram_unreachable() {
        // nothing listens on port 1, so get_me fails at startup
        let bot = Bot::new("123:unreachable")
            .set_api_url(Url::parse("http://127.0.0.1:1/").unwrap());
        let router = Arc::new(CommandRouter::new(
            TelegramPlatform::new(bot.clone()),
            Arc::new(Config::default()),
        ));

        assert!(run(bot, router).await.is_err());
    }
}
