use std::time::Duration;

use {
    async_trait::async_trait,
    cfbot_config::TelegramConfig,
    cfbot_dialog::{InboundMessage, InboundUpdate, Outbound, UpdateSource},
    secrecy::ExposeSecret,
    teloxide::{
        ApiError, RequestError,
        prelude::*,
        types::{AllowedUpdate, BotCommand, Update, UpdateKind},
    },
    tracing::{debug, info, warn},
};

use crate::{
    Error, Result,
    chunk::{TELEGRAM_MAX_MESSAGE_LEN, split_message},
};

/// Headroom on top of the long-poll timeout so the HTTP client never gives up
/// before Telegram answers.
const CLIENT_TIMEOUT_MARGIN_SECS: u64 = 15;

/// A connected bot account.
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
    poll_timeout_secs: u32,
}

impl TelegramGateway {
    /// Check the token, clear any webhook so long polling works, and register
    /// the command list if configured.
    pub async fn connect(config: &TelegramConfig) -> Result<Self> {
        if !config.has_token() {
            return Err(Error::message("telegram bot token is not configured"));
        }

        let client = teloxide::net::default_reqwest_settings()
            .timeout(Duration::from_secs(
                u64::from(config.poll_timeout_secs) + CLIENT_TIMEOUT_MARGIN_SECS,
            ))
            .build()?;
        let bot = Bot::with_client(config.token.expose_secret(), client);

        let me = bot.get_me().await?;

        bot.delete_webhook().send().await?;

        if config.register_commands
            && let Err(e) = bot.set_my_commands(bot_commands()).await
        {
            warn!(error = %e, "failed to register bot commands");
        }

        info!(username = ?me.username, "telegram bot connected (webhook cleared)");
        Ok(Self {
            bot,
            poll_timeout_secs: config.poll_timeout_secs,
        })
    }
}

fn bot_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("tasks", "Pick tasks by difficulty and category"),
        BotCommand::new("cancel", "Cancel the current selection"),
        BotCommand::new("help", "Show available commands"),
    ]
}

/// Telegram offsets are 32-bit.
fn offset_param(offset: i64) -> i32 {
    i32::try_from(offset).unwrap_or(i32::MAX)
}

fn to_inbound(update: Update) -> InboundUpdate {
    let update_id = i64::from(update.id.0);
    let message = match update.kind {
        UpdateKind::Message(msg) => Some(InboundMessage {
            chat_id: msg.chat.id.0,
            text: msg.text().map(str::to_string),
        }),
        other => {
            debug!(update_id, "ignoring non-message update: {other:?}");
            None
        },
    };
    InboundUpdate { update_id, message }
}

fn fetch_error(error: RequestError) -> cfbot_dialog::Error {
    if matches!(
        &error,
        RequestError::Api(ApiError::TerminatedByOtherGetUpdates)
    ) {
        return cfbot_dialog::Error::terminated(
            "another bot instance is already running with this token",
        );
    }
    cfbot_dialog::Error::external("telegram getUpdates failed", error)
}

#[async_trait]
impl UpdateSource for TelegramGateway {
    async fn fetch_updates(&self, offset: i64) -> cfbot_dialog::Result<Vec<InboundUpdate>> {
        let updates = self
            .bot
            .get_updates()
            .offset(offset_param(offset))
            .timeout(self.poll_timeout_secs)
            .allowed_updates(vec![AllowedUpdate::Message])
            .await
            .map_err(fetch_error)?;
        Ok(updates.into_iter().map(to_inbound).collect())
    }
}

#[async_trait]
impl Outbound for TelegramGateway {
    async fn send_text(&self, chat_id: i64, text: &str) -> cfbot_dialog::Result<()> {
        for chunk in split_message(text, TELEGRAM_MAX_MESSAGE_LEN) {
            self.bot
                .send_message(ChatId(chat_id), chunk)
                .await
                .map_err(|e| cfbot_dialog::Error::external("telegram sendMessage failed", e))?;
        }
        Ok(())
    }
}
