//! The two messaging operations the dialog needs: pull updates, send text.

use async_trait::async_trait;

use crate::Result;

/// One update returned by the messaging service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundUpdate {
    pub update_id: i64,
    /// `None` for update kinds the bot does not handle (edits, callbacks, ...).
    pub message: Option<InboundMessage>,
}

/// A message written to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: i64,
    /// `None` for stickers, photos and other non-text messages.
    pub text: Option<String>,
}

impl InboundMessage {
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: Some(text.into()),
        }
    }
}

/// Long-poll source of updates.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Return updates with `update_id >= offset`, blocking up to the source's
    /// long-poll timeout. Returning an update acknowledges everything below
    /// `offset`.
    async fn fetch_updates(&self, offset: i64) -> Result<Vec<InboundUpdate>>;
}

/// Send messages to a chat.
#[async_trait]
pub trait Outbound: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;
}
