//! Telegram Bot API transport for the dialog.
//!
//! [`TelegramGateway`] long-polls `getUpdates` and sends plain-text replies
//! through teloxide, implementing the `cfbot-dialog` gateway traits.

pub mod bot;
pub mod chunk;
pub mod error;

pub use {
    bot::TelegramGateway,
    error::{Error, Result},
};
