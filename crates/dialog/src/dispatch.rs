//! Verification gate in front of the dialog.

use std::sync::Arc;

use {
    cfbot_catalog::UserDirectory,
    tracing::{debug, info},
};

use crate::{
    Result,
    engine::DialogEngine,
    gateway::{InboundMessage, Outbound},
    replies,
};

/// Routes messages from verified users to the [`DialogEngine`] and answers
/// everyone else with a fresh verification code.
pub struct Dispatcher {
    users: Arc<dyn UserDirectory>,
    outbound: Arc<dyn Outbound>,
    engine: DialogEngine,
}

impl Dispatcher {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        outbound: Arc<dyn Outbound>,
        engine: DialogEngine,
    ) -> Self {
        Self {
            users,
            outbound,
            engine,
        }
    }

    pub async fn dispatch(&self, message: &InboundMessage) -> Result<()> {
        let chat_id = message.chat_id;
        let user = self.users.get_or_create(chat_id).await?;

        if !user.is_verified {
            self.outbound.send_text(chat_id, replies::GREETING).await?;
            let code = self.users.regenerate_verification_code(chat_id).await?;
            info!(chat_id, "issued verification code");
            return self
                .outbound
                .send_text(chat_id, &replies::verification_code(&code))
                .await;
        }

        match message.text.as_deref() {
            Some(text) => self.engine.handle_text(chat_id, text).await,
            None => {
                debug!(chat_id, "ignoring non-text message");
                Ok(())
            },
        }
    }
}
