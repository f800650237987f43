use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("user not found: {chat_id}")]
    UserNotFound { chat_id: i64 },

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn user_not_found(chat_id: i64) -> Self {
        Self::UserNotFound { chat_id }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
