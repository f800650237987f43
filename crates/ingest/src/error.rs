use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Catalog(#[from] cfbot_catalog::Error),

    #[error("invalid cron expression '{expr}': {source}")]
    InvalidSchedule {
        expr: String,
        #[source]
        source: cron::error::Error,
    },

    #[error("parse error: {message}")]
    Parse { message: String },

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
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
