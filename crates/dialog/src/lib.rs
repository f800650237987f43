//! Conversation engine and update loop.
//!
//! Each chat walks through difficulty → category → task list. The per-chat
//! position lives in an injected [`SessionStore`]; the [`poller`] pulls
//! updates from a [`gateway::UpdateSource`], gates unverified users through
//! [`Dispatcher`] and feeds the rest into [`DialogEngine`].

pub mod command;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod poller;
pub mod replies;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use {
    command::Command,
    dispatch::Dispatcher,
    engine::DialogEngine,
    error::{Error, Result},
    gateway::{InboundMessage, InboundUpdate, Outbound, UpdateSource},
    poller::{PollOptions, run_polling},
    session::{InMemorySessionStore, SessionStore},
    state::DialogState,
};
