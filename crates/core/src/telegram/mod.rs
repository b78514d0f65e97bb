//! Telegram Bot API transport.
//!
//! The rest of the crate talks to the transport through the [`Transport`]
//! trait: send a text reply, send a video reply, download an incoming file.
//! [`TelegramClient`] implements it against the Bot API over HTTPS and adds
//! the inbound side (`getUpdates` long polling) used by the server crate.

mod client;
mod error;
mod traits;
mod types;

pub use client::TelegramClient;
pub use error::TransportError;
pub use traits::Transport;
pub use types::{parse_command, BotIdentity, Chat, Command, Message, Update};
