//! Channel abstraction — inbound events and outbound sends.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::ChannelError;

/// Stream of inbound events from the chat platform.
pub type EventStream = Pin<Box<dyn Stream<Item = InboundEvent> + Send>>;

/// One inbound event from the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Stable Telegram user id — the session key.
    pub user_id: i64,
    /// Chat to reply into.
    pub chat_id: i64,
    /// Message carrying the pressed button, for in-place edits.
    pub message_id: Option<i64>,
    pub kind: EventKind,
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// `/start` command.
    StartCommand,
    /// Inline-keyboard button press.
    ButtonPressed { token: String },
    /// Free-text message.
    TextMessage { body: String, sender_handle: String },
}

/// One inline-keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Text shown to the user.
    pub label: String,
    /// Callback token delivered back when pressed.
    pub token: String,
}

impl Button {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// Outbound side of the chat platform.
#[async_trait]
pub trait Outbound: Send + Sync {
    /// Send a plain text message.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), ChannelError>;

    /// Send a text message with an inline keyboard, one button per row.
    async fn send_with_buttons(
        &self,
        chat_id: i64,
        text: &str,
        buttons: &[Button],
    ) -> Result<(), ChannelError>;

    /// Replace an existing message's text and keyboard in place.
    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        buttons: &[Button],
    ) -> Result<(), ChannelError>;
}
