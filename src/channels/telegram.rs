//! Telegram channel — long-polls the Bot API for updates.
//!
//! Raw Bot API over reqwest. Updates (messages and callback queries)
//! are translated into [`InboundEvent`]s; replies go out as
//! `sendMessage` / `editMessageText` with inline keyboards.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::channels::{Button, EventKind, EventStream, InboundEvent, Outbound};
use crate::error::ChannelError;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Telegram channel — connects to the Bot API via long-polling.
pub struct TelegramChannel {
    bot_token: SecretString,
    base_url: String,
    poll_timeout_secs: u64,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: SecretString, poll_timeout_secs: u64) -> Self {
        Self::with_base_url(bot_token, poll_timeout_secs, TELEGRAM_API_BASE.into())
    }

    /// Point the channel at a different API host (tests).
    pub fn with_base_url(
        bot_token: SecretString,
        poll_timeout_secs: u64,
        base_url: String,
    ) -> Self {
        Self {
            bot_token,
            base_url,
            poll_timeout_secs,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.base_url,
            self.bot_token.expose_secret()
        )
    }

    /// Verify the token against `getMe`.
    pub async fn health_check(&self) -> Result<(), ChannelError> {
        let resp = self
            .client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map_err(|e| ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: format!("getMe returned {}", resp.status()),
            })
        }
    }

    /// Start the long-poll loop. Events arrive on the returned stream
    /// in Bot API delivery order.
    pub async fn start(&self) -> Result<EventStream, ChannelError> {
        self.health_check().await?;

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let url = self.api_url("getUpdates");
        let timeout = self.poll_timeout_secs;
        let client = self.client.clone();

        tokio::spawn(async move {
            let mut offset: i64 = 0;

            tracing::info!("Telegram channel listening for updates...");

            loop {
                let body = serde_json::json!({
                    "offset": offset,
                    "timeout": timeout,
                    "allowed_updates": ["message", "callback_query"],
                });

                let resp = match client.post(&url).json(&body).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!("Telegram poll error: {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                let data: serde_json::Value = match resp.json().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!("Telegram parse error: {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                if let Some(results) = data.get("result").and_then(serde_json::Value::as_array) {
                    for update in results {
                        if let Some(uid) =
                            update.get("update_id").and_then(serde_json::Value::as_i64)
                        {
                            offset = uid + 1;
                        }

                        let Some(event) = parse_update(update) else {
                            continue;
                        };

                        if tx.send(event).is_err() {
                            tracing::info!("Telegram listener channel closed");
                            return;
                        }
                    }
                }
            }
        });

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn call(&self, method: &str, body: &serde_json::Value) -> Result<(), ChannelError> {
        let resp = self
            .client
            .post(self.api_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err = resp.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed {
                name: "telegram".into(),
                reason: format!("{method} failed ({status}): {err}"),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Outbound for TelegramChannel {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), ChannelError> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });
        self.call("sendMessage", &body).await
    }

    async fn send_with_buttons(
        &self,
        chat_id: i64,
        text: &str,
        buttons: &[Button],
    ) -> Result<(), ChannelError> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "reply_markup": inline_keyboard(buttons),
        });
        self.call("sendMessage", &body).await
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        buttons: &[Button],
    ) -> Result<(), ChannelError> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
            "reply_markup": inline_keyboard(buttons),
        });
        self.call("editMessageText", &body).await
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Inline keyboard JSON, one button per row.
fn inline_keyboard(buttons: &[Button]) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = buttons
        .iter()
        .map(|b| {
            serde_json::json!([{
                "text": b.label,
                "callback_data": b.token,
            }])
        })
        .collect();
    serde_json::json!({ "inline_keyboard": rows })
}

/// Translate one raw update into an event, if it is one we handle.
///
/// Messages without text (photos, stickers, joins) and callback
/// queries without an originating message are skipped.
fn parse_update(update: &serde_json::Value) -> Option<InboundEvent> {
    if let Some(message) = update.get("message") {
        let text = message.get("text").and_then(serde_json::Value::as_str)?;
        let user_id = message
            .get("from")
            .and_then(|f| f.get("id"))
            .and_then(serde_json::Value::as_i64)?;
        let chat_id = message
            .get("chat")
            .and_then(|c| c.get("id"))
            .and_then(serde_json::Value::as_i64)?;
        let sender_handle = message
            .get("from")
            .and_then(|f| f.get("username"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        let kind = if is_start_command(text) {
            EventKind::StartCommand
        } else {
            EventKind::TextMessage {
                body: text.to_string(),
                sender_handle,
            }
        };

        return Some(InboundEvent {
            user_id,
            chat_id,
            message_id: None,
            kind,
        });
    }

    if let Some(callback) = update.get("callback_query") {
        let token = callback
            .get("data")
            .and_then(serde_json::Value::as_str)?
            .to_string();
        let user_id = callback
            .get("from")
            .and_then(|f| f.get("id"))
            .and_then(serde_json::Value::as_i64)?;
        let message = callback.get("message")?;
        let chat_id = message
            .get("chat")
            .and_then(|c| c.get("id"))
            .and_then(serde_json::Value::as_i64)?;
        let message_id = message
            .get("message_id")
            .and_then(serde_json::Value::as_i64);

        return Some(InboundEvent {
            user_id,
            chat_id,
            message_id,
            kind: EventKind::ButtonPressed { token },
        });
    }

    None
}

/// `/start`, with or without a bot mention or deep-link payload.
fn is_start_command(text: &str) -> bool {
    let text = text.trim();
    text == "/start" || text.starts_with("/start ") || text.starts_with("/start@")
}

// ── Tests ───────────────────────────────────────────────────────────
