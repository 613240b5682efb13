//! Configuration loaded from the environment.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Bot configuration.
///
/// `BOT_TOKEN` and `ORDER_CHAT_ID` are required; everything else has
/// a default.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram Bot API token.
    pub bot_token: SecretString,
    /// Chat that receives finalized order submissions.
    pub order_chat_id: i64,
    /// Long-poll timeout passed to getUpdates, in seconds.
    pub poll_timeout_secs: u64,
}

impl BotConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = std::env::var("BOT_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("BOT_TOKEN".into()))?;

        let order_chat_raw = std::env::var("ORDER_CHAT_ID")
            .map_err(|_| ConfigError::MissingEnvVar("ORDER_CHAT_ID".into()))?;
        let order_chat_id: i64 =
            order_chat_raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "ORDER_CHAT_ID".into(),
                    message: format!("expected a numeric chat id, got {order_chat_raw:?}"),
                })?;

        let poll_timeout_secs: u64 = std::env::var("POLL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            bot_token: SecretString::from(bot_token),
            order_chat_id,
            poll_timeout_secs,
        })
    }
}
