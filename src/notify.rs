//! Forwarding finalized submissions to the operator chat.

use std::sync::Arc;

use async_trait::async_trait;

use crate::channels::Outbound;
use crate::error::ChannelError;
use crate::submission::OrderSubmission;

/// Sink that receives finalized orders.
///
/// Called exactly once per completed form. Delivery is fire-and-forget:
/// a failure is the caller's to log, never retried, and never rolls
/// back the session reset.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn forward(&self, submission: &OrderSubmission) -> Result<(), ChannelError>;
}

/// Forwards rendered submissions to a fixed Telegram chat.
pub struct TelegramNotifier {
    outbound: Arc<dyn Outbound>,
    order_chat_id: i64,
}

impl TelegramNotifier {
    pub fn new(outbound: Arc<dyn Outbound>, order_chat_id: i64) -> Self {
        Self {
            outbound,
            order_chat_id,
        }
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn forward(&self, submission: &OrderSubmission) -> Result<(), ChannelError> {
        tracing::info!(
            category = submission.category.label(),
            submitter = %submission.submitter,
            "forwarding order to operator chat"
        );
        self.outbound
            .send_text(self.order_chat_id, &submission.render())
            .await
    }
}
