//! Event dispatch — one worker task per user.
//!
//! Each user's events are handled strictly in order by a dedicated
//! worker; workers for different users run concurrently. Send failures
//! never touch session state — the store has already advanced by the
//! time a reply goes out.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::channels::{EventStream, InboundEvent, Outbound};
use crate::error::ChannelError;
use crate::notify::NotificationSink;
use crate::router::{self, Reply};
use crate::session::{SessionState, SessionStore};

/// Routes inbound events to per-user workers.
pub struct Dispatcher {
    engine: Arc<Engine>,
    workers: Mutex<HashMap<i64, mpsc::UnboundedSender<InboundEvent>>>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn SessionStore>,
        outbound: Arc<dyn Outbound>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            engine: Arc::new(Engine {
                store,
                outbound,
                sink,
            }),
            workers: Mutex::new(HashMap::new()),
        }
    }

    /// Drain the inbound stream, dispatching every event.
    pub async fn run(&self, mut events: EventStream) {
        use futures::StreamExt;

        while let Some(event) = events.next().await {
            self.dispatch(event).await;
        }
    }

    /// Hand one event to its user's worker, spawning the worker on
    /// first contact. Returns as soon as the event is enqueued.
    pub async fn dispatch(&self, event: InboundEvent) {
        let mut workers = self.workers.lock().await;
        let sender = workers.entry(event.user_id).or_insert_with(|| {
            let (tx, rx) = mpsc::unbounded_channel();
            let engine = Arc::clone(&self.engine);
            let user_id = event.user_id;
            tokio::spawn(worker_loop(user_id, rx, engine));
            tx
        });
        if sender.send(event).is_err() {
            tracing::error!("session worker gone; event dropped");
        }
    }

    /// Handle one event to completion: read state, route, store, send.
    ///
    /// `run`/`dispatch` call this from per-user workers; tests may call
    /// it directly as long as they keep one user's events sequential.
    pub async fn process(&self, event: InboundEvent) {
        self.engine.handle(event).await;
    }
}

async fn worker_loop(
    user_id: i64,
    mut rx: mpsc::UnboundedReceiver<InboundEvent>,
    engine: Arc<Engine>,
) {
    tracing::debug!(user_id, "session worker started");
    while let Some(event) = rx.recv().await {
        engine.handle(event).await;
    }
}

struct Engine {
    store: Arc<dyn SessionStore>,
    outbound: Arc<dyn Outbound>,
    sink: Arc<dyn NotificationSink>,
}

impl Engine {
    async fn handle(&self, event: InboundEvent) {
        let user_id = event.user_id;
        let state = self.store.get(user_id).await;
        let outcome = router::route(state, &event.kind);

        tracing::debug!(user_id, state = outcome.next.label(), "session advanced");
        match &outcome.next {
            SessionState::Idle => self.store.clear(user_id).await,
            next => self.store.set(user_id, next.clone()).await,
        }

        if let Some(submission) = &outcome.submission {
            if let Err(e) = self.sink.forward(submission).await {
                tracing::error!(
                    user_id,
                    category = submission.category.label(),
                    error = %e,
                    "failed to forward submission to operator chat"
                );
            }
        }

        if let Some(reply) = outcome.reply {
            if let Err(e) = self.send_reply(&event, reply).await {
                tracing::warn!(user_id, error = %e, "failed to send reply");
            }
        }
    }

    async fn send_reply(&self, event: &InboundEvent, reply: Reply) -> Result<(), ChannelError> {
        match reply {
            Reply::Send { text, buttons } if buttons.is_empty() => {
                self.outbound.send_text(event.chat_id, &text).await
            }
            Reply::Send { text, buttons } => {
                self.outbound
                    .send_with_buttons(event.chat_id, &text, &buttons)
                    .await
            }
            Reply::Edit { text, buttons } => match event.message_id {
                Some(message_id) => {
                    self.outbound
                        .edit_message(event.chat_id, message_id, &text, &buttons)
                        .await
                }
                // No originating message to rewrite.
                None => {
                    self.outbound
                        .send_with_buttons(event.chat_id, &text, &buttons)
                        .await
                }
            },
        }
    }
}
