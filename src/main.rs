use std::sync::Arc;

use commission_bot::channels::{Outbound, TelegramChannel};
use commission_bot::config::BotConfig;
use commission_bot::dispatch::Dispatcher;
use commission_bot::notify::{NotificationSink, TelegramNotifier};
use commission_bot::session::{InMemorySessionStore, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Take environment variables from .env when present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export BOT_TOKEN=123456:ABC-...");
        eprintln!("  export ORDER_CHAT_ID=-1001234567890");
        std::process::exit(1);
    });

    eprintln!("🤖 Commission Bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Order chat: {}", config.order_chat_id);
    eprintln!("   Poll timeout: {}s\n", config.poll_timeout_secs);

    let channel = Arc::new(TelegramChannel::new(
        config.bot_token.clone(),
        config.poll_timeout_secs,
    ));
    let outbound: Arc<dyn Outbound> = channel.clone();
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let sink: Arc<dyn NotificationSink> = Arc::new(TelegramNotifier::new(
        Arc::clone(&outbound),
        config.order_chat_id,
    ));

    let dispatcher = Dispatcher::new(store, outbound, sink);

    let events = channel.start().await?;
    dispatcher.run(events).await;

    Ok(())
}
