//! Exercises the real Telegram channel against a mock Bot API server.
//!
//! Verifies the wire shapes: sendMessage / editMessageText request
//! bodies, inline keyboard layout, error mapping, and the long-poll
//! update translation.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::time::timeout;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use commission_bot::channels::{Button, EventKind, Outbound, TelegramChannel};
use commission_bot::error::ChannelError;
use commission_bot::notify::{NotificationSink, TelegramNotifier};
use commission_bot::submission::OrderSubmission;

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

fn channel(server: &MockServer) -> TelegramChannel {
    TelegramChannel::with_base_url(
        SecretString::from("123:ABC".to_string()),
        1,
        server.uri(),
    )
}

fn ok_body() -> Value {
    json!({ "ok": true, "result": {} })
}

#[tokio::test]
async fn send_text_posts_plain_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:ABC/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    channel(&server)
        .send_text(42, "✅ Ваша заявка принята!")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["chat_id"], 42);
    assert_eq!(body["text"], "✅ Ваша заявка принята!");
    assert!(body.get("parse_mode").is_none());
    assert!(body.get("reply_markup").is_none());
}

#[tokio::test]
async fn send_with_buttons_builds_one_row_per_button() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:ABC/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    channel(&server)
        .send_with_buttons(
            42,
            "Выберите тип услуги:",
            &[
                Button::new("🎨 Заказать арт", "order_art"),
                Button::new("💻 Заказать программу", "order_program"),
            ],
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    let rows = body["reply_markup"]["inline_keyboard"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].as_array().unwrap().len(), 1);
    assert_eq!(rows[0][0]["text"], "🎨 Заказать арт");
    assert_eq!(rows[0][0]["callback_data"], "order_art");
    assert_eq!(rows[1][0]["callback_data"], "order_program");
}

#[tokio::test]
async fn edit_message_targets_the_original_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:ABC/editMessageText"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    channel(&server)
        .edit_message(42, 77, "Выберите тип услуги:", &[])
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["chat_id"], 42);
    assert_eq!(body["message_id"], 77);
    assert_eq!(body["text"], "Выберите тип услуги:");
}

#[tokio::test]
async fn api_error_maps_to_send_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:ABC/sendMessage"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "description": "Bad Request: chat not found",
        })))
        .mount(&server)
        .await;

    let err = channel(&server).send_text(42, "hi").await.unwrap_err();
    match err {
        ChannelError::SendFailed { name, reason } => {
            assert_eq!(name, "telegram");
            assert!(reason.contains("sendMessage"), "reason: {reason}");
            assert!(reason.contains("chat not found"), "reason: {reason}");
        }
        other => panic!("expected SendFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn notifier_forwards_rendered_order_to_operator_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:ABC/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let outbound: Arc<dyn Outbound> = Arc::new(channel(&server));
    let notifier = TelegramNotifier::new(outbound, -1001234567890);

    let submission = OrderSubmission::art("alice", "Портрет, скетч");
    notifier.forward(&submission).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["chat_id"], -1001234567890_i64);
    assert_eq!(
        body["text"],
        "🚨 Новая заявка на арт!\n\nОт: @alice\nДанные:\nПортрет, скетч"
    );
}

#[tokio::test]
async fn start_performs_health_check_and_delivers_parsed_events() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bot123:ABC/getMe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "id": 1, "is_bot": true, "username": "commission_bot" },
        })))
        .mount(&server)
        .await;

    // First poll (offset 0) returns one /start message and one button
    // press; later polls return nothing, slowly.
    Mock::given(method("POST"))
        .and(path("/bot123:ABC/getUpdates"))
        .and(body_partial_json(json!({ "offset": 0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [
                {
                    "update_id": 6,
                    "message": {
                        "message_id": 10,
                        "from": { "id": 42, "username": "alice" },
                        "chat": { "id": 42 },
                        "text": "/start",
                    }
                },
                {
                    "update_id": 7,
                    "callback_query": {
                        "id": "cb-1",
                        "from": { "id": 42, "username": "alice" },
                        "data": "start_order",
                        "message": {
                            "message_id": 11,
                            "chat": { "id": 42 },
                        }
                    }
                }
            ]
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/bot123:ABC/getUpdates"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ok": true, "result": [] }))
                .set_delay(Duration::from_millis(500)),
        )
        .with_priority(5)
        .mount(&server)
        .await;

    let mut events = channel(&server).start().await.unwrap();

    let first = timeout(TEST_TIMEOUT, events.next())
        .await
        .expect("no event before timeout")
        .expect("stream ended");
    assert_eq!(first.user_id, 42);
    assert_eq!(first.kind, EventKind::StartCommand);

    let second = timeout(TEST_TIMEOUT, events.next())
        .await
        .expect("no event before timeout")
        .expect("stream ended");
    assert_eq!(second.message_id, Some(11));
    assert_eq!(
        second.kind,
        EventKind::ButtonPressed {
            token: "start_order".into()
        }
    );
}

#[tokio::test]
async fn start_fails_when_token_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bot123:ABC/getMe"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "ok": false,
            "description": "Unauthorized",
        })))
        .mount(&server)
        .await;

    let err = match channel(&server).start().await {
        Ok(_) => panic!("expected start to fail"),
        Err(e) => e,
    };
    assert!(matches!(err, ChannelError::StartupFailed { .. }));
}
