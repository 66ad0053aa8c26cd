use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agent_notify::{NotifyError, TelegramConfig, TelegramNotifier};

fn notifier(server: &MockServer) -> TelegramNotifier {
    let mut config = TelegramConfig::new("123:abc", "42");
    config.api_base = server.uri();
    TelegramNotifier::new(Some(config))
}

#[tokio::test]
async fn posts_html_message_to_bot_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_json(json!({
            "chat_id": "42",
            "text": "<b>Report</b>",
            "parse_mode": "HTML"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(notifier(&server).send_message("<b>Report</b>").await);
}

#[tokio::test]
async fn api_rejection_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let notifier = notifier(&server);
    match notifier.try_send("hello").await {
        Err(NotifyError::Api { status, description }) => {
            assert_eq!(status, 400);
            assert_eq!(description, "Bad Request: chat not found");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!notifier.send_message("hello").await);
}

#[tokio::test]
async fn ok_false_with_200_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": false})))
        .mount(&server)
        .await;

    assert!(matches!(
        notifier(&server).try_send("hello").await,
        Err(NotifyError::Api { status: 200, .. })
    ));
}
