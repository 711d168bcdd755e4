//! End-to-end pipeline tests against a mocked Webex API.
//!
//! The label detector is stubbed so no AWS credentials are needed; the
//! Webex download and post endpoints are wiremock mounts with call-count
//! expectations.

use async_trait::async_trait;
use hotdog_bot::config::Settings;
use hotdog_bot::event::{parse_event, WebhookEvent};
use hotdog_bot::handler::{HandlerError, MessageHandler};
use hotdog_bot::vision::{ClassificationError, LabelDetector};
use hotdog_bot::webex::WebexClient;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Detector stub with a fixed verdict (`None` simulates a service failure)
/// and an invocation counter.
struct StubDetector {
    verdict: Option<bool>,
    calls: AtomicUsize,
}

impl StubDetector {
    fn with_verdict(verdict: Option<bool>) -> Arc<Self> {
        Arc::new(Self {
            verdict,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LabelDetector for StubDetector {
    async fn detect_hotdog(&self, _image: &[u8]) -> Result<bool, ClassificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.verdict {
            Some(verdict) => Ok(verdict),
            None => Err(ClassificationError::DetectLabels(
                "service unavailable".to_string(),
            )),
        }
    }
}

fn handler_for(server: &MockServer, detector: Arc<StubDetector>) -> MessageHandler {
    let settings = Settings {
        bot_email: "hotdog@example.com".to_string(),
        bot_token: "test-token".to_string(),
        webex_api_base: server.uri(),
        webhook_port: 0,
        http_timeout_secs: 5,
        max_attachment_bytes: 20 * 1024 * 1024,
    };
    MessageHandler::new(WebexClient::new(&settings), detector)
}

fn event(files: Option<Vec<String>>) -> WebhookEvent {
    let mut data = serde_json::json!({ "id": "m1", "roomId": "r1" });
    if let Some(files) = files {
        data["files"] = serde_json::json!(files);
    }
    let body = serde_json::to_vec(&serde_json::json!({ "data": data })).expect("encode event");
    parse_event(&body).expect("valid event")
}

async fn mount_image(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/files/img.png"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_reply(server: &MockServer, text: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({"roomId": "r1", "text": text})))
        .respond_with(ResponseTemplate::new(200))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn single_image_detected_as_hotdog() {
    let server = MockServer::start().await;
    mount_image(&server, 1).await;
    mount_reply(&server, "Hotdog ✅", 1).await;

    let detector = StubDetector::with_verdict(Some(true));
    let handler = handler_for(&server, detector.clone());
    let event = event(Some(vec![format!("{}/files/img.png", server.uri())]));

    handler.handle(&event).await.expect("pipeline should succeed");
    assert_eq!(detector.calls(), 1);
}

#[tokio::test]
async fn single_image_not_detected_as_hotdog() {
    let server = MockServer::start().await;
    mount_image(&server, 1).await;
    mount_reply(&server, "Not hotdog ❌", 1).await;

    let detector = StubDetector::with_verdict(Some(false));
    let handler = handler_for(&server, detector.clone());
    let event = event(Some(vec![format!("{}/files/img.png", server.uri())]));

    handler.handle(&event).await.expect("pipeline should succeed");
    assert_eq!(detector.calls(), 1);
}

#[tokio::test]
async fn no_files_gets_instructional_reply_without_collaborator_calls() {
    let server = MockServer::start().await;
    mount_image(&server, 0).await;
    mount_reply(
        &server,
        "Hey there, your text is not a hotdog.. I need an image to analyze.",
        1,
    )
    .await;

    let detector = StubDetector::with_verdict(Some(true));
    let handler = handler_for(&server, detector.clone());

    handler.handle(&event(None)).await.expect("pipeline should succeed");
    assert_eq!(detector.calls(), 0);
}

#[tokio::test]
async fn empty_files_list_is_treated_as_no_attachment() {
    let server = MockServer::start().await;
    mount_image(&server, 0).await;
    mount_reply(
        &server,
        "Hey there, your text is not a hotdog.. I need an image to analyze.",
        1,
    )
    .await;

    let detector = StubDetector::with_verdict(Some(true));
    let handler = handler_for(&server, detector.clone());

    handler
        .handle(&event(Some(vec![])))
        .await
        .expect("pipeline should succeed");
    assert_eq!(detector.calls(), 0);
}

#[tokio::test]
async fn multiple_files_get_clarification_reply_without_collaborator_calls() {
    let server = MockServer::start().await;
    mount_image(&server, 0).await;
    mount_reply(&server, "Sorry, I can only handle one image at a time!", 1).await;

    let detector = StubDetector::with_verdict(Some(true));
    let handler = handler_for(&server, detector.clone());
    let event = event(Some(vec!["http://x/a.png".to_string(), "http://x/b.png".to_string()]));

    handler.handle(&event).await.expect("pipeline should succeed");
    assert_eq!(detector.calls(), 0);
}

#[tokio::test]
async fn download_failure_skips_classification_and_reply() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/img.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let detector = StubDetector::with_verdict(Some(true));
    let handler = handler_for(&server, detector.clone());
    let event = event(Some(vec![format!("{}/files/img.png", server.uri())]));

    let err = handler.handle(&event).await.expect_err("download must fail");
    assert!(matches!(err, HandlerError::Download(_)));
    assert_eq!(detector.calls(), 0);
}

#[tokio::test]
async fn classification_failure_skips_reply() {
    let server = MockServer::start().await;
    mount_image(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let detector = StubDetector::with_verdict(None);
    let handler = handler_for(&server, detector.clone());
    let event = event(Some(vec![format!("{}/files/img.png", server.uri())]));

    let err = handler
        .handle(&event)
        .await
        .expect_err("classification must fail");
    assert!(matches!(err, HandlerError::Classification(_)));
    assert_eq!(detector.calls(), 1);
}

#[tokio::test]
async fn reply_post_failure_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let detector = StubDetector::with_verdict(Some(true));
    let handler = handler_for(&server, detector.clone());

    let err = handler.handle(&event(None)).await.expect_err("post must fail");
    assert!(matches!(err, HandlerError::Post(_)));
}

// No dedup by design: the platform owns delivery semantics, so a replayed
// event produces a second, independent reply.
#[tokio::test]
async fn replayed_event_posts_twice() {
    let server = MockServer::start().await;
    mount_image(&server, 2).await;
    mount_reply(&server, "Hotdog ✅", 2).await;

    let detector = StubDetector::with_verdict(Some(true));
    let handler = handler_for(&server, detector.clone());
    let event = event(Some(vec![format!("{}/files/img.png", server.uri())]));

    handler.handle(&event).await.expect("first delivery");
    handler.handle(&event).await.expect("second delivery");
    assert_eq!(detector.calls(), 2);
}

#[tokio::test]
async fn oversized_attachment_is_rejected_before_classification() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/huge.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let settings = Settings {
        bot_email: "hotdog@example.com".to_string(),
        bot_token: "test-token".to_string(),
        webex_api_base: server.uri(),
        webhook_port: 0,
        http_timeout_secs: 5,
        max_attachment_bytes: 16,
    };
    let detector = StubDetector::with_verdict(Some(true));
    let handler = MessageHandler::new(WebexClient::new(&settings), detector.clone());
    let event = event(Some(vec![format!("{}/files/huge.png", server.uri())]));

    let err = handler.handle(&event).await.expect_err("cap must reject");
    assert!(matches!(err, HandlerError::Download(_)));
    assert_eq!(detector.calls(), 0);
}
