use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use sahayak::{
    router::{BackendError, BackendSelector, ChatBackend, ChatTurn, CompletionRouter, Role},
    server::{AppState, build_app},
};

/// Records every conversation it receives and replies with a fixed outcome
struct RecordingStub {
    reply: Result<&'static str, &'static str>,
    seen: Mutex<Vec<Vec<ChatTurn>>>,
}

impl RecordingStub {
    fn ok(text: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn last_conversation(&self) -> Vec<ChatTurn> {
        self.seen.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl ChatBackend for RecordingStub {
    async fn generate(&self, turns: &[ChatTurn]) -> Result<String, BackendError> {
        self.seen.lock().unwrap().push(turns.to_vec());
        match self.reply {
            Ok(text) => Ok(text.to_string()),
            Err(message) => Err(BackendError::Api {
                status: 401,
                message: message.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "OpenAI"
    }
}

fn app_with(stub: Arc<RecordingStub>) -> Router {
    let state = AppState::new(CompletionRouter::new(stub), BackendSelector::OpenAi);
    build_app(state, None)
}

async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_general_success() {
    let stub = RecordingStub::ok("Hello! How can I help?");
    let (status, body) = post_json(
        app_with(stub.clone()),
        "/api/general",
        json!({"message": "hi"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"answer": "Hello! How can I help?"}));

    let turns = stub.last_conversation();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::System);
    assert_eq!(turns[0].content, "You are a helpful AI assistant.");
    assert_eq!(turns[1].role, Role::User);
    assert_eq!(turns[1].content, "hi");
}

#[tokio::test]
async fn test_general_backend_failure() {
    let stub = RecordingStub::failing("Incorrect API key provided");
    let (status, body) = post_json(
        app_with(stub),
        "/api/general",
        json!({"message": "hi"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "OpenAI Error: 401 Incorrect API key provided"})
    );
}

#[tokio::test]
async fn test_persona_fields_and_labels() {
    let cases = [
        ("/api/health", json!({"symptoms": "headache"}), "Patient symptoms: headache", "medical assistant"),
        ("/api/agriculture", json!({"context": "wheat rust"}), "Context: wheat rust", "agriculture expert"),
        ("/api/finance", json!({"budgetDetails": "rent 900"}), "Budget details: rent 900", "financial advisor"),
    ];

    for (uri, body, expected_user, expected_system) in cases {
        let stub = RecordingStub::ok("advice");
        let (status, response) = post_json(app_with(stub.clone()), uri, body.to_string()).await;

        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(response["answer"], "advice");

        let turns = stub.last_conversation();
        assert!(turns[0].content.contains(expected_system), "{}", uri);
        assert_eq!(turns[1].content, expected_user);
    }
}

#[tokio::test]
async fn test_missing_field_sends_empty_input() {
    let stub = RecordingStub::ok("advice");
    let (status, _) = post_json(app_with(stub.clone()), "/api/health", "{}".to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stub.last_conversation()[1].content, "Patient symptoms: ");
}

#[tokio::test]
async fn test_invalid_json_is_rejected_before_backend() {
    let stub = RecordingStub::ok("unused");
    let (status, body) = post_json(
        app_with(stub.clone()),
        "/api/general",
        "{ not json".to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(stub.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_content_type_keeps_rejection_status() {
    let stub = RecordingStub::ok("unused");
    let request = Request::builder()
        .method("POST")
        .uri("/api/general")
        .body(Body::from(json!({"message": "hi"}).to_string()))
        .unwrap();

    let response = app_with(stub.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("Content-Type"));
    assert!(stub.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_health_check_reports_backend() {
    let app = app_with(RecordingStub::ok("unused"));
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "openai");
}

#[tokio::test]
async fn test_static_fallback_serves_index() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>sahayak</html>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('ok');").unwrap();

    let state = AppState::new(
        CompletionRouter::new(RecordingStub::ok("unused")),
        BackendSelector::OpenAi,
    );
    let app = build_app(state, Some(dir.path()));

    for (uri, expected) in [("/app.js", "console.log('ok');"), ("/dashboard/finance", "<html>sahayak</html>")] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], expected.as_bytes());
    }
}
