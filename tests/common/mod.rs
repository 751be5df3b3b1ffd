// tests/common/mod.rs

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{Json, Router, extract::State, routing::post};

use quizforge_backend::config::GeneratorPrompts;
use quizforge_backend::openai::OpenAI;
use quizforge_backend::registry::SchemaRegistry;
use quizforge_backend::routes::build_router;
use quizforge_backend::state::AppState;

/// Canned reply for the stub provider.
#[derive(Clone)]
pub enum StubReply {
    /// Successful completion whose message content is this value, serialized.
    Content(serde_json::Value),
    /// HTTP error status with an OpenAI-style error body.
    Error(u16),
}

/// Stub OpenAI-compatible provider: counts calls and captures the last
/// request body so tests can assert on the wire shape.
pub struct StubProvider {
    pub base_url: String,
    pub calls: Arc<AtomicUsize>,
    pub last_request: Arc<Mutex<Option<serde_json::Value>>>,
}

impl StubProvider {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn captured_request(&self) -> serde_json::Value {
        self.last_request
            .lock()
            .expect("stub lock")
            .clone()
            .expect("a request was captured")
    }
}

#[derive(Clone)]
struct StubState {
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<serde_json::Value>>>,
    reply: StubReply,
}

/// Spawn the stub provider on a random port.
pub async fn spawn_provider(reply: StubReply) -> StubProvider {
    let calls = Arc::new(AtomicUsize::new(0));
    let last_request = Arc::new(Mutex::new(None));
    let state = StubState {
        calls: calls.clone(),
        last_request: last_request.clone(),
        reply,
    };

    let app = Router::new()
        .route("/chat/completions", post(stub_completions))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub provider");
    let base_url = format!("http://{}", listener.local_addr().expect("stub addr"));

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub provider serve");
    });

    StubProvider { base_url, calls, last_request }
}

async fn stub_completions(
    State(state): State<StubState>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    state.calls.fetch_add(1, Ordering::SeqCst);
    *state.last_request.lock().expect("stub lock") = Some(body);

    match &state.reply {
        StubReply::Content(value) => {
            let content = serde_json::to_string(value).expect("stub content");
            Json(serde_json::json!({
                "choices": [ { "message": { "content": content } } ],
                "usage": { "prompt_tokens": 42, "completion_tokens": 128, "total_tokens": 170 }
            }))
            .into_response()
        }
        StubReply::Error(status) => {
            let code = StatusCode::from_u16(*status).expect("stub status");
            (
                code,
                Json(serde_json::json!({ "error": { "message": "stub provider failure" } })),
            )
                .into_response()
        }
    }
}

/// Spawn the app on a random port, pointed at the given provider base URL.
/// Returns the base address (e.g. "http://127.0.0.1:12345").
pub async fn spawn_app(provider_base_url: &str) -> String {
    let openai = OpenAI::with_settings(
        "test-key".into(),
        provider_base_url.to_string(),
        "stub-text-model".into(),
        "stub-vision-model".into(),
        5,
    )
    .expect("client builds");

    let state = Arc::new(AppState {
        registry: SchemaRegistry::new(),
        prompts: GeneratorPrompts::default(),
        openai: Some(openai),
    });

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind app");
    let address = format!("http://{}", listener.local_addr().expect("app addr"));

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("app serve");
    });

    address
}
