use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use proba_assistant::answer::FALLBACK_ANSWER;
use proba_assistant::core::config::{AppConfig, AppPaths};
use proba_assistant::core::notice::{GENERATION_NOTICE, RETRIEVAL_NOTICE};
use proba_assistant::core::security::{SessionToken, API_KEY_HEADER};
use proba_assistant::llm::OpenAiClient;
use proba_assistant::rag::PineconeIndex;
use proba_assistant::server::router::router;
use proba_assistant::session::NO_RESULTS_MESSAGE;
use proba_assistant::state::AppState;

const TOKEN: &str = "integration-token";

struct Harness {
    app: Router,
    openai: MockServer,
    pinecone: MockServer,
    _dir: tempfile::TempDir,
}

async fn harness() -> Harness {
    let openai = MockServer::start().await;
    let pinecone = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let mut config = AppConfig::default();
    config.openai.base_url = openai.uri();
    config.vector_index.control_plane_url = pinecone.uri();

    Mock::given(method("GET"))
        .and(path("/indexes/mathindex"))
        .and(header("Api-Key", "pc-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "mathindex",
            "host": pinecone.uri()
        })))
        .expect(1)
        .mount(&pinecone)
        .await;

    let client = Arc::new(
        OpenAiClient::new(
            &config.openai.base_url,
            "sk-test".to_string(),
            config.openai.embedding_model.clone(),
            Duration::from_secs(5),
        )
        .unwrap(),
    );
    let index = PineconeIndex::connect(
        &config.vector_index,
        "pc-key".to_string(),
        Duration::from_secs(5),
        Duration::from_secs(5),
    )
    .await
    .ok()
    .unwrap();

    let state = AppState::from_parts(
        Arc::new(AppPaths::under(dir.path())),
        config,
        SessionToken::new(TOKEN),
        client.clone(),
        Arc::new(index),
        client,
    );

    Harness {
        app: router(state),
        openai,
        pinecone,
        _dir: dir,
    }
}

async fn mount_embedding(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "embedding": [0.1, 0.2, 0.3], "index": 0 }]
        })))
        .mount(server)
        .await;
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(API_KEY_HEADER, TOKEN)
        .header("content-type", "application/json");
    let req = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn ask(app: &Router, question: &str) -> Value {
    let (status, created) = call(app, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    let id = created["session_id"].as_str().unwrap().to_string();

    let (status, body) = call(
        app,
        "POST",
        &format!("/api/sessions/{}/messages", id),
        Some(json!({ "message": question })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn grounded_answer_uses_all_retrieved_passages() {
    let h = harness().await;
    mount_embedding(&h.openai).await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_partial_json(json!({ "topK": 3, "includeMetadata": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [
                { "id": "binom-1", "score": 0.93, "metadata": { "text": "P(X=k) = C(n,k) p^k (1-p)^(n-k)" } },
                { "id": "binom-2", "score": 0.88, "metadata": { "text": "E[X] = np" } },
                { "id": "binom-3", "score": 0.81, "metadata": { "source": "notes" } }
            ]
        })))
        .expect(1)
        .mount(&h.pinecone)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "gpt-4o" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "  The pmf is $$P(X=k)=\\binom{n}{k}p^k(1-p)^{n-k}$$  " } }]
        })))
        .expect(1)
        .mount(&h.openai)
        .await;

    let body = ask(&h.app, "What is the binomial distribution?").await;

    let turns = body["turns"].as_array().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0]["role"], "user");
    assert_eq!(turns[0]["content"], "What is the binomial distribution?");
    assert_eq!(turns[1]["role"], "assistant");
    assert_eq!(
        turns[1]["content"],
        "The pmf is $$P(X=k)=\\binom{n}{k}p^k(1-p)^{n-k}$$"
    );
    assert_eq!(turns[1]["segments"][1]["kind"], "display");
    assert_eq!(body["notices"], json!([]));

    let sources = body["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 3);
    assert_eq!(sources[0]["id"], "binom-1");
    assert_eq!(sources[2]["id"], "binom-3");

    let requests = h.openai.received_requests().await.unwrap();
    let completion = requests
        .iter()
        .find(|req| req.url.path() == "/chat/completions")
        .unwrap();
    let payload: Value = serde_json::from_slice(&completion.body).unwrap();
    let prompt = payload["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("P(X=k) = C(n,k) p^k (1-p)^(n-k)\nE[X] = np\nNo text available"));
    assert!(prompt.contains("User's question: What is the binomial distribution?"));
}

#[tokio::test]
async fn zero_matches_skip_generation() {
    let h = harness().await;
    mount_embedding(&h.openai).await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "matches": [] })))
        .mount(&h.pinecone)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&h.openai)
        .await;

    let body = ask(&h.app, "Tell me about something unindexed").await;

    assert_eq!(body["turns"][1]["content"], NO_RESULTS_MESSAGE);
    assert_eq!(body["notices"], json!([]));
    assert_eq!(body["sources"], json!([]));
}

#[tokio::test]
async fn index_outage_degrades_to_notice_and_rephrase_message() {
    let h = harness().await;
    mount_embedding(&h.openai).await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&h.pinecone)
        .await;

    let body = ask(&h.app, "What is a Poisson process?").await;

    assert_eq!(body["notices"][0]["kind"], "retrieval");
    assert_eq!(body["notices"][0]["message"], RETRIEVAL_NOTICE);
    assert_eq!(body["turns"][1]["content"], NO_RESULTS_MESSAGE);
}

#[tokio::test]
async fn completion_failure_returns_fallback_answer() {
    let h = harness().await;
    mount_embedding(&h.openai).await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [{ "id": "var-1", "score": 0.7, "metadata": { "text": "Var(X) = E[X^2] - E[X]^2" } }]
        })))
        .mount(&h.pinecone)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&h.openai)
        .await;

    let body = ask(&h.app, "How do I compute variance?").await;

    assert_eq!(body["turns"][1]["content"], FALLBACK_ANSWER);
    assert_eq!(body["notices"][0]["kind"], "generation");
    assert_eq!(body["notices"][0]["message"], GENERATION_NOTICE);
    assert_eq!(body["sources"][0]["id"], "var-1");
}
