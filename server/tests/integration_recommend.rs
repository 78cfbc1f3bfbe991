use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use vagas_core::engine::Snapshot;
use vagas_core::JobPosting;
use vagas_server::build_app;

fn snapshot() -> Arc<Snapshot> {
    let jobs: Vec<JobPosting> = serde_json::from_value(json!([
        {"id": "a", "descrição": "engenheiro backend python", "empresa": "Acme"},
        {"id": "b", "descrição": "engenheiro frontend react"},
        {"id": "c", "descrição": "desenvolvedor backend python django"},
    ]))
    .unwrap();
    Arc::new(Snapshot::build(jobs))
}

async fn post(path: &str, body: Value) -> (StatusCode, Value) {
    let app = build_app(snapshot());
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn recommend_returns_ranked_postings() {
    let (status, body) = post("/recommend", json!({"trabalho": "backend python"})).await;
    assert_eq!(status, StatusCode::OK);

    let arr = body.as_array().unwrap();
    let ids: Vec<&str> = arr.iter().map(|j| j["id"].as_str().unwrap()).collect();
    // The anchor comes first; c shares more vocabulary with it than b does.
    assert_eq!(ids, vec!["a", "c", "b"]);
    // Stored fields pass through alongside the injected id.
    assert_eq!(arr[0]["empresa"], "Acme");
    assert_eq!(arr[0]["descrição"], "engenheiro backend python");
}

#[tokio::test]
async fn recommend_requires_the_trabalho_field() {
    let (status, body) = post("/recommend", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "O campo 'trabalho' é necessário.");
}

#[tokio::test]
async fn recommend_rejects_unrelated_text() {
    let (status, body) = post("/recommend", json!({"trabalho": "jardinagem ornamental"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Nenhuma vaga correspondente encontrada.");
}

#[tokio::test]
async fn recommend_rejects_an_empty_query() {
    let (status, _) = post("/recommend", json!({"trabalho": ""})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_returns_the_posting_and_its_neighbors() {
    let (status, body) = post("/profile", json!({"id": "b"})).await;
    assert_eq!(status, StatusCode::OK);

    let arr = body.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["id"], "b");
}

#[tokio::test]
async fn profile_rejects_an_unknown_id() {
    let (status, body) = post("/profile", json!({"id": "zzz"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Nenhuma vaga encontrada com o ID fornecido.");
}

#[tokio::test]
async fn profile_treats_a_missing_id_as_unknown() {
    let (status, _) = post("/profile", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_is_idempotent() {
    let (_, first) = post("/profile", json!({"id": "a"})).await;
    let (_, second) = post("/profile", json!({"id": "a"})).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = build_app(snapshot());
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
