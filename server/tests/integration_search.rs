use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use trove_core::{EngineConfig, SearchEngine};

fn tiny_app() -> (Arc<SearchEngine>, Router) {
    tiny_app_with_token(None)
}

fn tiny_app_with_token(admin_token: Option<&str>) -> (Arc<SearchEngine>, Router) {
    let engine = Arc::new(SearchEngine::new(EngineConfig { workers: Some(2), ..Default::default() }));
    engine.add_document_content("doc1", "the cat sat on the mat");
    engine.add_document_content("doc2", "the cat ran fast");
    let app = server::build_app(Arc::clone(&engine), admin_token.map(str::to_string)).unwrap();
    (engine, app)
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let (_, app) = tiny_app();
    let (status, body) = get(app, "/search?q=cat").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 2);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["document"], "doc2");
    assert_eq!(arr[1]["document"], "doc1");
    assert_eq!(arr[1]["frequency"], 1);
    assert_eq!(arr[1]["positions"], serde_json::json!([1]));
    assert_eq!(arr[1]["offsets"], serde_json::json!([4]));
    assert_eq!(arr[1]["snippet"], "the cat sat on the mat");
    assert_eq!(arr[1]["suggestion"], "");
    assert!(arr[0]["score"].as_f64().unwrap() > arr[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn search_limits_and_suggests() {
    let (_, app) = tiny_app();
    let (status, body) = get(app, "/search?q=kat&k=1").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 2);
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
    assert_eq!(json["suggestion"], "cat");
    assert_eq!(json["results"][0]["suggestion"], "cat");
}

#[tokio::test]
async fn missing_parameters_are_rejected() {
    let (_, app) = tiny_app();
    let (status, _) = get(app.clone(), "/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(app, "/autocomplete").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn autocomplete_lists_suggestions() {
    let (_, app) = tiny_app();
    let (status, body) = get(app, "/autocomplete?prefix=ca").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["suggestions"], serde_json::json!(["cat"]));
}

#[tokio::test]
async fn upload_names_documents_and_indexes_them() {
    let (engine, app) = tiny_app();
    let req = Request::post("/upload").body(Body::from("zebras are striped")).unwrap();
    let (status, _) = send(app.clone(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(engine.document_count(), 3);

    let (_, body) = get(app.clone(), "/search?q=zebras").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["results"][0]["document"], "uploaded_doc_1.txt");

    let req = Request::post("/upload").body(Body::empty()).unwrap();
    let (status, _) = send(app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn load_sample_then_upload_replaces_it() {
    let engine = Arc::new(SearchEngine::default());
    let app = server::build_app(Arc::clone(&engine), None).unwrap();
    let (status, _) = get(app.clone(), "/loadSample").await;
    assert_eq!(status, StatusCode::OK);
    assert!(engine.is_sample_loaded());

    let (_, body) = get(app.clone(), "/search?q=borrow%20checker").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["results"][0]["document"], "sample/rust.txt");

    let req = Request::post("/upload").body(Body::from("private notes")).unwrap();
    send(app, req).await;
    assert_eq!(engine.document_count(), 1);
}

#[tokio::test]
async fn admin_endpoints_require_token() {
    let (engine, app) = tiny_app_with_token(Some("secret"));

    let req = Request::post("/index/clear").body(Body::empty()).unwrap();
    let (status, _) = send(app.clone(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(engine.document_count(), 2);

    let req = Request::post("/index/build").header("X-ADMIN-TOKEN", "secret").body(Body::empty()).unwrap();
    let (status, body) = send(app.clone(), req).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["num_docs"], 2);
    assert_eq!(json["num_terms"], 7);

    let req = Request::post("/index/clear").header("X-ADMIN-TOKEN", "secret").body(Body::empty()).unwrap();
    let (status, _) = send(app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(engine.document_count(), 0);
}

#[tokio::test]
async fn admin_endpoints_closed_without_token() {
    let (engine, app) = tiny_app();
    let req = Request::post("/index/build").header("X-ADMIN-TOKEN", "").body(Body::empty()).unwrap();
    let (status, _) = send(app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(engine.document_count(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_uploads_leave_search_responsive() {
    let (engine, app) = tiny_app();
    let uploads: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let req = Request::post("/upload").body(Body::from(format!("upload number{i} zebra"))).unwrap();
                send(app, req).await.0
            })
        })
        .collect();

    let (status, body) = get(app.clone(), "/search?q=cat").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 2);

    for upload in uploads {
        assert_eq!(upload.await.unwrap(), StatusCode::OK);
    }
    assert_eq!(engine.document_count(), 10);
    let (_, body) = get(app, "/search?q=zebra").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 8);
}
