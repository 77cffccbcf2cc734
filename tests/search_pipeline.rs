//! Integration tests for the search half of the pipeline
//!
//! Store -> index build -> persistence round trip -> search service ->
//! HTTP surface, end to end.

use chrono::Utc;
use lantern::config::SearchConfig;
use lantern::index::{build_index, InvertedIndex};
use lantern::search::{router, SearchService};
use lantern::storage::{DocumentRecord, DocumentStore, MemoryStore};
use std::sync::Arc;

fn record(doc_id: u64, title: &str, content: &str) -> DocumentRecord {
    DocumentRecord {
        doc_id,
        url: format!("https://example.com/{}", doc_id),
        title: title.to_string(),
        content: content.to_string(),
        content_type: "text/html".to_string(),
        fetched_at: Utc::now(),
    }
}

/// D1=[cat,dog,cat], D2=[cat,fish], D3=[bird]
fn sample_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.put(&record(1, "", "cat dog cat")).unwrap();
    store.put(&record(2, "", "cat fish")).unwrap();
    store.put(&record(3, "", "bird")).unwrap();
    store
}

#[test]
fn test_store_to_search_end_to_end() {
    let store = sample_store();
    let index = build_index(store.as_ref()).unwrap();

    let expected_idf = (3.0_f64 / 2.0).ln();
    let results = index.search(&["cat".to_string()], 10).unwrap();
    assert_eq!(results[0].0, 1);
    assert!((results[0].1 - (2.0 / 3.0) * expected_idf).abs() < 1e-9);
    assert_eq!(results[1].0, 2);
    assert!((results[1].1 - 0.5 * expected_idf).abs() < 1e-9);

    let service = SearchService::new(index, store, &SearchConfig::default());
    let response = service.search("cat", 1, 10).unwrap();
    assert_eq!(response.total_results, 2);
    assert_eq!(response.results[0].url, "https://example.com/1");
}

#[test]
fn test_persisted_index_serves_identical_results() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lantern.idx");

    let store = sample_store();
    let index = build_index(store.as_ref()).unwrap();
    let direct = index.search(&["cat".to_string()], 10).unwrap();
    index.save(&path).unwrap();

    let loaded = InvertedIndex::load(&path).unwrap();
    assert!(loaded.is_finalized());
    assert_eq!(loaded.search(&["cat".to_string()], 10).unwrap(), direct);

    let service = SearchService::new(loaded, store, &SearchConfig::default());
    let response = service.search("cat", 1, 10).unwrap();
    assert_eq!(response.total_results, 2);
    assert_eq!(response.results.len(), 2);
}

async fn spawn_server(service: SearchService) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(Arc::new(service))).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn sample_server() -> String {
    let store = sample_store();
    let index = build_index(store.as_ref()).unwrap();
    spawn_server(SearchService::new(index, store, &SearchConfig::default())).await
}

#[tokio::test]
async fn test_http_search_returns_ranked_json() {
    let base = sample_server().await;

    let response = reqwest::get(format!("{}/search?q=cat", base)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["query"], "cat");
    assert_eq!(body["total_results"], 2);
    assert_eq!(body["page"], 1);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["url"], "https://example.com/1");
    assert!(results[0]["score"].as_f64().unwrap() >= results[1]["score"].as_f64().unwrap());
    assert!(body["processing_time"].is_number());
}

#[tokio::test]
async fn test_http_missing_query_is_400() {
    let base = sample_server().await;

    let response = reqwest::get(format!("{}/search", base)).await.unwrap();
    assert_eq!(response.status(), 400);

    let response = reqwest::get(format!("{}/search?q=%20", base)).await.unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_http_bad_page_and_limit_are_400() {
    let base = sample_server().await;

    let response = reqwest::get(format!("{}/search?q=cat&page=0", base))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = reqwest::get(format!("{}/search?q=cat&limit=0", base))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = reqwest::get(format!("{}/search?q=cat&limit=101", base))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_http_stats_and_health() {
    let base = sample_server().await;

    let stats: serde_json::Value = reqwest::get(format!("{}/stats", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total_documents"], 3);
    assert_eq!(stats["total_terms"], 4);

    let health: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["index_loaded"], true);
    assert!(health["timestamp"].is_number());
}

#[tokio::test]
async fn test_http_health_reports_unloaded_empty_index() {
    let store = Arc::new(MemoryStore::new());
    let mut index = InvertedIndex::new();
    index.finalize();
    let base = spawn_server(SearchService::new(index, store, &SearchConfig::default())).await;

    let health: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["index_loaded"], false);

    let body: serde_json::Value = reqwest::get(format!("{}/search?q=cat", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total_results"], 0);
}

#[tokio::test]
async fn test_http_snippet_contains_match() {
    let store = Arc::new(MemoryStore::new());
    store
        .put(&record(
            1,
            "Foxes",
            "The quick brown fox jumps over the lazy dog",
        ))
        .unwrap();
    let index = build_index(store.as_ref()).unwrap();
    let base = spawn_server(SearchService::new(index, store, &SearchConfig::default())).await;

    let body: serde_json::Value = reqwest::get(format!("{}/search?q=fox", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let snippet = body["results"][0]["snippet"].as_str().unwrap();
    assert!(snippet.contains("fox"));
}
