#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use estates_server::{
    api::{build_router, AppState},
    config::{RestApiConfig, ServerConfig},
    storage::{
        create_test_pool,
        models::{Entry, EntryInsert, Hei},
        repository::{EntryRepository, HeiRepository, PageQuery},
        StorageError, StorageResult,
    },
};
use mockall::mock;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const INTERNAL_ERROR: &str = "An Internal Server Error occurred. Please try again later.";

mock! {
    pub HeiRepo {}

    #[async_trait]
    impl HeiRepository for HeiRepo {
        async fn list(&self, page: PageQuery) -> StorageResult<Vec<Hei>>;
        async fn get(&self, ukprn: i64) -> StorageResult<Option<Hei>>;
        async fn insert(&self, hei: Hei) -> StorageResult<Hei>;
        async fn upsert(&self, hei: Hei) -> StorageResult<Hei>;
        async fn update(&self, ukprn: i64, hei: Hei) -> StorageResult<Option<Hei>>;
        async fn delete(&self, ukprn: i64) -> StorageResult<bool>;
        async fn count(&self) -> StorageResult<i64>;
        async fn insert_batch(&self, heis: Vec<Hei>, batch_size: usize) -> StorageResult<usize>;
    }
}

mock! {
    pub EntryRepo {}

    #[async_trait]
    impl EntryRepository for EntryRepo {
        async fn list(&self, page: PageQuery) -> StorageResult<Vec<Entry>>;
        async fn get(&self, entry_id: i64) -> StorageResult<Option<Entry>>;
        async fn insert(&self, entry: EntryInsert) -> StorageResult<Entry>;
        async fn upsert(&self, entry: Entry) -> StorageResult<Entry>;
        async fn update(&self, entry_id: i64, entry: Entry) -> StorageResult<Option<Entry>>;
        async fn delete(&self, entry_id: i64) -> StorageResult<bool>;
        async fn count(&self) -> StorageResult<i64>;
        async fn insert_batch(&self, entries: Vec<EntryInsert>, batch_size: usize) -> StorageResult<usize>;
    }
}

/// 模擬資料庫失敗
pub fn db_error() -> StorageError {
    StorageError::Database(sqlx::Error::PoolTimedOut)
}

pub fn hei(ukprn: i64, he_name: &str, region: &str) -> Hei {
    Hei {
        ukprn,
        he_name: he_name.to_string(),
        region: region.to_string(),
        lat: None,
        lon: None,
    }
}

pub fn sample_heis() -> Vec<Hei> {
    let mut cambridge = hei(10007788, "The University of Cambridge", "East of England");
    cambridge.lat = Some("52.2043".to_string());
    cambridge.lon = Some("0.1149".to_string());

    vec![
        hei(10000291, "Anglia Ruskin University", "East of England"),
        cambridge,
        hei(10007792, "University of Exeter", "South West"),
        hei(10007856, "Aberystwyth University", "Wales"),
    ]
}

pub fn entry(entry_id: i64, ukprn: i64, he_name: &str) -> EntryInsert {
    EntryInsert {
        entry_id: Some(entry_id),
        academic_year: "2021/22".to_string(),
        classification: "Environmental information".to_string(),
        category_marker: "Energy".to_string(),
        category: "Total energy consumption (kWh)".to_string(),
        value: Some("123456".to_string()),
        ukprn: Some(ukprn),
        he_name: Some(he_name.to_string()),
    }
}

pub fn sample_entries() -> Vec<EntryInsert> {
    (750..=760)
        .map(|id| entry(id, 10007788, "The University of Cambridge"))
        .collect()
}

/// 建立已載入樣本資料的記憶體資料庫狀態
pub async fn seeded_state() -> AppState {
    let pool = create_test_pool().await.unwrap();
    let state = AppState::from_pool(pool, RestApiConfig::default());

    state.heis.insert_batch(sample_heis(), 100).await.unwrap();
    state.entries.insert_batch(sample_entries(), 100).await.unwrap();
    state
}

pub fn mocked_state(heis: MockHeiRepo, entries: MockEntryRepo) -> AppState {
    AppState::new(Arc::new(heis), Arc::new(entries), RestApiConfig::default())
}

pub fn app(state: AppState) -> Router {
    build_router(state, &ServerConfig::default(), &RestApiConfig::default())
}

pub async fn seeded_app() -> Router {
    app(seeded_state().await)
}

/// 送出請求並返回狀態碼與原始內容
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

/// 送出請求並將回應解析為 JSON
pub async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
