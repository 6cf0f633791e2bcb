use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::{error, info};

use crate::api::error::ApiError;
use crate::api::handlers::{parse_id, MessageResponse, PaginationParams};
use crate::api::state::AppState;
use crate::storage::models::{Entry, EntryPayload};

const VALIDATION_MESSAGE: &str = "The entry details failed validation.";

fn not_found(entry_id: &str) -> ApiError {
    ApiError::NotFound(format!("No result found for entry_id: {}", entry_id))
}

fn validation_failed(context: &str, err: impl std::fmt::Display) -> ApiError {
    error!("條目驗證失敗 ({}): {}", context, err);
    ApiError::Validation(VALIDATION_MESSAGE.to_string())
}

/// GET /entry
pub async fn list_entries(
    State(state): State<AppState>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    let Query(params) = query?;
    let page = params.resolve(&state.paging)?;

    let entries = state.entries.list(page).await?;
    Ok(Json(entries))
}

/// GET /entry/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<Entry>, ApiError> {
    let entry_id = parse_id(&raw).ok_or_else(|| not_found(&raw))?;

    match state.entries.get(entry_id).await? {
        Some(entry) => Ok(Json(entry)),
        None => {
            error!("找不到 entry_id {}", entry_id);
            Err(not_found(&raw))
        }
    }
}

/// POST /entry
pub async fn add_entry(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = body?;

    let insert = EntryPayload::from_json(body)
        .and_then(|payload| payload.into_insert(None))
        .map_err(|e| validation_failed("新增", e))?;

    let entry = state.entries.insert(insert).await?;
    info!("已新增條目 {}", entry.entry_id);

    Ok(Json(MessageResponse::new(format!(
        "Entry {} added successfully",
        entry.entry_id
    ))))
}

/// DELETE /entry/{id}
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let missing = || ApiError::NotFound(format!("Entry with id {} not found.", raw));

    let entry_id = parse_id(&raw).ok_or_else(missing)?;
    if !state.entries.delete(entry_id).await? {
        error!("刪除失敗，找不到 entry_id {}", entry_id);
        return Err(missing());
    }

    info!("已刪除條目 {}", entry_id);
    Ok(Json(MessageResponse::new(format!("Entry {} deleted successfully", raw))))
}

/// PUT /entry/{id}，整體替換，不存在時新增
pub async fn replace_entry(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = body?;
    let path_id = parse_id(&raw);

    let insert = EntryPayload::from_json(body)
        .and_then(|payload| payload.into_insert(path_id))
        .map_err(|e| validation_failed("替換", e))?;

    let Some(entry_id) = insert.entry_id else {
        return Err(validation_failed("替換", "缺少 entry_id"));
    };
    if path_id != Some(entry_id) {
        info!("更新條目 {}，新的 entry_id: {}", raw, entry_id);
    }

    let entry = state.entries.upsert(insert.with_id(entry_id)).await?;
    Ok(Json(MessageResponse::new(format!(
        "Entry with entry_id {} updated successfully",
        entry.entry_id
    ))))
}

/// PATCH /entry/{id}，只更新請求中出現的欄位
pub async fn patch_entry(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = body?;

    let entry_id = parse_id(&raw).ok_or_else(|| not_found(&raw))?;
    let Some(mut entry) = state.entries.get(entry_id).await? else {
        error!("找不到 entry_id {}", entry_id);
        return Err(not_found(&raw));
    };

    EntryPayload::from_json(body)
        .and_then(|payload| payload.apply_to(&mut entry))
        .map_err(|e| validation_failed("部分更新", e))?;

    let updated = state
        .entries
        .update(entry_id, entry)
        .await?
        .ok_or_else(|| not_found(&raw))?;

    Ok(Json(MessageResponse::new(format!(
        "Entry with entry_id {} updated successfully",
        updated.entry_id
    ))))
}
