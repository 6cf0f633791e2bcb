use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::{error, info};

use crate::api::error::ApiError;
use crate::api::handlers::{parse_id, MessageResponse, PaginationParams};
use crate::api::state::AppState;
use crate::storage::models::{Hei, HeiPayload};

const VALIDATION_MESSAGE: &str = "The HEI details failed validation.";

fn not_found(ukprn: &str) -> ApiError {
    ApiError::NotFound(format!("No result found for UKPRN: {}", ukprn))
}

fn validation_failed(context: &str, err: impl std::fmt::Display) -> ApiError {
    error!("HEI 驗證失敗 ({}): {}", context, err);
    ApiError::Validation(VALIDATION_MESSAGE.to_string())
}

/// GET /hei
pub async fn list_heis(
    State(state): State<AppState>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<Vec<Hei>>, ApiError> {
    let Query(params) = query?;
    let page = params.resolve(&state.paging)?;

    let heis = state.heis.list(page).await?;
    Ok(Json(heis))
}

/// GET /hei/{ukprn}
pub async fn get_hei(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<Hei>, ApiError> {
    let Some(ukprn) = parse_id(&raw) else {
        error!("無效的 UKPRN: {}", raw);
        return Err(not_found(&raw));
    };

    match state.heis.get(ukprn).await? {
        Some(hei) => Ok(Json(hei)),
        None => {
            error!("找不到 UKPRN {}", ukprn);
            Err(not_found(&raw))
        }
    }
}

/// POST /hei
pub async fn add_hei(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = body?;

    let hei = HeiPayload::from_json(body)
        .and_then(|payload| payload.into_hei(None))
        .map_err(|e| validation_failed("新增", e))?;

    let hei = state.heis.insert(hei).await?;
    info!("已新增 HEI {} ({})", hei.ukprn, hei.he_name);

    Ok(Json(MessageResponse::new(format!(
        "HEI {} added successfully",
        hei.he_name
    ))))
}

/// DELETE /hei/{ukprn}
pub async fn delete_hei(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let missing = || ApiError::NotFound(format!("HEI with UKPRN {} not found.", raw));

    let ukprn = parse_id(&raw).ok_or_else(missing)?;
    if !state.heis.delete(ukprn).await? {
        error!("刪除失敗，找不到 UKPRN {}", ukprn);
        return Err(missing());
    }

    info!("已刪除 HEI {}", ukprn);
    Ok(Json(MessageResponse::new(format!("HEI {} deleted successfully", ukprn))))
}

/// PUT /hei/{ukprn}，整體替換，不存在時新增
pub async fn replace_hei(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = body?;
    let path_ukprn = parse_id(&raw);

    let hei = HeiPayload::from_json(body)
        .and_then(|payload| payload.into_hei(path_ukprn))
        .map_err(|e| validation_failed("替換", e))?;

    if path_ukprn != Some(hei.ukprn) {
        info!("更新 UKPRN {} 的 HEI，新的 UKPRN: {}", raw, hei.ukprn);
    } else {
        info!("更新 UKPRN {} 的 HEI", hei.ukprn);
    }

    let hei = state.heis.upsert(hei).await?;
    Ok(Json(MessageResponse::new(format!(
        "HEI with UKPRN {} updated successfully",
        hei.ukprn
    ))))
}

/// PATCH /hei/{ukprn}，只更新請求中出現的欄位
pub async fn patch_hei(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = body?;

    let ukprn = parse_id(&raw).ok_or_else(|| not_found(&raw))?;
    let Some(mut hei) = state.heis.get(ukprn).await? else {
        error!("找不到 UKPRN {}", ukprn);
        return Err(not_found(&raw));
    };

    HeiPayload::from_json(body)
        .and_then(|payload| payload.apply_to(&mut hei))
        .map_err(|e| validation_failed("部分更新", e))?;

    if hei.ukprn != ukprn {
        info!("更新 UKPRN {} 的 HEI，新的 UKPRN: {}", ukprn, hei.ukprn);
    }

    let updated = state
        .heis
        .update(ukprn, hei)
        .await?
        .ok_or_else(|| not_found(&raw))?;

    Ok(Json(MessageResponse::new(format!(
        "HEI with UKPRN {} updated successfully",
        updated.ukprn
    ))))
}
