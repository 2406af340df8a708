//! # 干散货数据路由控制器
//!
//! `/api/v1/dry-bulk-data` 下的 CRUD 接口,仅 `viewer_dry_bulk` 角色可访问。

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::server::AppState;
use crate::types::{
    ApiResponse, CreateDryBulkRequest, DryBulkRecordResponse, UpdateDryBulkRequest,
};
use minato_core::store::port::{DryBulkRecordUpdate, NewDryBulkRecord};

/// 新增干散货记录
#[utoipa::path(
    post,
    path = "/api/v1/dry-bulk-data",
    tag = "干散货数据 (DryBulk)",
    security(("bearer_jwt" = [])),
    request_body = CreateDryBulkRequest,
    responses(
        (status = 200, description = "创建成功", body = ApiResponse<DryBulkRecordResponse>),
        (status = 401, description = "未认证"),
        (status = 403, description = "角色不匹配")
    )
)]
pub async fn create_dry_bulk(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateDryBulkRequest>,
) -> Result<Json<ApiResponse<DryBulkRecordResponse>>, ApiError> {
    let record = state
        .dataset_store
        .create_dry_bulk(&NewDryBulkRecord::from(req))
        .await?;

    tracing::info!(
        "User {} created dry bulk record {}",
        user.username,
        record.id
    );
    Ok(Json(ApiResponse::ok(DryBulkRecordResponse::from(&record))))
}

/// 列出全部干散货记录
#[utoipa::path(
    get,
    path = "/api/v1/dry-bulk-data",
    tag = "干散货数据 (DryBulk)",
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "列表获取成功", body = ApiResponse<Vec<DryBulkRecordResponse>>),
        (status = 401, description = "未认证"),
        (status = 403, description = "角色不匹配")
    )
)]
pub async fn list_dry_bulk(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DryBulkRecordResponse>>>, ApiError> {
    let records = state.dataset_store.list_dry_bulk().await?;

    let responses: Vec<DryBulkRecordResponse> =
        records.iter().map(DryBulkRecordResponse::from).collect();

    Ok(Json(ApiResponse::ok(responses)))
}

/// 更新干散货记录 (稀疏合并)
#[utoipa::path(
    put,
    path = "/api/v1/dry-bulk-data/{id}",
    tag = "干散货数据 (DryBulk)",
    security(("bearer_jwt" = [])),
    params(
        ("id" = i64, Path, description = "记录主键")
    ),
    request_body = UpdateDryBulkRequest,
    responses(
        (status = 200, description = "更新成功", body = ApiResponse<DryBulkRecordResponse>),
        (status = 404, description = "记录不存在"),
        (status = 401, description = "未认证"),
        (status = 403, description = "角色不匹配")
    )
)]
pub async fn update_dry_bulk(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDryBulkRequest>,
) -> Result<Json<ApiResponse<DryBulkRecordResponse>>, ApiError> {
    let record = state
        .dataset_store
        .update_dry_bulk(id, &DryBulkRecordUpdate::from(req))
        .await?;

    Ok(Json(ApiResponse::ok(DryBulkRecordResponse::from(&record))))
}

/// 删除干散货记录
#[utoipa::path(
    delete,
    path = "/api/v1/dry-bulk-data/{id}",
    tag = "干散货数据 (DryBulk)",
    security(("bearer_jwt" = [])),
    params(
        ("id" = i64, Path, description = "记录主键")
    ),
    responses(
        (status = 200, description = "删除成功", body = ApiResponse<DryBulkRecordResponse>),
        (status = 404, description = "记录不存在"),
        (status = 401, description = "未认证"),
        (status = 403, description = "角色不匹配")
    )
)]
pub async fn delete_dry_bulk(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DryBulkRecordResponse>>, ApiError> {
    let record = state.dataset_store.delete_dry_bulk(id).await?;

    tracing::info!("User {} deleted dry bulk record {}", user.username, id);
    Ok(Json(ApiResponse::ok(DryBulkRecordResponse::from(&record))))
}
