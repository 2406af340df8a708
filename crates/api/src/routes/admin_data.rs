//! # 管理数据路由控制器
//!
//! `/api/v1/admin-data` 下的 CRUD 接口,仅 `admin` 角色可访问。

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::server::AppState;
use crate::types::{
    AdminRecordResponse, ApiResponse, CreateAdminRecordRequest, UpdateAdminRecordRequest,
};
use minato_core::store::port::{AdminRecordUpdate, NewAdminRecord};

/// 新增管理记录
#[utoipa::path(
    post,
    path = "/api/v1/admin-data",
    tag = "管理数据 (AdminData)",
    security(("bearer_jwt" = [])),
    request_body = CreateAdminRecordRequest,
    responses(
        (status = 200, description = "创建成功", body = ApiResponse<AdminRecordResponse>),
        (status = 401, description = "未认证"),
        (status = 403, description = "角色不匹配")
    )
)]
pub async fn create_admin_record(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateAdminRecordRequest>,
) -> Result<Json<ApiResponse<AdminRecordResponse>>, ApiError> {
    let record = state
        .dataset_store
        .create_admin_record(&NewAdminRecord::from(req))
        .await?;

    tracing::info!("User {} created admin record {}", user.username, record.id);
    Ok(Json(ApiResponse::ok(AdminRecordResponse::from(&record))))
}

/// 列出全部管理记录
#[utoipa::path(
    get,
    path = "/api/v1/admin-data",
    tag = "管理数据 (AdminData)",
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "列表获取成功", body = ApiResponse<Vec<AdminRecordResponse>>),
        (status = 401, description = "未认证"),
        (status = 403, description = "角色不匹配")
    )
)]
pub async fn list_admin_records(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AdminRecordResponse>>>, ApiError> {
    let records = state.dataset_store.list_admin_records().await?;

    let responses: Vec<AdminRecordResponse> =
        records.iter().map(AdminRecordResponse::from).collect();

    Ok(Json(ApiResponse::ok(responses)))
}

/// 更新管理记录 (稀疏合并)
#[utoipa::path(
    put,
    path = "/api/v1/admin-data/{id}",
    tag = "管理数据 (AdminData)",
    security(("bearer_jwt" = [])),
    params(
        ("id" = i64, Path, description = "记录主键")
    ),
    request_body = UpdateAdminRecordRequest,
    responses(
        (status = 200, description = "更新成功", body = ApiResponse<AdminRecordResponse>),
        (status = 404, description = "记录不存在"),
        (status = 401, description = "未认证"),
        (status = 403, description = "角色不匹配")
    )
)]
pub async fn update_admin_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAdminRecordRequest>,
) -> Result<Json<ApiResponse<AdminRecordResponse>>, ApiError> {
    let record = state
        .dataset_store
        .update_admin_record(id, &AdminRecordUpdate::from(req))
        .await?;

    Ok(Json(ApiResponse::ok(AdminRecordResponse::from(&record))))
}

/// 删除管理记录
#[utoipa::path(
    delete,
    path = "/api/v1/admin-data/{id}",
    tag = "管理数据 (AdminData)",
    security(("bearer_jwt" = [])),
    params(
        ("id" = i64, Path, description = "记录主键")
    ),
    responses(
        (status = 200, description = "删除成功", body = ApiResponse<AdminRecordResponse>),
        (status = 404, description = "记录不存在"),
        (status = 401, description = "未认证"),
        (status = 403, description = "角色不匹配")
    )
)]
pub async fn delete_admin_record(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<AdminRecordResponse>>, ApiError> {
    let record = state.dataset_store.delete_admin_record(id).await?;

    tracing::info!("User {} deleted admin record {}", user.username, id);
    Ok(Json(ApiResponse::ok(AdminRecordResponse::from(&record))))
}
