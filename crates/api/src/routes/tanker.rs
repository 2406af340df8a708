//! # 油轮数据路由控制器
//!
//! `/api/v1/tanker-data` 下的 CRUD 接口。
//! 对应路由组在 `server.rs` 中被 `auth_middleware` 与 `require_tanker_viewer` 双层保护,
//! 仅 `viewer_tanker` 角色可访问——admin 也会被精确匹配拒之门外。

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::server::AppState;
use crate::types::{
    ApiResponse, CreateTankerRequest, TankerRecordResponse, UpdateTankerRequest,
};
use minato_core::store::port::{NewTankerRecord, TankerRecordUpdate};

/// 新增油轮记录
#[utoipa::path(
    post,
    path = "/api/v1/tanker-data",
    tag = "油轮数据 (Tanker)",
    security(("bearer_jwt" = [])),
    request_body = CreateTankerRequest,
    responses(
        (status = 200, description = "创建成功", body = ApiResponse<TankerRecordResponse>),
        (status = 401, description = "未认证"),
        (status = 403, description = "角色不匹配")
    )
)]
pub async fn create_tanker(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateTankerRequest>,
) -> Result<Json<ApiResponse<TankerRecordResponse>>, ApiError> {
    let record = state
        .dataset_store
        .create_tanker(&NewTankerRecord::from(req))
        .await?;

    tracing::info!("User {} created tanker record {}", user.username, record.id);
    Ok(Json(ApiResponse::ok(TankerRecordResponse::from(&record))))
}

/// 列出全部油轮记录
#[utoipa::path(
    get,
    path = "/api/v1/tanker-data",
    tag = "油轮数据 (Tanker)",
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "列表获取成功", body = ApiResponse<Vec<TankerRecordResponse>>),
        (status = 401, description = "未认证"),
        (status = 403, description = "角色不匹配")
    )
)]
pub async fn list_tankers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TankerRecordResponse>>>, ApiError> {
    let records = state.dataset_store.list_tankers().await?;

    let responses: Vec<TankerRecordResponse> =
        records.iter().map(TankerRecordResponse::from).collect();

    Ok(Json(ApiResponse::ok(responses)))
}

/// 更新油轮记录 (稀疏合并)
///
/// 请求体中缺席的字段保持原值,目标不存在返回 404。
#[utoipa::path(
    put,
    path = "/api/v1/tanker-data/{id}",
    tag = "油轮数据 (Tanker)",
    security(("bearer_jwt" = [])),
    params(
        ("id" = i64, Path, description = "记录主键")
    ),
    request_body = UpdateTankerRequest,
    responses(
        (status = 200, description = "更新成功", body = ApiResponse<TankerRecordResponse>),
        (status = 404, description = "记录不存在"),
        (status = 401, description = "未认证"),
        (status = 403, description = "角色不匹配")
    )
)]
pub async fn update_tanker(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTankerRequest>,
) -> Result<Json<ApiResponse<TankerRecordResponse>>, ApiError> {
    let record = state
        .dataset_store
        .update_tanker(id, &TankerRecordUpdate::from(req))
        .await?;

    Ok(Json(ApiResponse::ok(TankerRecordResponse::from(&record))))
}

/// 删除油轮记录
///
/// 返回被删除的记录实体,目标不存在返回 404。
#[utoipa::path(
    delete,
    path = "/api/v1/tanker-data/{id}",
    tag = "油轮数据 (Tanker)",
    security(("bearer_jwt" = [])),
    params(
        ("id" = i64, Path, description = "记录主键")
    ),
    responses(
        (status = 200, description = "删除成功", body = ApiResponse<TankerRecordResponse>),
        (status = 404, description = "记录不存在"),
        (status = 401, description = "未认证"),
        (status = 403, description = "角色不匹配")
    )
)]
pub async fn delete_tanker(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<TankerRecordResponse>>, ApiError> {
    let record = state.dataset_store.delete_tanker(id).await?;

    tracing::info!("User {} deleted tanker record {}", user.username, id);
    Ok(Json(ApiResponse::ok(TankerRecordResponse::from(&record))))
}
