//! # 账户管理路由控制器
//!
//! 账户的创建、查询、分页列表与删除。创建账户是系统引导路径
//! (首个 admin 账户必须能在没有任何 Token 的情况下建立),因此本组端点不挂鉴权。

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiResponse, CreateUserRequest, UserListResponse, UserResponse};
use minato_core::store::port::{NewUser, Role};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ListUsersQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// 创建新账户
///
/// 解析角色、bcrypt 哈希密码后写入存储。用户名重复返回 400。
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "账户 (Users)",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "账户创建成功", body = ApiResponse<UserResponse>),
        (status = 400, description = "角色非法或用户名已被占用")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    tracing::info!("Received create_user request for username: {}", req.username);

    // 1. 预检用户名占用
    let existing = state
        .system_store
        .get_user_by_username(&req.username)
        .await
        .map_err(|e| ApiError::Internal(format!("DB check failed: {}", e)))?;

    if existing.is_some() {
        tracing::warn!("Username {} already exists", req.username);
        return Err(ApiError::BadRequest("Username already registered".into()));
    }

    // 2. 角色解析与密码安全哈希
    let role = req.role.parse::<Role>().map_err(ApiError::BadRequest)?;

    let hashed_pwd = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
        .map_err(|_| ApiError::Internal("Failed to hash new user password".into()))?;

    // 3. 写入存储。预检之后的并发撞名由唯一索引兜底 (Conflict → 400)
    let new_user = NewUser {
        username: req.username,
        password_hash: hashed_pwd,
        role,
    };
    let user = state.system_store.create_user(&new_user).await?;

    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}

/// 分页列出账户
///
/// `total` 为全表总数,客户端用它翻页。
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "账户 (Users)",
    params(
        ("skip" = Option<i64>, Query, description = "跳过的记录数，默认 0"),
        ("limit" = Option<i64>, Query, description = "返回数量上限，默认 10")
    ),
    responses(
        (status = 200, description = "账户列表获取成功", body = ApiResponse<UserListResponse>)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ApiResponse<UserListResponse>>, ApiError> {
    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(10);

    let page = state.system_store.list_users(skip, limit).await?;

    Ok(Json(ApiResponse::ok(UserListResponse::from(page))))
}

/// 获取指定账户
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "账户 (Users)",
    params(
        ("id" = i64, Path, description = "账户主键")
    ),
    responses(
        (status = 200, description = "账户获取成功", body = ApiResponse<UserResponse>),
        (status = 404, description = "账户不存在")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state
        .system_store
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}

/// 删除账户
///
/// 返回被删除的账户实体。该账户已签发的 Token 随之失效
/// (鉴权中间件按存储中的账户行校验)。
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "账户 (Users)",
    params(
        ("id" = i64, Path, description = "账户主键")
    ),
    responses(
        (status = 200, description = "账户删除成功", body = ApiResponse<UserResponse>),
        (status = 404, description = "账户不存在")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.system_store.delete_user(id).await?;

    tracing::info!("User {} deleted", user.username);

    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}
