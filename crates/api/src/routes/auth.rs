//! # 身份验证路由控制器
//!
//! 实现登录颁发 JWT 的鉴权接口。

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiResponse, Claims, LoginRequest, LoginResponse};

const JWT_EXPIRES_IN: i64 = 86400; // 24 hours

/// 用户登录
///
/// 验证用户名和密码，颁发 JWT Token。
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "鉴权 (Auth)",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功", body = ApiResponse<LoginResponse>),
        (status = 401, description = "用户名或密码错误")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    // 1. 获取用户。查无此人与密码错误共用同一文案,不暴露账户存在性
    let user = state
        .system_store
        .get_user_by_username(&req.username)
        .await
        .map_err(|e| ApiError::Internal(format!("DB error: {}", e)))?;

    let user = match user {
        Some(u) => u,
        None => return Err(ApiError::Unauthorized("Invalid username or password".into())),
    };

    // 2. 验证密码
    let valid = bcrypt::verify(&req.password, &user.password_hash).unwrap_or(false);

    if !valid {
        return Err(ApiError::Unauthorized("Invalid username or password".into()));
    }

    // 3. 生成 JWT
    let exp = Utc::now().timestamp() + JWT_EXPIRES_IN;
    let claims = Claims {
        sub: user.username.clone(),
        role: user.role.to_string(),
        exp,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.app_config.server.jwt_secret.as_ref()),
    )
    .map_err(|_| ApiError::Internal("Failed to generate token".into()))?;

    tracing::info!("User {} logged in", user.username);

    Ok(Json(ApiResponse::ok(LoginResponse {
        token,
        expires_in: JWT_EXPIRES_IN,
    })))
}
