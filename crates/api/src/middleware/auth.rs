//! # 鉴权中间件
//!
//! 提供基于 JWT 的身份验证与精确角色匹配的访问控制。

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::Claims;
use minato_core::store::port::{Role, User};

/// 凭证无效时的统一对外文案。坏签名、过期、subject 查无此人共用同一句话，
/// 调用方无法借 401 文案探测某个用户名是否存在。
const INVALID_CREDENTIALS: &str = "Invalid or expired token";

/// 提取并验证 Authorization: Bearer <token>
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req.headers().get(axum::http::header::AUTHORIZATION);

    let token = match auth_header {
        Some(header_val) => {
            let s = header_val
                .to_str()
                .map_err(|_| ApiError::Unauthorized("Invalid auth header".into()))?;
            if !s.starts_with("Bearer ") {
                tracing::warn!("Invalid Bearer format");
                return Err(ApiError::Unauthorized("Invalid Bearer format".into()));
            }
            s[7..].to_string()
        }
        None => {
            tracing::warn!("Missing Authorization header");
            return Err(ApiError::Unauthorized("Missing Authorization header".into()));
        }
    };

    let claims = match verify_jwt(&token, &state.app_config.server.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("JWT verification failed");
            return Err(e);
        }
    };

    // 身份与角色以存储中的账户行为准,Token 里的 role 声明只是颁发时的快照。
    // 账户已被删除的 Token 给出与坏 Token 相同的文案。
    let user = state
        .system_store
        .get_user_by_username(&claims.sub)
        .await
        .map_err(|e| ApiError::Internal(format!("DB Error: {}", e)))?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    // 将用户信息注入 request extensions
    // 以便 downstream handlers 用 `Extension<User>` 提取
    req.extensions_mut().insert(user);
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// 角色精确匹配校验。必须在 `auth_middleware` 之后应用！
///
/// 不存在角色层级:admin 访问查看者端点同样被拒。
async fn require_role(req: Request, next: Next, required: Role) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<User>()
        .ok_or_else(|| ApiError::Unauthorized("User context not found".into()))?;

    if user.role != required {
        return Err(ApiError::Forbidden(format!("{} role required", required)));
    }

    Ok(next.run(req).await)
}

/// Admin 角色校验中间件
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    require_role(req, next, Role::Admin).await
}

/// 油轮数据查看者角色校验中间件
pub async fn require_tanker_viewer(req: Request, next: Next) -> Result<Response, ApiError> {
    require_role(req, next, Role::ViewerTanker).await
}

/// 干散货数据查看者角色校验中间件
pub async fn require_dry_bulk_viewer(req: Request, next: Next) -> Result<Response, ApiError> {
    require_role(req, next, Role::ViewerDryBulk).await
}

/// 验证 JWT 返回强类型 Claims
///
/// 必要声明为 `exp` 与 `sub`,任何签名、过期、缺声明错误一律归并为同一个 401 文案。
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::default();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map_err(|_| ApiError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    Ok(token_data.claims)
}

// 在提取器中获取当前用户的快捷方式
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Missing User Context".into()))?;
        Ok(CurrentUser(user))
    }
}
