//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use minato_core::config::AppConfig;
use minato_core::store::port::{DatasetStore, SystemStore};

use crate::routes::{admin_data, auth, dry_bulk, tanker, users};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - 各存储句柄在服务启动前由 DI 容器注入，生命周期与进程等同。
/// - `app_config` 是 JWT 密钥的唯一来源，鉴权路径上不存在任何硬编码密钥。
#[derive(Clone)]
pub struct AppState {
    /// 系统数据访问接口 (用于鉴权验证和账户管理)
    pub system_store: Arc<dyn SystemStore>,
    /// 业务数据集访问接口 (油轮 / 干散货 / 管理数据)
    pub dataset_store: Arc<dyn DatasetStore>,
    /// 应用配置 (JWT 密钥等)
    pub app_config: Arc<AppConfig>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Minato 航运数据平台 API",
        version = "0.1.0",
        description = "Minato 航运数据平台的 RESTful API 网关。提供账户管理、油轮/干散货/管理数据的角色化访问能力。",
        contact(name = "Minato Team"),
        license(name = "MIT")
    ),
    tags(
        (name = "鉴权 (Auth)", description = "JWT 获取与登录认证相关API"),
        (name = "账户 (Users)", description = "账户创建、查询、分页列表与删除"),
        (name = "油轮数据 (Tanker)", description = "油轮数据集 CRUD，仅 viewer_tanker 角色"),
        (name = "干散货数据 (DryBulk)", description = "干散货数据集 CRUD，仅 viewer_dry_bulk 角色"),
        (name = "管理数据 (AdminData)", description = "管理数据集 CRUD，仅 admin 角色")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// 为 OpenAPI 文档注入全局 Bearer JWT 鉴权方案。
///
/// 注册后，Swagger UI 页面顶部将显示 🔒 Authorize 按钮，
/// 用户可以填入 JWT Token 后对所有标记了 `security` 的接口进行鉴权测试。
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        // 若 components 不存在则创建
        let components = openapi.components.get_or_insert_with(Default::default);

        // 注册名为 "bearer_jwt" 的 HTTP Bearer 鉴权方案
        components.add_security_scheme(
            "bearer_jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "在此处填入登录接口返回的 JWT Token（无需 'Bearer ' 前缀）",
                    ))
                    .build(),
            ),
        );
    }
}

// ============================================================
//  服务构建与启动
// ============================================================

/// 组装完整的 axum 应用路由树。
///
/// 拆出来是为了让集成测试可以在自选端口上直接挂载同一棵路由树。
///
/// # Logic
/// 1. 公开路由组:登录与账户管理 (账户创建是引导路径,不能要求 Token)。
/// 2. 三个数据域各自成组,先挂角色精确匹配层,再挂 JWT 鉴权层。
///    axum 的 layer 后加者先执行,因此请求先过鉴权、再过角色匹配。
/// 3. 合并为一棵树,附带自动收集的 OpenAPI 文档与 Swagger UI。
pub fn build_app(state: AppState) -> Router {
    // 1. 无需鉴权的公开路由
    let public_router = OpenApiRouter::new()
        .routes(routes!(auth::login))
        .routes(routes!(users::create_user))
        .routes(routes!(users::list_users))
        .routes(routes!(users::get_user))
        .routes(routes!(users::delete_user));

    // 2. 仅 viewer_tanker 角色可访问的油轮数据路由
    let tanker_router = OpenApiRouter::new()
        .routes(routes!(tanker::create_tanker))
        .routes(routes!(tanker::list_tankers))
        .routes(routes!(tanker::update_tanker))
        .routes(routes!(tanker::delete_tanker))
        .layer(axum::middleware::from_fn(
            crate::middleware::auth::require_tanker_viewer,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::auth_middleware,
        ));

    // 3. 仅 viewer_dry_bulk 角色可访问的干散货数据路由
    let dry_bulk_router = OpenApiRouter::new()
        .routes(routes!(dry_bulk::create_dry_bulk))
        .routes(routes!(dry_bulk::list_dry_bulk))
        .routes(routes!(dry_bulk::update_dry_bulk))
        .routes(routes!(dry_bulk::delete_dry_bulk))
        .layer(axum::middleware::from_fn(
            crate::middleware::auth::require_dry_bulk_viewer,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::auth_middleware,
        ));

    // 4. 仅 admin 角色可访问的管理数据路由
    let admin_data_router = OpenApiRouter::new()
        .routes(routes!(admin_data::create_admin_record))
        .routes(routes!(admin_data::list_admin_records))
        .routes(routes!(admin_data::update_admin_record))
        .routes(routes!(admin_data::delete_admin_record))
        .layer(axum::middleware::from_fn(
            crate::middleware::auth::require_admin,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::auth_middleware,
        ));

    // 5. 合并所有路由与自动收集的 OpenAPI Doc
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(public_router)
        .merge(tanker_router)
        .merge(dry_bulk_router)
        .merge(admin_data_router)
        .with_state(state)
        .split_for_parts();

    // 6. 配置 CORS (开发阶段允许所有来源)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 7. 合并 Swagger UI 路由并应用中间件
    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
}

/// 绑定 TCP 端口并对外提供服务。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:8080"`
pub async fn start_server(
    state: AppState,
    bind_addr: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_app(state);

    tracing::info!("🚀 Minato API Server listening on {}", bind_addr);
    tracing::info!("📖 Swagger UI: http://{}/swagger-ui/", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
