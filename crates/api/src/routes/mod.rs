//! # 路由控制器层
//!
//! 每个子模块对应一组 REST 资源,所有 Handler 都通过 `utoipa::path` 进入 Swagger 文档。

pub mod admin_data;
pub mod auth;
pub mod dry_bulk;
pub mod tanker;
pub mod users;
