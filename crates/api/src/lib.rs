//! # `minato-api` - HTTP API 网关
//!
//! 本 crate 是 Minato 航运数据平台的 HTTP/REST 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收来自浏览器或脚本客户端的 HTTP 请求
//! - 执行 JWT 鉴权与精确角色匹配后分发至各数据域路由组
//! - 调用下层 `SystemStore` / `DatasetStore` 完成业务操作
//! - 将领域模型转换为 DTO 返回给前端

pub mod types;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
