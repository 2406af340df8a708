//! # HTTP 中间件层

pub mod auth;
