//! # `minato-feed` - 第三方行情数据接入
//!
//! 本 crate 实现 `minato-core` 的 `MarketDataProvider` 端口：
//! 对配置的 HTTP 端点发起一次 GET 请求，将返回的 JSON 数组原样交给上层。
//! 逐条校验与落库由 `minato-ingest` 的采集管线负责。

pub mod http;
