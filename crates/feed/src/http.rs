use async_trait::async_trait;
use minato_core::market::error::MarketError;
use minato_core::market::port::MarketDataProvider;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// 单次请求超时。挂死的连接不能拖住下一次采集周期。
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// # Summary
/// 基于 HTTP 的行情数据提供者实现，对接返回 JSON 数组的第三方数据源。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - 一次 `fetch_batch` 对应一次 GET 请求，无重试、无分页、无退避。
#[derive(Clone)]
pub struct HttpMarketProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// 数据源端点完整 URL
    endpoint: String,
}

impl HttpMarketProvider {
    /// # Summary
    /// 创建一个新的 HttpMarketProvider 实例。
    ///
    /// # Logic
    /// 1. 配置请求超时。
    /// 2. 初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `endpoint`: 数据源端点 URL。
    ///
    /// # Returns
    /// 成功返回初始化后的提供者，客户端构建失败返回 `MarketError`。
    pub fn new(endpoint: String) -> Result<Self, MarketError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| MarketError::Unknown(e.to_string()))?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl MarketDataProvider for HttpMarketProvider {
    /// # Summary
    /// 从数据源拉取一批行情记录的原始 JSON。
    ///
    /// # Logic
    /// 1. 对配置的端点发起一次 GET 请求。
    /// 2. 非 2xx 状态码映射为 `Network` 错误。
    /// 3. 响应体必须是 JSON 数组，否则映射为 `Parse` 错误。
    ///
    /// # Returns
    /// 成功返回 JSON 元素列表，失败返回 MarketError。
    async fn fetch_batch(&self) -> Result<Vec<serde_json::Value>, MarketError> {
        debug!("fetching market batch from {}", self.endpoint);

        let resp = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        resp.json::<Vec<serde_json::Value>>()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))
    }
}
