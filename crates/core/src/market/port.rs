use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 行情数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 一次调用对应一次对外请求，不做重试、分页或退避。
/// - 返回原始 JSON 元素列表，逐条校验留给上层采集管线完成。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 拉取一批行情记录的原始 JSON 表示。
    ///
    /// # Logic
    /// 1. 向配置的数据源端点发起一次请求。
    /// 2. 校验响应状态码。
    /// 3. 将响应体解析为 JSON 数组并原样返回。
    ///
    /// # Returns
    /// 成功返回 JSON 元素列表，网络或解析失败返回 `MarketError`。
    async fn fetch_batch(&self) -> Result<Vec<serde_json::Value>, MarketError>;
}
