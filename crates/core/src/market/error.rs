use thiserror::Error;

/// # Summary
/// 行情数据域错误枚举，处理网络与解析失败等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum MarketError {
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 数据解析错误，如 JSON 格式不匹配
    #[error("Parse error: {0}")]
    Parse(String),
    // 未知或未分类的错误
    #[error("Unknown error: {0}")]
    Unknown(String),
}
