use axum::{Json, Router, http::StatusCode, routing::get};
use minato_core::market::error::MarketError;
use minato_core::market::port::MarketDataProvider;
use minato_feed::http::HttpMarketProvider;
use std::net::SocketAddr;

/// 安装进程级默认加密后端 (ring)。reqwest 以 rustls-no-provider 编译，
/// 构建客户端前进程内必须已有默认 provider；并发测试下重复安装返回 Err，忽略即可。
fn install_crypto_provider() {
    rustls::crypto::ring::default_provider().install_default().ok();
}

/// 在随机端口上拉起一个本地桩数据源，返回其监听地址。
async fn spawn_stub(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Failed to get local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// # Summary
/// 正常路径：数据源返回 JSON 数组时原样透传每个元素。
///
/// # Logic
/// 1. 桩端点返回两条记录的数组。
/// 2. 断言 fetch_batch 成功且元素数量与内容一致。
#[tokio::test]
async fn test_fetch_batch_success() {
    install_crypto_provider();
    let router = Router::new().route(
        "/data",
        get(|| async {
            Json(serde_json::json!([
                {"id": "A1", "name": "Brent", "group": "oil", "date": "2024-01-01", "value": 80},
                {"id": "B2", "name": "WTI", "group": "oil", "date": "2024-01-01", "value": 76}
            ]))
        }),
    );
    let addr = spawn_stub(router).await;

    let provider = HttpMarketProvider::new(format!("http://{}/data", addr))
        .expect("Failed to build provider");
    let batch = provider.fetch_batch().await.expect("fetch should succeed");

    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0]["id"], "A1");
    assert_eq!(batch[1]["value"], 76);
}

/// # Summary
/// 非 2xx 状态码必须映射为 Network 错误，且不产出任何数据。
#[tokio::test]
async fn test_fetch_batch_http_error() {
    install_crypto_provider();
    let router = Router::new().route(
        "/data",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = spawn_stub(router).await;

    let provider = HttpMarketProvider::new(format!("http://{}/data", addr))
        .expect("Failed to build provider");
    let result = provider.fetch_batch().await;

    match result {
        Err(MarketError::Network(msg)) => assert!(msg.contains("HTTP 500"), "unexpected: {}", msg),
        other => panic!("expected Network error, got {:?}", other.map(|v| v.len())),
    }
}

/// # Summary
/// 响应体不是 JSON 数组时必须映射为 Parse 错误。
#[tokio::test]
async fn test_fetch_batch_not_an_array() {
    install_crypto_provider();
    let router = Router::new().route(
        "/data",
        get(|| async { Json(serde_json::json!({"items": []})) }),
    );
    let addr = spawn_stub(router).await;

    let provider = HttpMarketProvider::new(format!("http://{}/data", addr))
        .expect("Failed to build provider");
    let result = provider.fetch_batch().await;

    assert!(matches!(result, Err(MarketError::Parse(_))));
}
