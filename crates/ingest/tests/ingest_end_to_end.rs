use axum::routing::get;
use axum::{Json, Router};
use minato_core::store::port::MarketRecordStore;
use minato_feed::http::HttpMarketProvider;
use minato_ingest::pipeline::{CycleOutcome, CycleReport, IngestPipeline};
use minato_store::market::SqliteMarketStore;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 启动一个本地桩服务:第一次请求返回首日批次,之后返回次日批次(同 ID 新值)。
async fn spawn_feed_stub() -> anyhow::Result<SocketAddr> {
    let calls = Arc::new(AtomicUsize::new(0));
    let router = Router::new().route(
        "/data",
        get(move || {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Json(json!([
                        {"id": "A1", "name": "Brent", "group": "oil", "date": "2024-01-01", "value": 80},
                        {"id": "B2", "name": "WTI", "group": "oil", "date": "2024-01-01", "value": 76},
                        // 缺字段的脏数据,应被逐条隔离
                        {"id": "C3", "name": "Gas"},
                    ]))
                } else {
                    Json(json!([
                        {"id": "A1", "name": "Brent", "group": "oil", "date": "2024-01-02", "value": 85},
                    ]))
                }
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(addr)
}

/// # Summary
/// 采集链路端到端验证:HTTP 数据源 → 采集管线 → SQLite 行情库。
///
/// # Logic
/// 1. 启动本地桩服务,并把行情库根目录指向临时目录。
/// 2. 第一轮采集:3 条原始数据中 2 条合法落库、1 条被拒。
/// 3. 第二轮采集:同一 ID 的新值覆盖旧行,总行数不变。
///
/// 注意:根目录全局只能设置一次,所以端到端场景集中在单个测试函数里。
#[tokio::test(flavor = "multi_thread")]
async fn test_ingest_end_to_end() -> anyhow::Result<()> {
    // reqwest 以 rustls-no-provider 编译,构建客户端前先安装 ring 作为进程默认加密后端
    rustls::crypto::ring::default_provider().install_default().ok();

    let temp_dir = tempfile::tempdir()?;
    minato_store::config::set_root_dir(temp_dir.path().to_path_buf());

    let addr = spawn_feed_stub().await?;
    let provider = HttpMarketProvider::new(format!("http://{}/data", addr))
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let store = Arc::new(SqliteMarketStore::new().await?);
    let pipeline = IngestPipeline::new(Arc::new(provider), store.clone());

    // --- 第一轮:首日批次 ---
    let outcome = pipeline.run_cycle().await;
    assert_eq!(
        outcome,
        CycleOutcome::Completed(CycleReport {
            fetched: 3,
            stored: 2,
            rejected: 1,
            failed: 0,
        }),
        "首轮应落库 2 条并拒绝 1 条脏数据"
    );

    let records = store.list_records().await?;
    assert_eq!(records.len(), 2);
    let brent = store
        .get_record("A1")
        .await?
        .ok_or_else(|| anyhow::anyhow!("A1 should exist after first cycle"))?;
    assert_eq!(brent.value, 80);

    // --- 第二轮:次日批次覆盖同 ID 旧值 ---
    let outcome = pipeline.run_cycle().await;
    assert_eq!(
        outcome,
        CycleOutcome::Completed(CycleReport {
            fetched: 1,
            stored: 1,
            rejected: 0,
            failed: 0,
        })
    );

    let records = store.list_records().await?;
    assert_eq!(records.len(), 2, "覆盖写不应增加总行数");
    let brent = store
        .get_record("A1")
        .await?
        .ok_or_else(|| anyhow::anyhow!("A1 should survive re-ingestion"))?;
    assert_eq!(brent.value, 85, "同 ID re-ingest 应覆盖为最新值");
    assert_eq!(brent.date, chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

    println!("ingest end-to-end workflow completed");
    Ok(())
}
