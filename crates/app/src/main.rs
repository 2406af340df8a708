use std::path::PathBuf;
use std::sync::Arc;

use minato_api::server::{start_server, AppState};
use minato_core::common::RealTimeProvider;
use minato_core::config::AppConfig;
use minato_feed::http::HttpMarketProvider;
use minato_ingest::pipeline::IngestPipeline;
use minato_ingest::scheduler::{DailyTrigger, IngestScheduler};
use minato_store::dataset::SqliteDatasetStore;
use minato_store::market::SqliteMarketStore;
use minato_store::system::SqliteSystemStore;
use tracing::info;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责加载配置、实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 API 层与采集调度器。
///
/// # Logic
/// 1. 初始化全局日志。
/// 2. 加载配置（minato.toml 可缺省 + MINATO_ 前缀环境变量，后者优先）。
/// 3. 实例化基础设施层（Store、Feed）。
/// 4. 组装采集管线与日度调度器并启动。
/// 5. 启动 HTTP 服务，挂起等待外部退出信号。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    info!("Minato starting...");

    // 2. 加载配置。JWT 密钥等敏感项由这里注入,代码中不存在生产密钥
    let app_config: AppConfig = config::Config::builder()
        .add_source(config::File::with_name("minato").required(false))
        .add_source(config::Environment::with_prefix("MINATO").separator("__"))
        .build()?
        .try_deserialize()?;
    let app_config = Arc::new(app_config);

    // 3. 实例化基础设施层
    minato_store::config::set_root_dir(PathBuf::from(&app_config.database.data_dir));
    let system_store = Arc::new(SqliteSystemStore::new().await?);
    let dataset_store = Arc::new(SqliteDatasetStore::new().await?);
    let market_store = Arc::new(SqliteMarketStore::new().await?);

    // 4. 组装采集管线与日度调度器
    let provider = Arc::new(HttpMarketProvider::new(app_config.ingest.source_url.clone())?);
    let pipeline = Arc::new(IngestPipeline::new(provider, market_store));
    let trigger = DailyTrigger::new(
        app_config.ingest.trigger_hour,
        app_config.ingest.trigger_minute,
    )?;
    let scheduler = IngestScheduler::new(pipeline, Arc::new(RealTimeProvider), trigger);
    scheduler.start();

    // 5. 启动 HTTP 服务
    let state = AppState {
        system_store,
        dataset_store,
        app_config: app_config.clone(),
    };
    let bind_addr = format!("{}:{}", app_config.server.host, app_config.server.port);

    tokio::select! {
        result = start_server(state, &bind_addr) => {
            if let Err(e) = result {
                tracing::error!("API server exited with error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting...");
        }
    }

    // 只发停止信号,在途的采集周期跑完后循环自行退出
    scheduler.stop();

    Ok(())
}
