use minato_core::market::entity::MarketRecord;
use minato_core::market::port::MarketDataProvider;
use minato_core::store::port::MarketRecordStore;
use std::sync::Arc;
use tracing::{error, info, warn};

/// # Summary
/// 一轮采集的统计报告。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    // 数据源返回的元素总数
    pub fetched: usize,
    // 成功落库的记录数
    pub stored: usize,
    // 形状不合法被拒绝的元素数
    pub rejected: usize,
    // 落库失败的记录数
    pub failed: usize,
}

/// # Summary
/// 一轮采集的结果。
///
/// # Invariants
/// - `Aborted` 表示拉取阶段失败，本轮没有任何写入。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 拉取成功，批次已逐条处理
    Completed(CycleReport),
    /// 拉取失败，未写入任何数据
    Aborted,
}

/// # Summary
/// 采集管线，应用服务层门面。
/// 编译期仅依赖 `minato-core` 中的 trait 定义，具体实现通过构造函数注入。
///
/// # Invariants
/// - 拉取失败绝不向调用方传播错误：记录日志并返回 `Aborted`，
///   日度节奏由调度器独立维持。
/// - 批内逐条隔离：单条非法数据或单条落库失败只影响该条记录。
pub struct IngestPipeline {
    // 行情数据源接口
    provider: Arc<dyn MarketDataProvider>,
    // 行情记录持久化接口
    store: Arc<dyn MarketRecordStore>,
}

impl IngestPipeline {
    /// # Summary
    /// 创建 IngestPipeline 实例。
    ///
    /// # Arguments
    /// * `provider` - 行情数据源的具体实现。
    /// * `store` - 行情记录存储的具体实现。
    ///
    /// # Returns
    /// * `Self` - 管线实例。
    pub fn new(provider: Arc<dyn MarketDataProvider>, store: Arc<dyn MarketRecordStore>) -> Self {
        Self { provider, store }
    }

    /// # Summary
    /// 执行一轮完整采集。
    ///
    /// # Logic
    /// 1. 通过 provider 拉取一批原始 JSON 元素，失败则记日志返回 `Aborted`。
    /// 2. 逐条反序列化为 `MarketRecord`，形状不合法的记 warn 并跳过。
    /// 3. 合法记录按外部 ID 幂等落库，落库失败的记 warn 并跳过。
    /// 4. 汇总本轮统计并输出 info 日志。
    ///
    /// # Returns
    /// * `CycleOutcome` - 本轮结果与统计。
    pub async fn run_cycle(&self) -> CycleOutcome {
        let batch = match self.provider.fetch_batch().await {
            Ok(batch) => batch,
            Err(e) => {
                error!("market fetch failed, cycle aborted: {}", e);
                return CycleOutcome::Aborted;
            }
        };

        let fetched = batch.len();
        let mut stored = 0usize;
        let mut rejected = 0usize;
        let mut failed = 0usize;

        for item in batch {
            // 逐条边界:坏数据只废弃自己这一条
            let record = match serde_json::from_value::<MarketRecord>(item) {
                Ok(record) => record,
                Err(e) => {
                    warn!("rejecting malformed market item: {}", e);
                    rejected += 1;
                    continue;
                }
            };

            match self.store.upsert_record(&record).await {
                Ok(()) => stored += 1,
                Err(e) => {
                    warn!("failed to store market record {}: {}", record.id, e);
                    failed += 1;
                }
            }
        }

        info!(
            "market data ingested: fetched={} stored={} rejected={} failed={}",
            fetched, stored, rejected, failed
        );

        CycleOutcome::Completed(CycleReport {
            fetched,
            stored,
            rejected,
            failed,
        })
    }
}
