use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// # Summary
/// 第三方行情记录实体，每日定时采集的单条数据。
///
/// # Invariants
/// - `id` 由外部数据源分配，系统内部绝不自行生成。
/// - 同一 `id` 再次采集时，整条记录被最新内容覆盖。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRecord {
    // 外部数据源主键
    pub id: String,
    // 指标名称 (例如: Brent)
    pub name: String,
    // 指标分组 (例如: oil)
    pub group: String,
    // 数据所属日期
    pub date: NaiveDate,
    // 指标数值
    pub value: i64,
}
