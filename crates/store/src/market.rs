use async_trait::async_trait;
use chrono::NaiveDate;
use minato_core::market::entity::MarketRecord;
use minato_core::store::error::StoreError;
use minato_core::store::port::MarketRecordStore;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::fs;

/// 默认行情数据库存储路径
const DEFAULT_MARKET_DB: &str = "market.db";

/// MarketRecordStore 的 SQLite 实现。
///
/// # Summary
/// 在独立的 SQLite 数据库 (`market.db`) 中保存每日采集的第三方行情记录，
/// 主键为外部数据源提供的字符串 ID。
///
/// # Invariants
/// * 写入走 `INSERT OR REPLACE`：同一 ID 重复写入时整行被最新内容覆盖。
/// * 采集任务与只读查询可能并发访问，连接开启 WAL 与忙等超时。
pub struct SqliteMarketStore {
    pool: SqlitePool,
}

impl SqliteMarketStore {
    /// 创建新的 SqliteMarketStore 并初始化行情表。
    ///
    /// # Logic
    /// 1. 获取配置的数据根目录并确保其存在。
    /// 2. 配置 SQLite 连接选项：`create_if_missing` + WAL + busy_timeout。
    /// 3. 连接到数据库并执行 DDL 初始化表结构。
    ///
    /// # Returns
    /// * `Result<Self, StoreError>` - 存储实例 or 数据库错误。
    pub async fn new() -> Result<Self, StoreError> {
        let root = crate::config::get_root_dir();
        fs::create_dir_all(&root).map_err(|e| StoreError::Database(e.to_string()))?;

        let db_path = root.join(DEFAULT_MARKET_DB);

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        // group 是 SQLite 保留字,列名使用 group_label
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS market_records (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                group_label TEXT NOT NULL,
                date DATE NOT NULL,
                value INTEGER NOT NULL
            );
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl MarketRecordStore for SqliteMarketStore {
    /// # Summary
    /// 写入或覆盖一条行情记录。
    ///
    /// # Logic
    /// 在 `market_records` 表上执行 `INSERT OR REPLACE`，以外部 ID 为主键。
    ///
    /// # Arguments
    /// * `record` - 待写入的行情记录。
    ///
    /// # Returns
    /// * `Result<(), StoreError>`
    async fn upsert_record(&self, record: &MarketRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT OR REPLACE INTO market_records (id, name, group_label, date, value) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.group)
        .bind(record.date)
        .bind(record.value)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    /// # Summary
    /// 按外部 ID 读取单条行情记录。
    ///
    /// # Logic
    /// 查询 `market_records` 表。
    ///
    /// # Arguments
    /// * `id` - 外部数据源主键。
    ///
    /// # Returns
    /// * `Result<Option<MarketRecord>, StoreError>` - 匹配的记录或 None。
    async fn get_record(&self, id: &str) -> Result<Option<MarketRecord>, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String, NaiveDate, i64)>(
            "SELECT id, name, group_label, date, value FROM market_records WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(row.map(|r| MarketRecord {
            id: r.0,
            name: r.1,
            group: r.2,
            date: r.3,
            value: r.4,
        }))
    }

    /// 按外部 ID 升序列出全部行情记录。
    async fn list_records(&self) -> Result<Vec<MarketRecord>, StoreError> {
        let rows = sqlx::query_as::<_, (String, String, String, NaiveDate, i64)>(
            "SELECT id, name, group_label, date, value FROM market_records ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| MarketRecord {
                id: r.0,
                name: r.1,
                group: r.2,
                date: r.3,
                value: r.4,
            })
            .collect())
    }
}
