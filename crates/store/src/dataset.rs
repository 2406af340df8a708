use async_trait::async_trait;
use minato_core::store::error::StoreError;
use minato_core::store::port::{
    AdminRecord, AdminRecordUpdate, DatasetStore, DryBulkRecord, DryBulkRecordUpdate,
    NewAdminRecord, NewDryBulkRecord, NewTankerRecord, TankerRecord, TankerRecordUpdate,
};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::fs;

/// 默认数据集数据库存储路径
const DEFAULT_DATASET_DB: &str = "datasets.db";

/// DatasetStore 的 SQLite 实现。
///
/// # Summary
/// 在单个 SQLite 数据库 (`datasets.db`) 中管理油轮、干散货与管理数据三个数据集，
/// 每个数据集一张独立的表、独立的自增主键。
///
/// # Invariants
/// * 稀疏更新在事务中完成：读出原行、合并补丁、整行写回。
/// * 更新与删除在目标行不存在时返回 `NotFound`，不做静默新建。
pub struct SqliteDatasetStore {
    pool: SqlitePool,
}

impl SqliteDatasetStore {
    /// 创建新的 SqliteDatasetStore 并初始化三张数据集表。
    ///
    /// # Logic
    /// 1. 获取配置的数据根目录并确保其存在。
    /// 2. 配置 SQLite 连接选项，开启 `create_if_missing`。
    /// 3. 连接到数据库并执行 DDL 初始化表结构。
    ///
    /// # Returns
    /// * `Result<Self, StoreError>` - 存储实例 or 数据库错误。
    pub async fn new() -> Result<Self, StoreError> {
        let root = crate::config::get_root_dir();
        fs::create_dir_all(&root).map_err(|e| StoreError::Database(e.to_string()))?;

        let db_path = root.join(DEFAULT_DATASET_DB);

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        // 初始化三张数据集表
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tanker_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                capacity REAL NOT NULL,
                vessel_type TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS dry_bulk_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                weight REAL NOT NULL,
                cargo_type TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS admin_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                admin_name TEXT NOT NULL,
                data TEXT NOT NULL
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
impl DatasetStore for SqliteDatasetStore {
    // --- 油轮域 ---

    /// # Summary
    /// 插入油轮记录。
    ///
    /// # Logic
    /// INSERT 后以 `last_insert_rowid` 组装完整实体返回。
    ///
    /// # Arguments
    /// * `record` - 待插入的记录输入。
    ///
    /// # Returns
    /// * `Result<TankerRecord, StoreError>` - 带主键的完整实体。
    async fn create_tanker(&self, record: &NewTankerRecord) -> Result<TankerRecord, StoreError> {
        let result = sqlx::query(
            "INSERT INTO tanker_records (name, capacity, vessel_type) VALUES (?, ?, ?)",
        )
        .bind(&record.name)
        .bind(record.capacity)
        .bind(&record.vessel_type)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(TankerRecord {
            id: result.last_insert_rowid(),
            name: record.name.clone(),
            capacity: record.capacity,
            vessel_type: record.vessel_type.clone(),
        })
    }

    /// 按主键升序列出全部油轮记录。
    async fn list_tankers(&self) -> Result<Vec<TankerRecord>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, String, f64, String)>(
            "SELECT id, name, capacity, vessel_type FROM tanker_records ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| TankerRecord {
                id: r.0,
                name: r.1,
                capacity: r.2,
                vessel_type: r.3,
            })
            .collect())
    }

    /// # Summary
    /// 稀疏更新油轮记录。
    ///
    /// # Logic
    /// 1. 在事务中读出目标行，不存在返回 `NotFound`。
    /// 2. 补丁中为 `Some` 的字段覆盖原值，其余字段保持。
    /// 3. 整行写回并提交。
    ///
    /// # Arguments
    /// * `id` - 目标记录主键。
    /// * `patch` - 稀疏更新补丁。
    ///
    /// # Returns
    /// * `Result<TankerRecord, StoreError>` - 更新后的完整实体。
    async fn update_tanker(
        &self,
        id: i64,
        patch: &TankerRecordUpdate,
    ) -> Result<TankerRecord, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let row = sqlx::query_as::<_, (String, f64, String)>(
            "SELECT name, capacity, vessel_type FROM tanker_records WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?
        .ok_or(StoreError::NotFound)?;

        let merged = TankerRecord {
            id,
            name: patch.name.clone().unwrap_or(row.0),
            capacity: patch.capacity.unwrap_or(row.1),
            vessel_type: patch.vessel_type.clone().unwrap_or(row.2),
        };

        sqlx::query("UPDATE tanker_records SET name = ?, capacity = ?, vessel_type = ? WHERE id = ?")
            .bind(&merged.name)
            .bind(merged.capacity)
            .bind(&merged.vessel_type)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(merged)
    }

    /// # Summary
    /// 删除油轮记录并返回被删实体。
    ///
    /// # Logic
    /// 在事务中先读后删，目标不存在返回 `NotFound`。
    ///
    /// # Arguments
    /// * `id` - 目标记录主键。
    ///
    /// # Returns
    /// * `Result<TankerRecord, StoreError>` - 被删除的实体。
    async fn delete_tanker(&self, id: i64) -> Result<TankerRecord, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let row = sqlx::query_as::<_, (i64, String, f64, String)>(
            "SELECT id, name, capacity, vessel_type FROM tanker_records WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?
        .ok_or(StoreError::NotFound)?;

        sqlx::query("DELETE FROM tanker_records WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(TankerRecord {
            id: row.0,
            name: row.1,
            capacity: row.2,
            vessel_type: row.3,
        })
    }

    // --- 干散货域 ---

    /// 插入干散货记录，逻辑与油轮域一致。
    async fn create_dry_bulk(
        &self,
        record: &NewDryBulkRecord,
    ) -> Result<DryBulkRecord, StoreError> {
        let result = sqlx::query(
            "INSERT INTO dry_bulk_records (name, weight, cargo_type) VALUES (?, ?, ?)",
        )
        .bind(&record.name)
        .bind(record.weight)
        .bind(&record.cargo_type)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(DryBulkRecord {
            id: result.last_insert_rowid(),
            name: record.name.clone(),
            weight: record.weight,
            cargo_type: record.cargo_type.clone(),
        })
    }

    /// 按主键升序列出全部干散货记录。
    async fn list_dry_bulk(&self) -> Result<Vec<DryBulkRecord>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, String, f64, String)>(
            "SELECT id, name, weight, cargo_type FROM dry_bulk_records ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| DryBulkRecord {
                id: r.0,
                name: r.1,
                weight: r.2,
                cargo_type: r.3,
            })
            .collect())
    }

    /// 稀疏更新干散货记录，合并语义与油轮域一致。
    async fn update_dry_bulk(
        &self,
        id: i64,
        patch: &DryBulkRecordUpdate,
    ) -> Result<DryBulkRecord, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let row = sqlx::query_as::<_, (String, f64, String)>(
            "SELECT name, weight, cargo_type FROM dry_bulk_records WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?
        .ok_or(StoreError::NotFound)?;

        let merged = DryBulkRecord {
            id,
            name: patch.name.clone().unwrap_or(row.0),
            weight: patch.weight.unwrap_or(row.1),
            cargo_type: patch.cargo_type.clone().unwrap_or(row.2),
        };

        sqlx::query("UPDATE dry_bulk_records SET name = ?, weight = ?, cargo_type = ? WHERE id = ?")
            .bind(&merged.name)
            .bind(merged.weight)
            .bind(&merged.cargo_type)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(merged)
    }

    /// 删除干散货记录并返回被删实体，不存在返回 `NotFound`。
    async fn delete_dry_bulk(&self, id: i64) -> Result<DryBulkRecord, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let row = sqlx::query_as::<_, (i64, String, f64, String)>(
            "SELECT id, name, weight, cargo_type FROM dry_bulk_records WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?
        .ok_or(StoreError::NotFound)?;

        sqlx::query("DELETE FROM dry_bulk_records WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(DryBulkRecord {
            id: row.0,
            name: row.1,
            weight: row.2,
            cargo_type: row.3,
        })
    }

    // --- 管理数据域 ---

    /// 插入管理记录，逻辑与油轮域一致。
    async fn create_admin_record(
        &self,
        record: &NewAdminRecord,
    ) -> Result<AdminRecord, StoreError> {
        let result = sqlx::query("INSERT INTO admin_records (admin_name, data) VALUES (?, ?)")
            .bind(&record.admin_name)
            .bind(&record.data)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(AdminRecord {
            id: result.last_insert_rowid(),
            admin_name: record.admin_name.clone(),
            data: record.data.clone(),
        })
    }

    /// 按主键升序列出全部管理记录。
    async fn list_admin_records(&self) -> Result<Vec<AdminRecord>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, admin_name, data FROM admin_records ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| AdminRecord {
                id: r.0,
                admin_name: r.1,
                data: r.2,
            })
            .collect())
    }

    /// 稀疏更新管理记录，合并语义与油轮域一致。
    async fn update_admin_record(
        &self,
        id: i64,
        patch: &AdminRecordUpdate,
    ) -> Result<AdminRecord, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let row = sqlx::query_as::<_, (String, String)>(
            "SELECT admin_name, data FROM admin_records WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?
        .ok_or(StoreError::NotFound)?;

        let merged = AdminRecord {
            id,
            admin_name: patch.admin_name.clone().unwrap_or(row.0),
            data: patch.data.clone().unwrap_or(row.1),
        };

        sqlx::query("UPDATE admin_records SET admin_name = ?, data = ? WHERE id = ?")
            .bind(&merged.admin_name)
            .bind(&merged.data)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(merged)
    }

    /// 删除管理记录并返回被删实体，不存在返回 `NotFound`。
    async fn delete_admin_record(&self, id: i64) -> Result<AdminRecord, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, admin_name, data FROM admin_records WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?
        .ok_or(StoreError::NotFound)?;

        sqlx::query("DELETE FROM admin_records WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(AdminRecord {
            id: row.0,
            admin_name: row.1,
            data: row.2,
        })
    }
}
