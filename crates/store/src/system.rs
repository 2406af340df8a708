use async_trait::async_trait;
use chrono::{DateTime, Utc};
use minato_core::store::error::StoreError;
use minato_core::store::port::{NewUser, Role, SystemStore, User, UserPage};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::fs;

/// 默认系统数据库存储路径
const DEFAULT_SYSTEM_DB: &str = "app.db";

/// 账户行的原始元组形态 (role 以 TEXT 存储)
type UserRow = (i64, String, String, String, DateTime<Utc>);

fn map_user_row(row: UserRow) -> Result<User, StoreError> {
    let role = row.3.parse::<Role>().map_err(StoreError::Unknown)?;
    Ok(User {
        id: row.0,
        username: row.1,
        password_hash: row.2,
        role,
        created_at: row.4,
    })
}

/// SystemStore 的 SQLite 实现。
///
/// # Summary
/// 在中心化的 SQLite 数据库 (`app.db`) 中管理账户数据。
///
/// # Invariants
/// * 数据库结构在存储实例创建时初始化。
/// * 所有操作均通过共享的 `SqlitePool` 执行。
/// * `username` 的唯一性由数据库唯一索引强制。
pub struct SqliteSystemStore {
    pool: SqlitePool,
}

impl SqliteSystemStore {
    /// 创建新的 SqliteSystemStore 并初始化账户表结构。
    ///
    /// # Logic
    /// 1. 获取配置的数据根目录并确保其存在。
    /// 2. 配置 SQLite 连接选项，开启 `create_if_missing`。
    /// 3. 连接到数据库并执行 DDL 初始化表结构。
    ///
    /// # Arguments
    /// * None
    ///
    /// # Returns
    /// * `Result<Self, StoreError>` - 存储实例 or 数据库错误。
    pub async fn new() -> Result<Self, StoreError> {
        let root = crate::config::get_root_dir();
        fs::create_dir_all(&root).map_err(|e| StoreError::Database(e.to_string()))?;

        let db_path = root.join(DEFAULT_SYSTEM_DB);

        // 使用官方推荐的配置方式，确保自动创建数据库文件
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        // 初始化账户表
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at DATETIME NOT NULL
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
impl SystemStore for SqliteSystemStore {
    /// # Summary
    /// 创建新账户。
    ///
    /// # Logic
    /// 1. 插入 `users` 表，由 SQLite 分配自增主键。
    /// 2. 唯一索引冲突被识别并映射为 `Conflict`。
    ///
    /// # Arguments
    /// * `new_user` - 待创建的账户输入。
    ///
    /// # Returns
    /// * `Result<User, StoreError>` - 带主键的完整账户实体。
    async fn create_user(&self, new_user: &NewUser) -> Result<User, StoreError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, role, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(new_user.role.to_string())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(format!("username '{}' already exists", new_user.username))
            }
            _ => StoreError::Database(e.to_string()),
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: new_user.username.clone(),
            password_hash: new_user.password_hash.clone(),
            role: new_user.role,
            created_at,
        })
    }

    /// # Summary
    /// 根据主键获取账户。
    ///
    /// # Logic
    /// 查询 `users` 表。
    ///
    /// # Arguments
    /// * `id` - 账户主键。
    ///
    /// # Returns
    /// * `Result<Option<User>, StoreError>` - 匹配的账户或 None。
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?
        .map(map_user_row)
        .transpose()
    }

    /// # Summary
    /// 根据登录名获取账户。
    ///
    /// # Logic
    /// 通过 `username` 唯一索引查询 `users` 表。
    ///
    /// # Arguments
    /// * `username` - 登录名。
    ///
    /// # Returns
    /// * `Result<Option<User>, StoreError>` - 匹配的账户或 None。
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?
        .map(map_user_row)
        .transpose()
    }

    /// # Summary
    /// 分页列出账户。
    ///
    /// # Logic
    /// 1. 按主键升序执行 LIMIT/OFFSET 查询。
    /// 2. 再统计全表总数一并返回。
    ///
    /// # Arguments
    /// * `skip` - 偏移量。
    /// * `limit` - 本页上限。
    ///
    /// # Returns
    /// * `Result<UserPage, StoreError>` - 本页账户与全表总数。
    async fn list_users(&self, skip: i64, limit: i64) -> Result<UserPage, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role, created_at FROM users ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let users = rows
            .into_iter()
            .map(map_user_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(UserPage { users, total })
    }

    /// # Summary
    /// 删除账户并返回被删实体。
    ///
    /// # Logic
    /// 1. 在事务中先读出目标行。
    /// 2. 不存在则返回 `NotFound`。
    /// 3. 存在则删除该行并提交。
    ///
    /// # Arguments
    /// * `id` - 账户主键。
    ///
    /// # Returns
    /// * `Result<User, StoreError>` - 被删除的账户实体。
    async fn delete_user(&self, id: i64) -> Result<User, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?
        .ok_or(StoreError::NotFound)?;

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        map_user_row(row)
    }
}
