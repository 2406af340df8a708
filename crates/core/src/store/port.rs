use super::error::StoreError;
use crate::market::entity::MarketRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 账户角色枚举，闭集。授权判定只认精确相等，不存在层级或包含关系。
///
/// # Invariants
/// - 每个账户有且仅有一个角色。
/// - `Admin` 不会自动获得查看者端点的访问权。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    // 管理数据维护者
    Admin,
    // 油轮数据查看者
    ViewerTanker,
    // 干散货数据查看者
    ViewerDryBulk,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "viewer_tanker" => Ok(Role::ViewerTanker),
            "viewer_dry_bulk" => Ok(Role::ViewerDryBulk),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::ViewerTanker => write!(f, "viewer_tanker"),
            Role::ViewerDryBulk => write!(f, "viewer_dry_bulk"),
        }
    }
}

/// # Summary
/// 账户实体，代表系统的使用者。
///
/// # Invariants
/// - `username` 必须全局唯一。
/// - 创建之后除删除外不可变，系统不提供改密或改角色入口。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    // 存储层分配的自增主键
    pub id: i64,
    // 登录名，全局唯一
    pub username: String,
    // bcrypt 密码哈希，绝不以明文出现在存储层
    pub password_hash: String,
    // 账户角色
    pub role: Role,
    // 注册时间
    pub created_at: DateTime<Utc>,
}

/// 创建账户的输入，`id` 与 `created_at` 由存储层分配。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// 分页账户列表，`total` 为全表总数而非本页数量。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: i64,
}

/// # Summary
/// 油轮数据记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankerRecord {
    // 存储层分配的自增主键
    pub id: i64,
    // 船名
    pub name: String,
    // 载重容量
    pub capacity: f64,
    // 船型
    pub vessel_type: String,
}

/// 创建油轮记录的输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTankerRecord {
    pub name: String,
    pub capacity: f64,
    pub vessel_type: String,
}

/// 油轮记录的稀疏更新补丁，`None` 字段保持原值。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TankerRecordUpdate {
    pub name: Option<String>,
    pub capacity: Option<f64>,
    pub vessel_type: Option<String>,
}

/// # Summary
/// 干散货数据记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DryBulkRecord {
    // 存储层分配的自增主键
    pub id: i64,
    // 船名
    pub name: String,
    // 载货重量
    pub weight: f64,
    // 货物类型
    pub cargo_type: String,
}

/// 创建干散货记录的输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDryBulkRecord {
    pub name: String,
    pub weight: f64,
    pub cargo_type: String,
}

/// 干散货记录的稀疏更新补丁，`None` 字段保持原值。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DryBulkRecordUpdate {
    pub name: Option<String>,
    pub weight: Option<f64>,
    pub cargo_type: Option<String>,
}

/// # Summary
/// 管理数据记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRecord {
    // 存储层分配的自增主键
    pub id: i64,
    // 维护人名称
    pub admin_name: String,
    // 数据内容
    pub data: String,
}

/// 创建管理记录的输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAdminRecord {
    pub admin_name: String,
    pub data: String,
}

/// 管理记录的稀疏更新补丁，`None` 字段保持原值。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminRecordUpdate {
    pub admin_name: Option<String>,
    pub data: Option<String>,
}

/// # Summary
/// 系统级数据存储接口，负责账户的持久化。
///
/// # Invariants
/// - `username` 唯一性由实现者在写入路径上强制。
/// - 除 `delete_user` 外不得修改既有账户行。
#[async_trait]
pub trait SystemStore: Send + Sync {
    /// # Summary
    /// 创建新账户。
    ///
    /// # Logic
    /// 1. 向 `users` 表插入记录，由数据库分配自增主键。
    /// 2. 用户名撞上唯一索引时返回 `Conflict`。
    ///
    /// # Arguments
    /// * `new_user`: 待创建的账户输入。
    ///
    /// # Returns
    /// 成功返回完整账户实体，重名返回 `StoreError::Conflict`。
    async fn create_user(&self, new_user: &NewUser) -> Result<User, StoreError>;

    /// # Summary
    /// 按主键获取账户。
    ///
    /// # Logic
    /// 根据账户 ID 查询 `users` 表。
    ///
    /// # Arguments
    /// * `id`: 账户主键。
    ///
    /// # Returns
    /// 存在返回 `Some(User)`，否则返回 `None`。
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// # Summary
    /// 按登录名获取账户，凭证校验的查询路径。
    ///
    /// # Logic
    /// 根据用户名查询 `users` 表的唯一索引。
    ///
    /// # Arguments
    /// * `username`: 登录名。
    ///
    /// # Returns
    /// 存在返回 `Some(User)`，否则返回 `None`。
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// # Summary
    /// 分页列出账户。
    ///
    /// # Logic
    /// 1. 按主键排序执行 OFFSET/LIMIT 查询。
    /// 2. 附带统计全表总数。
    ///
    /// # Arguments
    /// * `skip`: 偏移量。
    /// * `limit`: 本页上限。
    ///
    /// # Returns
    /// 返回 `UserPage`（本页账户与全表总数）。
    async fn list_users(&self, skip: i64, limit: i64) -> Result<UserPage, StoreError>;

    /// # Summary
    /// 删除账户并返回被删实体。
    ///
    /// # Logic
    /// 1. 先按主键读出整行。
    /// 2. 不存在时返回 `NotFound`，存在则删除并返回该行。
    ///
    /// # Arguments
    /// * `id`: 账户主键。
    ///
    /// # Returns
    /// 成功返回被删除的账户实体。
    async fn delete_user(&self, id: i64) -> Result<User, StoreError>;
}

/// # Summary
/// 业务数据集存储接口，覆盖油轮、干散货与管理数据三个独立命名空间。
///
/// # Invariants
/// - 三个数据集互不可见，各自使用独立的表与自增主键。
/// - 更新操作只覆盖补丁中为 `Some` 的字段，其余字段保持原值。
/// - 更新与删除在目标行不存在时返回 `NotFound`。
#[async_trait]
pub trait DatasetStore: Send + Sync {
    // --- 油轮域 ---

    /// 插入油轮记录并返回带主键的完整实体
    async fn create_tanker(&self, record: &NewTankerRecord) -> Result<TankerRecord, StoreError>;

    /// 列出全部油轮记录
    async fn list_tankers(&self) -> Result<Vec<TankerRecord>, StoreError>;

    /// # Summary
    /// 稀疏更新油轮记录。
    ///
    /// # Logic
    /// 1. 在事务中读出目标行。
    /// 2. 将补丁中为 `Some` 的字段合并进去。
    /// 3. 写回并返回更新后的实体。
    ///
    /// # Arguments
    /// * `id`: 目标记录主键。
    /// * `patch`: 稀疏更新补丁。
    ///
    /// # Returns
    /// 成功返回更新后的实体，目标不存在返回 `NotFound`。
    async fn update_tanker(
        &self,
        id: i64,
        patch: &TankerRecordUpdate,
    ) -> Result<TankerRecord, StoreError>;

    /// 删除油轮记录并返回被删实体，不存在返回 `NotFound`
    async fn delete_tanker(&self, id: i64) -> Result<TankerRecord, StoreError>;

    // --- 干散货域 ---

    /// 插入干散货记录并返回带主键的完整实体
    async fn create_dry_bulk(&self, record: &NewDryBulkRecord)
    -> Result<DryBulkRecord, StoreError>;

    /// 列出全部干散货记录
    async fn list_dry_bulk(&self) -> Result<Vec<DryBulkRecord>, StoreError>;

    /// 稀疏更新干散货记录，合并语义与油轮域一致
    async fn update_dry_bulk(
        &self,
        id: i64,
        patch: &DryBulkRecordUpdate,
    ) -> Result<DryBulkRecord, StoreError>;

    /// 删除干散货记录并返回被删实体，不存在返回 `NotFound`
    async fn delete_dry_bulk(&self, id: i64) -> Result<DryBulkRecord, StoreError>;

    // --- 管理数据域 ---

    /// 插入管理记录并返回带主键的完整实体
    async fn create_admin_record(&self, record: &NewAdminRecord)
    -> Result<AdminRecord, StoreError>;

    /// 列出全部管理记录
    async fn list_admin_records(&self) -> Result<Vec<AdminRecord>, StoreError>;

    /// 稀疏更新管理记录，合并语义与油轮域一致
    async fn update_admin_record(
        &self,
        id: i64,
        patch: &AdminRecordUpdate,
    ) -> Result<AdminRecord, StoreError>;

    /// 删除管理记录并返回被删实体，不存在返回 `NotFound`
    async fn delete_admin_record(&self, id: i64) -> Result<AdminRecord, StoreError>;
}

/// # Summary
/// 采集行情记录存储接口。
///
/// # Invariants
/// - 主键为外部数据源提供的字符串 ID。
/// - 写入必须是幂等的 upsert：同一 ID 重复写入以最新内容覆盖整行。
#[async_trait]
pub trait MarketRecordStore: Send + Sync {
    /// # Summary
    /// 写入或覆盖一条行情记录。
    ///
    /// # Logic
    /// 以外部 ID 为主键执行 Upsert，已存在时整行替换。
    ///
    /// # Arguments
    /// * `record`: 待写入的行情记录。
    ///
    /// # Returns
    /// 操作结果。
    async fn upsert_record(&self, record: &MarketRecord) -> Result<(), StoreError>;

    /// 按外部 ID 读取单条记录
    async fn get_record(&self, id: &str) -> Result<Option<MarketRecord>, StoreError>;

    /// 列出全部行情记录
    async fn list_records(&self) -> Result<Vec<MarketRecord>, StoreError>;
}
