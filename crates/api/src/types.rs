//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为面向前端 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use minato_core::store::port::{
    AdminRecord, AdminRecordUpdate, DryBulkRecord, DryBulkRecordUpdate, NewAdminRecord,
    NewDryBulkRecord, NewTankerRecord, TankerRecord, TankerRecordUpdate, User, UserPage,
};

// ============================================================
//  鉴权 DTO
// ============================================================

/// 登录请求体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// 用户名
    #[schema(example = "admin")]
    pub username: String,
    /// 密码
    #[schema(example = "password123")]
    pub password: String,
}

/// 登录成功返回的 Token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// JWT Bearer Token
    #[schema(example = "eyJhbGciOiJIUzI1NiIs...")]
    pub token: String,
    /// Token 过期时间 (秒)
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// JWT Claims 内容 (内部使用，不暴露到 Swagger)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户名
    pub sub: String,
    /// 颁发时刻的角色快照，授权判定以存储中的账户行为准
    pub role: String,
    /// Token 过期时间 (Unix 时间戳)
    pub exp: i64,
}

// ============================================================
//  用户管理 DTO
// ============================================================

/// 创建新账户请求体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// 登录名，全局唯一
    #[schema(example = "tanker_ops")]
    pub username: String,
    /// 新账户密码
    #[schema(example = "P@ssw0rd!")]
    pub password: String,
    /// 角色 (admin / viewer_tanker / viewer_dry_bulk)
    #[schema(example = "viewer_tanker")]
    pub role: String,
}

/// 账户基础信息响应 DTO，绝不携带密码哈希
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// 账户主键
    #[schema(example = 1)]
    pub id: i64,
    /// 登录名
    #[schema(example = "admin")]
    pub username: String,
    /// 角色
    #[schema(example = "admin")]
    pub role: String,
    /// 注册时间
    #[schema(example = "2026-03-01T00:00:00Z")]
    pub created_at: String,
}

/// 分页账户列表响应 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    /// 本页账户
    pub users: Vec<UserResponse>,
    /// 全表总数 (非本页数量)
    #[schema(example = 42)]
    pub total: i64,
}

// ============================================================
//  油轮数据 DTO
// ============================================================

/// 油轮记录响应 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TankerRecordResponse {
    /// 记录主键
    #[schema(example = 1)]
    pub id: i64,
    /// 船名
    #[schema(example = "Pacific Glory")]
    pub name: String,
    /// 载重容量
    #[schema(example = 120000.0)]
    pub capacity: f64,
    /// 船型
    #[schema(example = "VLCC")]
    pub vessel_type: String,
}

/// 新增油轮记录请求体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTankerRequest {
    /// 船名
    #[schema(example = "Pacific Glory")]
    pub name: String,
    /// 载重容量
    #[schema(example = 120000.0)]
    pub capacity: f64,
    /// 船型
    #[schema(example = "VLCC")]
    pub vessel_type: String,
}

/// 更新油轮记录请求体，缺席的字段保持原值
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateTankerRequest {
    /// 船名
    #[schema(example = "Pacific Glory II")]
    pub name: Option<String>,
    /// 载重容量
    #[schema(example = 130000.0)]
    pub capacity: Option<f64>,
    /// 船型
    #[schema(example = "Suezmax")]
    pub vessel_type: Option<String>,
}

// ============================================================
//  干散货数据 DTO
// ============================================================

/// 干散货记录响应 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DryBulkRecordResponse {
    /// 记录主键
    #[schema(example = 1)]
    pub id: i64,
    /// 船名
    #[schema(example = "Iron Duke")]
    pub name: String,
    /// 载货重量
    #[schema(example = 85000.0)]
    pub weight: f64,
    /// 货物类型
    #[schema(example = "iron_ore")]
    pub cargo_type: String,
}

/// 新增干散货记录请求体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDryBulkRequest {
    /// 船名
    #[schema(example = "Iron Duke")]
    pub name: String,
    /// 载货重量
    #[schema(example = 85000.0)]
    pub weight: f64,
    /// 货物类型
    #[schema(example = "iron_ore")]
    pub cargo_type: String,
}

/// 更新干散货记录请求体，缺席的字段保持原值
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateDryBulkRequest {
    /// 船名
    pub name: Option<String>,
    /// 载货重量
    pub weight: Option<f64>,
    /// 货物类型
    pub cargo_type: Option<String>,
}

// ============================================================
//  管理数据 DTO
// ============================================================

/// 管理记录响应 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminRecordResponse {
    /// 记录主键
    #[schema(example = 1)]
    pub id: i64,
    /// 维护人名称
    #[schema(example = "ops")]
    pub admin_name: String,
    /// 数据内容
    #[schema(example = "quarterly fleet audit")]
    pub data: String,
}

/// 新增管理记录请求体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAdminRecordRequest {
    /// 维护人名称
    #[schema(example = "ops")]
    pub admin_name: String,
    /// 数据内容
    #[schema(example = "quarterly fleet audit")]
    pub data: String,
}

/// 更新管理记录请求体，缺席的字段保持原值
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateAdminRecordRequest {
    /// 维护人名称
    pub admin_name: Option<String>,
    /// 数据内容
    pub data: Option<String>,
}

// ============================================================
//  通用响应 DTO
// ============================================================

/// 统一 API 响应包装器
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T: Serialize + ToSchema> {
    /// 是否成功
    pub success: bool,
    /// 数据载荷 (成功时)
    pub data: Option<T>,
    /// 错误信息 (失败时)
    pub error: Option<String>,
}

impl<T: Serialize + ToSchema> ApiResponse<T> {
    /// 构建成功响应
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// 构建失败响应 (不含泛型载荷)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub success: bool,
    /// 错误描述信息
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}

// ============================================================
//  领域模型 ↔ DTO 惯用转换 (impl From<T>)
// ============================================================

impl From<&User> for UserResponse {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            role: u.role.to_string(),
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

impl From<UserPage> for UserListResponse {
    fn from(page: UserPage) -> Self {
        Self {
            users: page.users.iter().map(UserResponse::from).collect(),
            total: page.total,
        }
    }
}

impl From<&TankerRecord> for TankerRecordResponse {
    fn from(r: &TankerRecord) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            capacity: r.capacity,
            vessel_type: r.vessel_type.clone(),
        }
    }
}

impl From<CreateTankerRequest> for NewTankerRecord {
    fn from(req: CreateTankerRequest) -> Self {
        Self {
            name: req.name,
            capacity: req.capacity,
            vessel_type: req.vessel_type,
        }
    }
}

impl From<UpdateTankerRequest> for TankerRecordUpdate {
    fn from(req: UpdateTankerRequest) -> Self {
        Self {
            name: req.name,
            capacity: req.capacity,
            vessel_type: req.vessel_type,
        }
    }
}

impl From<&DryBulkRecord> for DryBulkRecordResponse {
    fn from(r: &DryBulkRecord) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            weight: r.weight,
            cargo_type: r.cargo_type.clone(),
        }
    }
}

impl From<CreateDryBulkRequest> for NewDryBulkRecord {
    fn from(req: CreateDryBulkRequest) -> Self {
        Self {
            name: req.name,
            weight: req.weight,
            cargo_type: req.cargo_type,
        }
    }
}

impl From<UpdateDryBulkRequest> for DryBulkRecordUpdate {
    fn from(req: UpdateDryBulkRequest) -> Self {
        Self {
            name: req.name,
            weight: req.weight,
            cargo_type: req.cargo_type,
        }
    }
}

impl From<&AdminRecord> for AdminRecordResponse {
    fn from(r: &AdminRecord) -> Self {
        Self {
            id: r.id,
            admin_name: r.admin_name.clone(),
            data: r.data.clone(),
        }
    }
}

impl From<CreateAdminRecordRequest> for NewAdminRecord {
    fn from(req: CreateAdminRecordRequest) -> Self {
        Self {
            admin_name: req.admin_name,
            data: req.data,
        }
    }
}

impl From<UpdateAdminRecordRequest> for AdminRecordUpdate {
    fn from(req: UpdateAdminRecordRequest) -> Self {
        Self {
            admin_name: req.admin_name,
            data: req.data,
        }
    }
}
