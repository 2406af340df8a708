use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ingest: IngestConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
}

/// 第三方行情采集配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    // 数据源地址，返回 JSON 数组
    pub source_url: String,
    // 每日触发时刻 (UTC)
    pub trigger_hour: u32,
    pub trigger_minute: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub data_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "YOUR_SUPER_SECRET_KEY".to_string(), // Default for dev, should be overwritten by config
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            source_url: "http://localhost:9000/data".to_string(),
            trigger_hour: 12,
            trigger_minute: 0,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}
