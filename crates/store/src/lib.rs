//! # `minato-store` - SQLite 持久化实现
//!
//! 本 crate 以 `sqlx` + SQLite 实现 `minato-core` 声明的三个存储端口，
//! 按职责拆分为三个独立的数据库文件：
//!
//! - `app.db`      账户 (SystemStore)
//! - `datasets.db` 油轮 / 干散货 / 管理数据集 (DatasetStore)
//! - `market.db`   每日采集的第三方行情记录 (MarketRecordStore)
//!
//! 数据根目录通过 [`config::set_root_dir`] 在进程启动时注入一次。

pub mod config;
pub mod dataset;
pub mod market;
pub mod system;
