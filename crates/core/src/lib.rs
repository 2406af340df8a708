//! # `minato-core` - 领域内核
//!
//! 本 crate 是 Minato 航运商品数据后台的领域内核，只包含实体、端口 (trait)
//! 与错误类型，不依赖任何具体的数据库、HTTP 框架或调度器实现。
//!
//! ## 架构职责
//! - 定义账户 / 角色 / 数据集记录 / 行情记录等核心实体
//! - 以 trait 形式声明存储端口与外部行情源端口，供上层依赖注入
//! - 提供可注入的时间供给器，使定时任务可以在虚拟时钟下测试
//! - 承载全局应用配置结构

pub mod common;
pub mod config;
pub mod market;
pub mod store;
