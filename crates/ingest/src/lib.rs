//! # `minato-ingest` - 每日行情采集
//!
//! 本 crate 将 `minato-feed` 的数据源端口与 `minato-store` 的行情存储端口
//! 串成采集管线，并提供固定时刻触发的日度调度器。
//!
//! ## 架构职责
//! - `pipeline`: 一轮采集 = 一次拉取 + 逐条校验 + 幂等落库，单条坏数据不拖垮整批
//! - `scheduler`: 显式 Running/Stopped 状态机，轮询比较注入时钟与下一触发点，
//!   周期串行执行，停止时在途周期跑完不被打断

pub mod pipeline;
pub mod scheduler;
