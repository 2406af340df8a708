use crate::pipeline::{CycleOutcome, IngestPipeline};
use chrono::{DateTime, NaiveTime, Utc};
use minato_core::common::TimeProvider;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

/// 轮询粒度。调度只承诺"当天该时刻整体触发一次"，30 秒内的相位误差可以接受。
const TICK_INTERVAL: Duration = Duration::from_secs(30);

/// # Summary
/// 调度器错误类型。
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Invalid trigger time: {0}")]
    InvalidTrigger(String),
}

/// # Summary
/// 每日固定触发时刻 (UTC)。
///
/// # Invariants
/// - 构造时校验时分合法性，非法输入无法产生实例。
/// - `next_after` 返回的时刻严格晚于传入时刻，绝不返回当下或过去。
#[derive(Debug, Clone, Copy)]
pub struct DailyTrigger {
    at: NaiveTime,
}

impl DailyTrigger {
    /// # Summary
    /// 以时、分构造每日触发点。
    ///
    /// # Arguments
    /// * `hour` - 0..=23。
    /// * `minute` - 0..=59。
    ///
    /// # Returns
    /// 合法返回触发点实例，越界返回 `SchedulerError::InvalidTrigger`。
    pub fn new(hour: u32, minute: u32) -> Result<Self, SchedulerError> {
        let at = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| SchedulerError::InvalidTrigger(format!("{:02}:{:02}", hour, minute)))?;
        Ok(Self { at })
    }

    /// # Summary
    /// 计算严格晚于 `now` 的下一次触发时刻。
    ///
    /// # Logic
    /// 1. 取 `now` 当天的触发时刻。
    /// 2. 若它已不在未来，顺延到次日同一时刻。
    ///
    /// # Arguments
    /// * `now` - 当前时刻。
    ///
    /// # Returns
    /// 下一次触发时刻 (UTC)。
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive().and_time(self.at).and_utc();
        if today > now {
            today
        } else {
            today + chrono::Duration::days(1)
        }
    }
}

/// 调度器生命周期状态
enum SchedulerState {
    Stopped,
    Running {
        // 向工作循环广播停止信号
        shutdown: watch::Sender<bool>,
    },
}

/// # Summary
/// 日度采集调度器，显式 Running/Stopped 状态机。
///
/// # Logic
/// 工作循环以固定粒度轮询注入的时钟，到达触发点后在循环内串行执行一轮采集，
/// 完成后以完成时刻重算下一触发点。
///
/// # Invariants
/// - 任一时刻至多一轮采集在途：周期在循环体内被 await，天然互斥。
/// - 某轮跑过了下一个触发点时，该触发点被跳过（顺延），绝不并发补跑。
/// - `start`/`stop` 幂等：重复调用记 warn 并忽略。
/// - `stop` 只发信号不强杀：在途周期跑完、循环退出，不再有新周期。
pub struct IngestScheduler {
    // 采集管线
    pipeline: Arc<IngestPipeline>,
    // 注入的时钟,测试用虚拟时钟驱动
    clock: Arc<dyn TimeProvider>,
    // 每日触发点
    trigger: DailyTrigger,
    // 生命周期状态
    state: Mutex<SchedulerState>,
}

impl IngestScheduler {
    /// # Summary
    /// 创建 IngestScheduler 实例。
    ///
    /// # Arguments
    /// * `pipeline` - 采集管线。
    /// * `clock` - 时间供给器。
    /// * `trigger` - 每日触发点。
    ///
    /// # Returns
    /// * `Arc<Self>` - 可共享的调度器句柄，启动与停止都通过同一句柄完成。
    pub fn new(
        pipeline: Arc<IngestPipeline>,
        clock: Arc<dyn TimeProvider>,
        trigger: DailyTrigger,
    ) -> Arc<Self> {
        Arc::new(Self {
            pipeline,
            clock,
            trigger,
            state: Mutex::new(SchedulerState::Stopped),
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, SchedulerState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// 当前是否处于 Running 状态
    pub fn is_running(&self) -> bool {
        matches!(*self.lock_state(), SchedulerState::Running { .. })
    }

    /// # Summary
    /// 启动调度器。
    ///
    /// # Logic
    /// 1. 已在 Running 状态时记 warn 并直接返回。
    /// 2. 建立停止信号通道，spawn 工作循环。
    /// 3. 循环内每个轮询周期比较时钟与下一触发点，到点则串行执行一轮采集。
    ///
    /// # Returns
    /// * None
    pub fn start(&self) {
        let mut state = self.lock_state();
        if let SchedulerState::Running { .. } = *state {
            warn!("ingest scheduler already running, start ignored");
            return;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let pipeline = self.pipeline.clone();
        let clock = self.clock.clone();
        let trigger = self.trigger;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(TICK_INTERVAL);
            let mut next_run = trigger.next_after(clock.now());
            info!("ingest scheduler started, first run at {}", next_run);

            loop {
                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        // 收到停止信号或发送端消失都退出循环
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        if clock.now() >= next_run {
                            let outcome = pipeline.run_cycle().await;
                            if let CycleOutcome::Aborted = outcome {
                                warn!("ingest cycle aborted, daily cadence continues");
                            }
                            // 以完成时刻重算:跑过头的触发点被跳过而不是补跑
                            next_run = trigger.next_after(clock.now());
                            info!("next ingest run at {}", next_run);
                        }
                    }
                }
            }

            info!("ingest scheduler loop exited");
        });

        *state = SchedulerState::Running {
            shutdown: shutdown_tx,
        };
    }

    /// # Summary
    /// 停止调度器。
    ///
    /// # Logic
    /// 1. 未在 Running 状态时记 warn 并直接返回。
    /// 2. 发送停止信号并立即切回 Stopped，不等待在途周期。
    ///
    /// # Returns
    /// * None
    pub fn stop(&self) {
        let mut state = self.lock_state();
        match std::mem::replace(&mut *state, SchedulerState::Stopped) {
            SchedulerState::Running { shutdown } => {
                shutdown.send(true).ok();
                info!("ingest scheduler stop signalled");
            }
            SchedulerState::Stopped => {
                warn!("ingest scheduler not running, stop ignored");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_next_after_same_day() {
        let trigger = DailyTrigger::new(12, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let next = trigger.next_after(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_next_after_rolls_to_tomorrow() {
        let trigger = DailyTrigger::new(12, 0).unwrap();

        // 已过触发点
        let after = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 1).unwrap();
        assert_eq!(
            trigger.next_after(after),
            Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap()
        );

        // 恰好等于触发点也必须顺延,保证严格晚于
        let exact = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            trigger.next_after(exact),
            Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_invalid_trigger_rejected() {
        assert!(DailyTrigger::new(24, 0).is_err());
        assert!(DailyTrigger::new(12, 60).is_err());
        assert!(DailyTrigger::new(23, 59).is_ok());
    }
}
