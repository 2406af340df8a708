use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use minato_core::common::{FakeClockProvider, TimeProvider};
use minato_core::market::entity::MarketRecord;
use minato_core::market::error::MarketError;
use minato_core::market::port::MarketDataProvider;
use minato_core::store::error::StoreError;
use minato_core::store::port::MarketRecordStore;
use minato_ingest::pipeline::IngestPipeline;
use minato_ingest::scheduler::{DailyTrigger, IngestScheduler};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 记录拉取次数的桩数据源,每次成功返回一条合法记录
struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl MarketDataProvider for CountingProvider {
    async fn fetch_batch(&self) -> Result<Vec<serde_json::Value>, MarketError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![json!({
            "id": "A1", "name": "Brent", "group": "oil",
            "date": "2024-01-01", "value": 80
        })])
    }
}

/// 记录拉取次数但永远失败的桩数据源
struct CountingFailingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl MarketDataProvider for CountingFailingProvider {
    async fn fetch_batch(&self) -> Result<Vec<serde_json::Value>, MarketError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(MarketError::Network("upstream down".to_string()))
    }
}

/// 丢弃一切写入的空存储,调度测试只关心触发次数
struct NullRecordStore;

#[async_trait]
impl MarketRecordStore for NullRecordStore {
    async fn upsert_record(&self, _record: &MarketRecord) -> Result<(), StoreError> {
        Ok(())
    }

    async fn get_record(&self, _id: &str) -> Result<Option<MarketRecord>, StoreError> {
        Ok(None)
    }

    async fn list_records(&self) -> Result<Vec<MarketRecord>, StoreError> {
        Ok(Vec::new())
    }
}

/// 虚拟时钟按分钟推进,每步让出足够的虚拟时长保证工作循环至少轮询一次。
async fn advance_minutes(clock: &FakeClockProvider, now: &mut DateTime<Utc>, minutes: i64) {
    for _ in 0..minutes {
        *now += chrono::Duration::minutes(1);
        clock.set_time(*now);
        tokio::time::sleep(Duration::from_secs(60)).await;
    }
}

/// # Summary
/// 日度节律:跨过触发点执行一次,当天不再重复,次日再次执行,停止后不再执行。
///
/// # Logic
/// 1. 11:58 启动,触发点 12:00,到点前零执行。
/// 2. 跨过 12:00 恰好执行一次,当天之后的轮询不再触发。
/// 3. 直接把时钟拨到次日 11:58(仍在下一触发点之前),跨过 12:00 后第二次执行。
/// 4. stop 之后第三天中午不再有任何执行。
#[tokio::test(start_paused = true)]
async fn test_daily_cadence_across_days() {
    let provider = Arc::new(CountingProvider {
        calls: AtomicUsize::new(0),
    });
    let pipeline = Arc::new(IngestPipeline::new(provider.clone(), Arc::new(NullRecordStore)));

    let mut now = Utc.with_ymd_and_hms(2024, 3, 1, 11, 58, 0).unwrap();
    let clock = Arc::new(FakeClockProvider::new(now));
    let trigger = DailyTrigger::new(12, 0).unwrap();
    let scheduler = IngestScheduler::new(pipeline, clock.clone(), trigger);

    // 1. 启动后、触发点前:零执行
    scheduler.start();
    assert!(scheduler.is_running());
    advance_minutes(&clock, &mut now, 1).await; // 11:59
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

    // 2. 跨过 12:00:恰好一次
    advance_minutes(&clock, &mut now, 3).await; // 12:02
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    // 3. 当天继续轮询半小时:不再触发
    advance_minutes(&clock, &mut now, 30).await; // 12:32
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    // 4. 拨到次日触发点之前,跨过后第二次执行
    now = Utc.with_ymd_and_hms(2024, 3, 2, 11, 58, 0).unwrap();
    clock.set_time(now);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    advance_minutes(&clock, &mut now, 3).await; // 次日 12:01
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

    // 5. 停止后第三天中午静默
    scheduler.stop();
    assert!(!scheduler.is_running());
    now = Utc.with_ymd_and_hms(2024, 3, 3, 11, 59, 0).unwrap();
    clock.set_time(now);
    tokio::time::sleep(Duration::from_secs(60)).await;
    advance_minutes(&clock, &mut now, 3).await; // 第三天 12:02
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

/// # Summary
/// start/stop 幂等:重复 start 不产生第二个工作循环,重复 stop 不 panic。
#[tokio::test(start_paused = true)]
async fn test_start_and_stop_are_idempotent() {
    let provider = Arc::new(CountingProvider {
        calls: AtomicUsize::new(0),
    });
    let pipeline = Arc::new(IngestPipeline::new(provider.clone(), Arc::new(NullRecordStore)));

    let mut now = Utc.with_ymd_and_hms(2024, 3, 1, 11, 59, 0).unwrap();
    let clock = Arc::new(FakeClockProvider::new(now));
    let scheduler = IngestScheduler::new(pipeline, clock.clone(), DailyTrigger::new(12, 0).unwrap());

    // 重复启动:第二次应被忽略
    scheduler.start();
    scheduler.start();
    assert!(scheduler.is_running());

    // 若存在第二个循环,跨点时会执行两次
    advance_minutes(&clock, &mut now, 3).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    // 重复停止:第二次应被忽略
    scheduler.stop();
    scheduler.stop();
    assert!(!scheduler.is_running());
}

/// # Summary
/// 某天采集失败不打断日度节律:次日仍按时再次尝试。
#[tokio::test(start_paused = true)]
async fn test_failed_cycle_keeps_daily_cadence() {
    let provider = Arc::new(CountingFailingProvider {
        calls: AtomicUsize::new(0),
    });
    let pipeline = Arc::new(IngestPipeline::new(provider.clone(), Arc::new(NullRecordStore)));

    let mut now = Utc.with_ymd_and_hms(2024, 3, 1, 11, 59, 0).unwrap();
    let clock = Arc::new(FakeClockProvider::new(now));
    let scheduler = IngestScheduler::new(pipeline, clock.clone(), DailyTrigger::new(12, 0).unwrap());
    scheduler.start();

    // 第一天:失败的尝试同样只发生一次
    advance_minutes(&clock, &mut now, 3).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    // 第二天:节律不受前一天失败影响
    now = Utc.with_ymd_and_hms(2024, 3, 2, 11, 59, 0).unwrap();
    clock.set_time(now);
    tokio::time::sleep(Duration::from_secs(60)).await;
    advance_minutes(&clock, &mut now, 3).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

    scheduler.stop();
}

/// 拉取耗时跨过了次日触发点的慢数据源:完成时把虚拟时钟一并拨过去
struct SlowProvider {
    clock: Arc<FakeClockProvider>,
    calls: AtomicUsize,
}

#[async_trait]
impl MarketDataProvider for SlowProvider {
    async fn fetch_batch(&self) -> Result<Vec<serde_json::Value>, MarketError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(26 * 3600)).await;
        self.clock
            .set_time(self.clock.now() + chrono::Duration::hours(26));
        Ok(Vec::new())
    }
}

/// # Summary
/// 在途周期跑过了下一个触发点:该触发点被跳过,不并发、不补跑。
///
/// # Logic
/// 1. 第一轮在 D1 12:00 触发,耗时 26 小时,完成时已是 D2 14:00。
/// 2. D2 12:00 的触发点因此被跳过:D2 当晚不再执行。
/// 3. 下一轮顺延到 D3 12:00。
#[tokio::test(start_paused = true)]
async fn test_long_cycle_skips_missed_trigger() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 11, 59, 0).unwrap();
    let clock = Arc::new(FakeClockProvider::new(now));
    let provider = Arc::new(SlowProvider {
        clock: clock.clone(),
        calls: AtomicUsize::new(0),
    });
    let pipeline = Arc::new(IngestPipeline::new(provider.clone(), Arc::new(NullRecordStore)));
    let scheduler = IngestScheduler::new(pipeline, clock.clone(), DailyTrigger::new(12, 0).unwrap());
    scheduler.start();

    // 1. 跨过 D1 12:00,第一轮进入在途状态
    clock.set_time(Utc.with_ymd_and_hms(2024, 3, 1, 12, 1, 0).unwrap());
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    // 2. 放完在途周期的全部虚拟耗时,完成时时钟已是 D2 14:00 左右
    tokio::time::sleep(Duration::from_secs(27 * 3600)).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1, "在途期间不得并发启动新周期");

    // 3. D2 晚间仍然静默:被跳过的 D2 12:00 不补跑
    clock.set_time(Utc.with_ymd_and_hms(2024, 3, 2, 23, 0, 0).unwrap());
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    // 4. D3 12:00 照常触发
    clock.set_time(Utc.with_ymd_and_hms(2024, 3, 3, 11, 59, 0).unwrap());
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    clock.set_time(Utc.with_ymd_and_hms(2024, 3, 3, 12, 1, 0).unwrap());
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

    scheduler.stop();
}
