// tests/scheduler_tests.rs
mod common;

use common::{check, GatedProber, RecordingAlerts, ScriptedProber};
use endpoint_monitor::config::SchedulerConfig;
use endpoint_monitor::registry::InMemoryRegistry;
use endpoint_monitor::scheduler::{CycleScheduler, SchedulerError};
use std::sync::Arc;
use std::time::Duration;

fn config(interval_secs: u64, run_on_start: bool) -> SchedulerConfig {
    SchedulerConfig {
        interval_secs,
        max_concurrency: 4,
        run_on_start,
    }
}

#[tokio::test(start_paused = true)]
async fn test_runs_immediately_then_every_period() {
    let prober = Arc::new(ScriptedProber::default());
    let scheduler = CycleScheduler::builder(config(60, true))
        .registry(Arc::new(InMemoryRegistry::new(vec![check("c-1", "a.test/")])))
        .prober(prober.clone())
        .alerts(Arc::new(RecordingAlerts::default()))
        .build()
        .unwrap();

    assert!(scheduler.start().await);
    assert!(!scheduler.start().await);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(prober.calls(), 1);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(prober.calls(), 2);

    scheduler.stop().await;
    assert!(!scheduler.is_running().await);
}

#[tokio::test(start_paused = true)]
async fn test_first_cycle_waits_when_not_run_on_start() {
    let prober = Arc::new(ScriptedProber::default());
    let scheduler = CycleScheduler::builder(config(30, false))
        .registry(Arc::new(InMemoryRegistry::new(vec![check("c-1", "a.test/")])))
        .prober(prober.clone())
        .alerts(Arc::new(RecordingAlerts::default()))
        .build()
        .unwrap();

    scheduler.start().await;
    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(prober.calls(), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(prober.calls(), 1);
    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_ticks_during_a_running_cycle_are_skipped() {
    let prober = Arc::new(GatedProber::default());
    let scheduler = CycleScheduler::builder(config(1, true))
        .registry(Arc::new(InMemoryRegistry::new(vec![
            check("c-1", "a.test/"),
            check("c-2", "b.test/"),
        ])))
        .prober(prober.clone())
        .alerts(Arc::new(RecordingAlerts::default()))
        .build()
        .unwrap();

    scheduler.start().await;
    tokio::time::sleep(Duration::from_millis(3500)).await;

    // One cycle in flight, no second cycle started.
    assert_eq!(prober.calls(), 2);
    assert!(scheduler.stats().cycles_skipped >= 3);
    assert_eq!(scheduler.stats().cycles_completed, 0);

    prober.release();
    scheduler.wait_idle().await;
    assert_eq!(scheduler.stats().cycles_completed, 1);
    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_no_cycle_starts_after_stop() {
    let prober = Arc::new(ScriptedProber::default());
    let scheduler = CycleScheduler::builder(config(10, true))
        .registry(Arc::new(InMemoryRegistry::new(vec![check("c-1", "a.test/")])))
        .prober(prober.clone())
        .alerts(Arc::new(RecordingAlerts::default()))
        .build()
        .unwrap();

    scheduler.start().await;
    tokio::time::sleep(Duration::from_secs(15)).await;
    let calls = prober.calls();
    assert_eq!(calls, 2);

    scheduler.stop().await;
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(prober.calls(), calls);

    // Direct triggers still work while stopped.
    scheduler.trigger_cycle().await;
    assert_eq!(prober.calls(), calls + 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_leaves_in_flight_cycle_running() {
    let prober = Arc::new(GatedProber::default());
    let scheduler = CycleScheduler::builder(config(60, true))
        .registry(Arc::new(InMemoryRegistry::new(vec![check("c-1", "a.test/")])))
        .prober(prober.clone())
        .alerts(Arc::new(RecordingAlerts::default()))
        .build()
        .unwrap();

    scheduler.start().await;
    while prober.calls() == 0 {
        tokio::task::yield_now().await;
    }

    scheduler.stop().await;
    assert_eq!(scheduler.stats().cycles_completed, 0);

    prober.release();
    scheduler.wait_idle().await;
    assert_eq!(scheduler.stats().cycles_completed, 1);
}

#[test]
fn test_builder_rejects_zero_interval() {
    let result = CycleScheduler::builder(config(0, true))
        .registry(Arc::new(InMemoryRegistry::default()))
        .prober(Arc::new(ScriptedProber::default()))
        .alerts(Arc::new(RecordingAlerts::default()))
        .build();
    assert!(matches!(result, Err(SchedulerError::ZeroInterval)));
}

#[test]
fn test_builder_rejects_concurrency_out_of_range() {
    for max_concurrency in [0, usize::MAX] {
        let result = CycleScheduler::builder(SchedulerConfig {
            interval_secs: 60,
            max_concurrency,
            run_on_start: true,
        })
        .registry(Arc::new(InMemoryRegistry::default()))
        .prober(Arc::new(ScriptedProber::default()))
        .alerts(Arc::new(RecordingAlerts::default()))
        .build();
        assert!(matches!(
            result,
            Err(SchedulerError::ConcurrencyOutOfRange(n)) if n == max_concurrency
        ));
    }
}
