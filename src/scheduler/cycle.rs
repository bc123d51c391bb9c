// src/scheduler/cycle.rs
use crate::check::{CheckId, CheckState};
use crate::evaluator::{EvaluationReport, Evaluator};
use crate::metrics::MetricsCollector;
use crate::probe::Prober;
use crate::registry::CheckRegistry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedMutexGuard, Semaphore};
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    Completed(CycleSummary),
    /// A previous cycle was still running.
    Skipped,
    /// The check list could not be fetched.
    Aborted(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub cycle_id: Uuid,
    pub checks: usize,
    pub up: usize,
    pub down: usize,
    pub alerts: usize,
    pub persist_failures: usize,
    pub task_failures: usize,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub cycles_completed: u64,
    pub cycles_skipped: u64,
    pub cycles_aborted: u64,
}

#[derive(Default)]
struct Counters {
    completed: AtomicU64,
    skipped: AtomicU64,
    aborted: AtomicU64,
}

/// Runs evaluation cycles. At most one cycle holds `running` at a time.
pub(crate) struct CycleEngine {
    registry: Arc<dyn CheckRegistry>,
    prober: Arc<dyn Prober>,
    evaluator: Arc<Evaluator>,
    limiter: Arc<Semaphore>,
    running: Arc<Mutex<()>>,
    metrics: Option<Arc<MetricsCollector>>,
    counters: Counters,
}

impl CycleEngine {
    pub(crate) fn new(
        registry: Arc<dyn CheckRegistry>,
        prober: Arc<dyn Prober>,
        evaluator: Arc<Evaluator>,
        max_concurrency: usize,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        Self {
            registry,
            prober,
            evaluator,
            limiter: Arc::new(Semaphore::new(max_concurrency)),
            running: Arc::new(Mutex::new(())),
            metrics,
            counters: Counters::default(),
        }
    }

    pub(crate) fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            cycles_completed: self.counters.completed.load(Ordering::Relaxed),
            cycles_skipped: self.counters.skipped.load(Ordering::Relaxed),
            cycles_aborted: self.counters.aborted.load(Ordering::Relaxed),
        }
    }

    /// Claims the cycle slot, or records a skip if a cycle is in flight.
    pub(crate) fn try_begin(&self) -> Option<OwnedMutexGuard<()>> {
        match self.running.clone().try_lock_owned() {
            Ok(guard) => Some(guard),
            Err(_) => {
                warn!("Previous cycle still running, skipping this tick");
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                if let Some(metrics) = &self.metrics {
                    metrics.record_cycle("skipped", None);
                }
                None
            }
        }
    }

    /// Resolves once no cycle is in flight.
    pub(crate) async fn wait_idle(&self) {
        let _guard = self.running.lock().await;
    }

    pub(crate) async fn run(self: Arc<Self>, guard: OwnedMutexGuard<()>) -> CycleReport {
        let cycle_id = Uuid::new_v4();
        let span = tracing::info_span!("cycle", id = %cycle_id);
        let report = self.run_inner(cycle_id).instrument(span).await;
        drop(guard);
        report
    }

    async fn run_inner(self: &Arc<Self>, cycle_id: Uuid) -> CycleReport {
        let start = Instant::now();

        let checks = match self.registry.list_checks().await {
            Ok(checks) => checks,
            Err(e) => {
                error!("Failed to fetch checks, aborting cycle: {}", e);
                self.counters.aborted.fetch_add(1, Ordering::Relaxed);
                if let Some(metrics) = &self.metrics {
                    metrics.record_cycle("aborted", None);
                }
                return CycleReport::Aborted(e.to_string());
            }
        };

        if checks.is_empty() {
            info!("There are no checks to perform");
        }
        if let Some(metrics) = &self.metrics {
            metrics.retain_check_states(checks.iter().map(|check| check.id.as_str()));
        }

        let mut tasks = Vec::with_capacity(checks.len());
        for check in checks {
            let engine = self.clone();
            let id = check.id.clone();
            let task = tokio::spawn(async move {
                let _permit = engine.limiter.clone().acquire_owned().await.ok();

                let probe_start = Instant::now();
                let outcome = engine.prober.probe(&check).await;
                if let Some(metrics) = &engine.metrics {
                    metrics.record_probe(&outcome, probe_start.elapsed());
                }

                engine.evaluator.apply(&check, &outcome).await
            });
            tasks.push((id, task));
        }

        let (ids, handles): (Vec<CheckId>, Vec<_>) = tasks.into_iter().unzip();
        let results = futures::future::join_all(handles).await;

        let mut summary = CycleSummary {
            cycle_id,
            checks: ids.len(),
            ..Default::default()
        };

        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(report) => tally(&mut summary, id, &report),
                Err(e) => {
                    error!(check = %id, "Check task failed: {}", e);
                    summary.task_failures += 1;
                }
            }
        }

        summary.duration = start.elapsed();
        self.counters.completed.fetch_add(1, Ordering::Relaxed);
        if let Some(metrics) = &self.metrics {
            metrics.record_cycle("completed", Some(summary.duration));
        }

        info!(
            "Cycle complete: {} checks, {} up, {} down, {} alerts, {} not persisted, {} failed in {:?}",
            summary.checks,
            summary.up,
            summary.down,
            summary.alerts,
            summary.persist_failures,
            summary.task_failures,
            summary.duration
        );

        CycleReport::Completed(summary)
    }
}

fn tally(summary: &mut CycleSummary, id: &CheckId, report: &EvaluationReport) {
    if !report.persisted {
        summary.persist_failures += 1;
        return;
    }
    match report.evaluation.new_state {
        CheckState::Up => summary.up += 1,
        CheckState::Down => summary.down += 1,
        CheckState::Unknown => {}
    }
    if report.alerted {
        summary.alerts += 1;
    }
    debug!(check = %id, "Evaluated as {}", report.evaluation.new_state);
}
