// src/scheduler/driver.rs
use super::cycle::{CycleEngine, CycleReport, SchedulerStats};
use super::SchedulerBuilder;
use crate::config::SchedulerConfig;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

struct Driver {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Periodic driver for evaluation cycles.
pub struct CycleScheduler {
    config: SchedulerConfig,
    engine: Arc<CycleEngine>,
    driver: Mutex<Option<Driver>>,
}

impl CycleScheduler {
    pub fn builder(config: SchedulerConfig) -> SchedulerBuilder {
        SchedulerBuilder::new(config)
    }

    pub(crate) fn from_parts(config: SchedulerConfig, engine: Arc<CycleEngine>) -> Self {
        Self {
            config,
            engine,
            driver: Mutex::new(None),
        }
    }

    /// Runs one cycle to completion, unless another cycle is in flight.
    pub async fn trigger_cycle(&self) -> CycleReport {
        match self.engine.try_begin() {
            Some(guard) => self.engine.clone().run(guard).await,
            None => CycleReport::Skipped,
        }
    }

    /// Starts firing cycles. Returns false if already running.
    pub async fn start(&self) -> bool {
        let mut driver = self.driver.lock().await;
        if driver.is_some() {
            tracing::warn!("Scheduler already running");
            return false;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(drive(
            self.engine.clone(),
            self.config.clone(),
            shutdown_rx,
        ));

        *driver = Some(Driver {
            shutdown_tx,
            handle,
        });
        true
    }

    /// Stops the driver. No cycle starts after this returns; an in-flight
    /// cycle is left to finish.
    pub async fn stop(&self) {
        let Some(driver) = self.driver.lock().await.take() else {
            return;
        };

        let _ = driver.shutdown_tx.send(true);
        if let Err(e) = driver.handle.await {
            tracing::error!("Scheduler driver ended abnormally: {}", e);
        }
    }

    pub async fn is_running(&self) -> bool {
        self.driver.lock().await.is_some()
    }

    /// Waits for the in-flight cycle, if any, to finish.
    pub async fn wait_idle(&self) {
        self.engine.wait_idle().await;
    }

    pub fn stats(&self) -> SchedulerStats {
        self.engine.stats()
    }
}

async fn drive(
    engine: Arc<CycleEngine>,
    config: SchedulerConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let period = config.interval();
    let first = if config.run_on_start {
        Instant::now()
    } else {
        Instant::now() + period
    };
    let mut ticker = interval_at(first, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "Starting scheduler with interval: {:?}, max concurrency: {}",
        period, config.max_concurrency
    );

    loop {
        tokio::select! {
            biased;
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    info!("Scheduler shutting down");
                    break;
                }
            }
            _ = ticker.tick() => {
                if let Some(guard) = engine.try_begin() {
                    let engine = engine.clone();
                    tokio::spawn(async move {
                        engine.run(guard).await;
                    });
                }
            }
        }
    }
}
