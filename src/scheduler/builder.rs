// src/scheduler/builder.rs
use super::cycle::CycleEngine;
use super::CycleScheduler;
use crate::alert::AlertSink;
use crate::clock::{Clock, SystemClock};
use crate::config::{SchedulerConfig, MAX_CONCURRENCY};
use crate::evaluator::Evaluator;
use crate::metrics::MetricsCollector;
use crate::probe::Prober;
use crate::registry::CheckRegistry;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("scheduler is missing its {0}")]
    MissingComponent(&'static str),

    #[error("interval must be at least one second")]
    ZeroInterval,

    #[error("max_concurrency must be between 1 and 4096, got {0}")]
    ConcurrencyOutOfRange(usize),
}

/// Collects the collaborators a [`CycleScheduler`] needs.
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    registry: Option<Arc<dyn CheckRegistry>>,
    prober: Option<Arc<dyn Prober>>,
    alerts: Option<Arc<dyn AlertSink>>,
    clock: Arc<dyn Clock>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl SchedulerBuilder {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            registry: None,
            prober: None,
            alerts: None,
            clock: Arc::new(SystemClock),
            metrics: None,
        }
    }

    pub fn registry(mut self, registry: Arc<dyn CheckRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn prober(mut self, prober: Arc<dyn Prober>) -> Self {
        self.prober = Some(prober);
        self
    }

    pub fn alerts(mut self, alerts: Arc<dyn AlertSink>) -> Self {
        self.alerts = Some(alerts);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Result<CycleScheduler, SchedulerError> {
        let registry = self
            .registry
            .ok_or(SchedulerError::MissingComponent("registry"))?;
        let prober = self.prober.ok_or(SchedulerError::MissingComponent("prober"))?;
        let alerts = self
            .alerts
            .ok_or(SchedulerError::MissingComponent("alert sink"))?;
        if self.config.interval().is_zero() {
            return Err(SchedulerError::ZeroInterval);
        }
        if !(1..=MAX_CONCURRENCY).contains(&self.config.max_concurrency) {
            return Err(SchedulerError::ConcurrencyOutOfRange(
                self.config.max_concurrency,
            ));
        }

        let evaluator = Arc::new(Evaluator::new(
            registry.clone(),
            alerts,
            self.clock,
            self.metrics.clone(),
        ));
        let engine = CycleEngine::new(
            registry,
            prober,
            evaluator,
            self.config.max_concurrency,
            self.metrics,
        );

        Ok(CycleScheduler::from_parts(self.config, Arc::new(engine)))
    }
}
