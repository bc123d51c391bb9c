// src/metrics/collector.rs
use crate::check::{CheckState, Outcome};
use anyhow::Result;
use dashmap::DashSet;
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGaugeVec,
    Opts, Registry, TextEncoder,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Vec<u8> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("Failed to encode metrics: {}", e);
        }
        buffer
    }
}

pub struct MetricsCollector {
    // Cycle metrics
    pub cycles_total: IntCounterVec,
    pub cycle_duration_seconds: Histogram,

    // Probe metrics
    pub probes_total: IntCounterVec,
    pub probe_duration_seconds: HistogramVec,

    // Evaluation metrics
    pub check_state: IntGaugeVec,
    pub persist_failures_total: IntCounter,
    exported_checks: DashSet<String>,

    // Alert metrics
    pub alerts_total: IntCounterVec,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let cycles_total = IntCounterVec::new(
            Opts::new("monitor_cycles_total", "Evaluation cycles by result"),
            &["result"],
        )?;
        registry.register(Box::new(cycles_total.clone()))?;

        let cycle_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "monitor_cycle_duration_seconds",
            "Wall-clock duration of completed cycles",
        ))?;
        registry.register(Box::new(cycle_duration_seconds.clone()))?;

        let probes_total = IntCounterVec::new(
            Opts::new("monitor_probes_total", "Probes by outcome"),
            &["result"],
        )?;
        registry.register(Box::new(probes_total.clone()))?;

        let probe_duration_seconds = HistogramVec::new(
            HistogramOpts::new("monitor_probe_duration_seconds", "Probe duration"),
            &["result"],
        )?;
        registry.register(Box::new(probe_duration_seconds.clone()))?;

        let check_state = IntGaugeVec::new(
            Opts::new("monitor_check_state", "Check state (1=up, 0=down)"),
            &["check"],
        )?;
        registry.register(Box::new(check_state.clone()))?;

        let persist_failures_total = IntCounter::new(
            "monitor_persist_failures_total",
            "Evaluations discarded because the registry write failed",
        )?;
        registry.register(Box::new(persist_failures_total.clone()))?;

        let alerts_total = IntCounterVec::new(
            Opts::new("monitor_alerts_total", "Alert deliveries by channel and result"),
            &["channel", "result"],
        )?;
        registry.register(Box::new(alerts_total.clone()))?;

        Ok(Self {
            cycles_total,
            cycle_duration_seconds,
            probes_total,
            probe_duration_seconds,
            check_state,
            persist_failures_total,
            exported_checks: DashSet::new(),
            alerts_total,
        })
    }

    pub fn record_cycle(&self, result: &str, duration: Option<Duration>) {
        self.cycles_total.with_label_values(&[result]).inc();
        if let Some(duration) = duration {
            self.cycle_duration_seconds.observe(duration.as_secs_f64());
        }
    }

    pub fn record_probe(&self, outcome: &Outcome, duration: Duration) {
        let result = outcome.label();
        self.probes_total.with_label_values(&[result]).inc();
        self.probe_duration_seconds
            .with_label_values(&[result])
            .observe(duration.as_secs_f64());
    }

    pub fn update_check_state(&self, check: &str, state: CheckState) {
        let value = match state {
            CheckState::Up => 1,
            CheckState::Down | CheckState::Unknown => 0,
        };
        self.check_state.with_label_values(&[check]).set(value);
        self.exported_checks.insert(check.to_string());
    }

    /// Drops the state series of every check not in `current`.
    pub fn retain_check_states<'a>(&self, current: impl IntoIterator<Item = &'a str>) {
        let current: HashSet<&str> = current.into_iter().collect();
        self.exported_checks.retain(|check| {
            if current.contains(check.as_str()) {
                return true;
            }
            let _ = self.check_state.remove_label_values(&[check.as_str()]);
            false
        });
    }

    pub fn record_persist_failure(&self) {
        self.persist_failures_total.inc();
    }

    pub fn record_alert(&self, channel: &str, result: &str) {
        self.alerts_total.with_label_values(&[channel, result]).inc();
    }
}
