// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use endpoint_monitor::alert::{Alert, AlertSink};
use endpoint_monitor::check::{
    Check, CheckId, CheckState, Contact, Endpoint, HttpMethod, Outcome, Owner, Protocol,
};
use endpoint_monitor::probe::Prober;
use endpoint_monitor::registry::{CheckRegistry, InMemoryRegistry, RegistryError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

pub fn check(id: &str, url: &str) -> Check {
    Check {
        id: CheckId::new(id),
        name: format!("{} check", id),
        endpoint: Endpoint::new(Protocol::Http, url, HttpMethod::Get),
        success_codes: vec![200, 201],
        timeout_seconds: 5,
        owner: Owner::Individual {
            contact: Contact {
                first_name: "Riley".to_string(),
                email: Some("riley@example.com".to_string()),
                phone: Some("9876543210".to_string()),
            },
        },
        location: None,
        state: CheckState::Unknown,
        last_checked_at: None,
    }
}

/// Returns a configured outcome per check, defaulting to HTTP 200.
#[derive(Default)]
pub struct ScriptedProber {
    outcomes: Mutex<HashMap<CheckId, Outcome>>,
    calls: AtomicUsize,
}

impl ScriptedProber {
    pub fn set(&self, id: &str, outcome: Outcome) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(CheckId::new(id), outcome);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, check: &Check) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .get(&check.id)
            .cloned()
            .unwrap_or_else(|| Outcome::response(200))
    }
}

/// Holds every probe until released.
#[derive(Default)]
pub struct GatedProber {
    gate: Notify,
    released: AtomicBool,
    calls: AtomicUsize,
}

impl GatedProber {
    pub fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
        self.gate.notify_waiters();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for GatedProber {
    async fn probe(&self, _check: &Check) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        loop {
            let notified = self.gate.notified();
            if self.released.load(Ordering::SeqCst) {
                return Outcome::response(200);
            }
            notified.await;
        }
    }
}

/// Tracks how many probes are in flight at once.
#[derive(Default)]
pub struct ConcurrencyTrackingProber {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl ConcurrencyTrackingProber {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for ConcurrencyTrackingProber {
    async fn probe(&self, _check: &Check) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Outcome::response(200)
    }
}

/// Panics for one check id, answers 200 for the rest.
pub struct PanickingProber {
    pub victim: CheckId,
}

#[async_trait]
impl Prober for PanickingProber {
    async fn probe(&self, check: &Check) -> Outcome {
        if check.id == self.victim {
            panic!("probe blew up");
        }
        Outcome::response(200)
    }
}

#[derive(Default)]
pub struct RecordingAlerts {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingAlerts {
    pub fn take(&self) -> Vec<Alert> {
        std::mem::take(&mut *self.alerts.lock().unwrap())
    }
}

impl AlertSink for RecordingAlerts {
    fn dispatch(&self, alert: Alert) {
        self.alerts.lock().unwrap().push(alert);
    }
}

/// In-memory registry whose reads or writes can be made to fail.
#[derive(Default)]
pub struct FlakyRegistry {
    pub inner: InMemoryRegistry,
    pub fail_list: AtomicBool,
    pub fail_updates_for: Mutex<Option<CheckId>>,
}

impl FlakyRegistry {
    pub fn new(checks: Vec<Check>) -> Self {
        Self {
            inner: InMemoryRegistry::new(checks),
            ..Default::default()
        }
    }
}

#[async_trait]
impl CheckRegistry for FlakyRegistry {
    async fn list_checks(&self) -> Result<Vec<Check>, RegistryError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(RegistryError::Unavailable("connection reset".to_string()));
        }
        self.inner.list_checks().await
    }

    async fn update_check_state(
        &self,
        id: &CheckId,
        state: CheckState,
        checked_at: DateTime<Utc>,
    ) -> Result<(), RegistryError> {
        if self.fail_updates_for.lock().unwrap().as_ref() == Some(id) {
            return Err(RegistryError::Conflict(id.clone()));
        }
        self.inner.update_check_state(id, state, checked_at).await
    }
}
