// src/alert/dispatcher.rs
use super::{Alert, Notifier};
use crate::metrics::MetricsCollector;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Receives alerts from the evaluator. Must not block the caller.
pub trait AlertSink: Send + Sync {
    fn dispatch(&self, alert: Alert);
}

/// Fans an alert out to every configured channel, each on its own task.
pub struct AlertDispatcher {
    notifiers: Vec<Arc<dyn Notifier>>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl AlertDispatcher {
    pub fn new(
        notifiers: Vec<Arc<dyn Notifier>>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        Self { notifiers, metrics }
    }

    pub fn channels(&self) -> Vec<&'static str> {
        self.notifiers.iter().map(|n| n.channel()).collect()
    }

    /// Spawns one delivery task per channel and returns their handles.
    pub fn deliver(&self, alert: Alert) -> Vec<JoinHandle<()>> {
        let alert = Arc::new(alert);
        let message = Arc::new(alert.message());

        info!(
            check = %alert.check_id,
            alert = %alert.id,
            "Check {} changed {} -> {}",
            alert.endpoint,
            alert.previous_state,
            alert.new_state
        );

        self.notifiers
            .iter()
            .cloned()
            .map(|notifier| {
                let alert = alert.clone();
                let message = message.clone();
                let metrics = self.metrics.clone();

                tokio::spawn(async move {
                    let channel = notifier.channel();
                    let result = match notifier.notify(alert.contact(), &message).await {
                        Ok(delivery) => {
                            debug!(
                                check = %alert.check_id,
                                "Alert via {}: {}",
                                channel,
                                delivery.as_str()
                            );
                            delivery.as_str()
                        }
                        Err(e) => {
                            warn!(
                                check = %alert.check_id,
                                "Failed to deliver alert via {}: {}",
                                channel,
                                e
                            );
                            "failed"
                        }
                    };

                    if let Some(metrics) = &metrics {
                        metrics.record_alert(channel, result);
                    }
                })
            })
            .collect()
    }
}

impl AlertSink for AlertDispatcher {
    fn dispatch(&self, alert: Alert) {
        self.deliver(alert);
    }
}
