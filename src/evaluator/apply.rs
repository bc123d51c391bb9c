// src/evaluator/apply.rs
use super::{evaluate, Evaluation};
use crate::alert::{Alert, AlertSink};
use crate::check::{Check, Outcome};
use crate::clock::Clock;
use crate::metrics::MetricsCollector;
use crate::registry::CheckRegistry;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationReport {
    pub evaluation: Evaluation,
    /// False when the registry write failed and the evaluation was dropped.
    pub persisted: bool,
    pub alerted: bool,
}

/// Applies evaluations: always persists, alerts only on a transition.
/// The only writer of check state.
pub struct Evaluator {
    registry: Arc<dyn CheckRegistry>,
    alerts: Arc<dyn AlertSink>,
    clock: Arc<dyn Clock>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl Evaluator {
    pub fn new(
        registry: Arc<dyn CheckRegistry>,
        alerts: Arc<dyn AlertSink>,
        clock: Arc<dyn Clock>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        Self {
            registry,
            alerts,
            clock,
            metrics,
        }
    }

    pub async fn apply(&self, check: &Check, outcome: &Outcome) -> EvaluationReport {
        let evaluation = evaluate(check, outcome);
        let checked_at = self.clock.now();

        if let Err(e) = self
            .registry
            .update_check_state(&check.id, evaluation.new_state, checked_at)
            .await
        {
            warn!(
                check = %check.id,
                "Failed to persist state {}, discarding evaluation: {}",
                evaluation.new_state,
                e
            );
            if let Some(metrics) = &self.metrics {
                metrics.record_persist_failure();
            }
            return EvaluationReport {
                evaluation,
                persisted: false,
                alerted: false,
            };
        }

        if let Some(metrics) = &self.metrics {
            metrics.update_check_state(check.id.as_str(), evaluation.new_state);
        }

        if !evaluation.alert_warranted {
            debug!(
                check = %check.id,
                owner = check.owner.kind(),
                "Check is {} ({}), no alert",
                evaluation.new_state,
                outcome
            );
            return EvaluationReport {
                evaluation,
                persisted: true,
                alerted: false,
            };
        }

        self.alerts
            .dispatch(Alert::new(check, evaluation.new_state, outcome, checked_at));

        EvaluationReport {
            evaluation,
            persisted: true,
            alerted: true,
        }
    }
}
