// src/evaluator/state_machine.rs
use crate::check::{Check, CheckState, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub previous: CheckState,
    pub new_state: CheckState,
    pub alert_warranted: bool,
}

impl Evaluation {
    pub fn changed(&self) -> bool {
        self.previous != self.new_state
    }
}

/// Decide the next state of `check` from one probe outcome.
///
/// A check is up only when the exchange completed and the status is one of
/// its success codes. An alert needs a prior evaluation (a timestamp) and a
/// different state, so the very first evaluation never alerts.
pub fn evaluate(check: &Check, outcome: &Outcome) -> Evaluation {
    let new_state = match outcome.response_code() {
        Some(status) if check.accepts(status) => CheckState::Up,
        _ => CheckState::Down,
    };

    Evaluation {
        previous: check.state,
        new_state,
        alert_warranted: check.has_been_checked() && check.state != new_state,
    }
}
