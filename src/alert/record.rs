// src/alert/record.rs
use crate::check::{Check, CheckId, CheckState, Contact, Endpoint, FailureReason, Outcome, Owner};
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// Why a check went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertCause {
    Failure(FailureReason),
    Status(u16),
}

impl AlertCause {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Response { status } => AlertCause::Status(*status),
            Outcome::Failed { reason, .. } => AlertCause::Failure(*reason),
        }
    }
}

impl fmt::Display for AlertCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertCause::Failure(reason) => write!(f, "{}", reason),
            AlertCause::Status(status) => write!(f, "HTTP {}", status),
        }
    }
}

/// A state change worth telling the owner about.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub id: Uuid,
    pub check_id: CheckId,
    pub check_name: String,
    pub endpoint: Endpoint,
    pub previous_state: CheckState,
    pub new_state: CheckState,
    /// Set only when the new state is down.
    pub cause: Option<AlertCause>,
    pub owner: Owner,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

impl Alert {
    pub fn new(
        check: &Check,
        new_state: CheckState,
        outcome: &Outcome,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        let cause = match new_state {
            CheckState::Down => Some(AlertCause::from_outcome(outcome)),
            _ => None,
        };

        Self {
            id: Uuid::new_v4(),
            check_id: check.id.clone(),
            check_name: check.name.clone(),
            endpoint: check.endpoint.clone(),
            previous_state: check.state,
            new_state,
            cause,
            owner: check.owner.clone(),
            occurred_at,
        }
    }

    pub fn contact(&self) -> &Contact {
        self.owner.contact()
    }

    pub fn message(&self) -> AlertMessage {
        let mut body = format!(
            "Alert : Your check for {} is currently {}",
            self.endpoint, self.new_state
        );
        if let Some(cause) = &self.cause {
            body.push_str(&format!(" ({})", cause));
        }

        AlertMessage {
            subject: format!("Notification Email for your Check - {}", self.check_name),
            body,
        }
    }
}
