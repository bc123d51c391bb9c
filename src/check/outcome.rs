// src/check/outcome.rs
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    Timeout,
    ConnectionError,
    ProtocolError,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Timeout => "timeout",
            FailureReason::ConnectionError => "connection error",
            FailureReason::ProtocolError => "protocol error",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one probe. A response code exists only for completed exchanges,
/// a failure reason only for exchanges that did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Response { status: u16 },
    Failed { reason: FailureReason, detail: String },
}

impl Outcome {
    pub fn response(status: u16) -> Self {
        Outcome::Response { status }
    }

    pub fn failed(reason: FailureReason, detail: impl Into<String>) -> Self {
        Outcome::Failed {
            reason,
            detail: detail.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::failed(FailureReason::Timeout, "request timed out")
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, Outcome::Response { .. })
    }

    pub fn response_code(&self) -> Option<u16> {
        match self {
            Outcome::Response { status } => Some(*status),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Outcome::Response { .. } => None,
            Outcome::Failed { reason, .. } => Some(*reason),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Response { .. } => "response",
            Outcome::Failed { reason, .. } => match reason {
                FailureReason::Timeout => "timeout",
                FailureReason::ConnectionError => "connection_error",
                FailureReason::ProtocolError => "protocol_error",
            },
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Response { status } => write!(f, "HTTP {}", status),
            Outcome::Failed { reason, detail } => write!(f, "{}: {}", reason, detail),
        }
    }
}
