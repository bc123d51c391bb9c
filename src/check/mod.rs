// src/check/mod.rs
mod model;
mod outcome;

pub use model::{
    Check, CheckError, CheckId, CheckState, Contact, Endpoint, HttpMethod, Owner, Protocol,
    MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS,
};
pub use outcome::{FailureReason, Outcome};
