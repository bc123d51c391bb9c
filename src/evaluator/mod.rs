// src/evaluator/mod.rs
mod apply;
mod state_machine;

pub use apply::{EvaluationReport, Evaluator};
pub use state_machine::{evaluate, Evaluation};
