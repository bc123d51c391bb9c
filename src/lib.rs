// src/lib.rs
pub mod alert;
pub mod check;
pub mod clock;
pub mod config;
pub mod evaluator;
pub mod metrics;
pub mod probe;
pub mod registry;
pub mod scheduler;
