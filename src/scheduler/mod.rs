// src/scheduler/mod.rs
mod builder;
mod cycle;
mod driver;

pub use builder::{SchedulerBuilder, SchedulerError};
pub use cycle::{CycleReport, CycleSummary, SchedulerStats};
pub use driver::CycleScheduler;
