// src/probe/mod.rs
mod executor;

pub use executor::{HttpProber, Prober};
