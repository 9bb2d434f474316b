//! Mahir: a queue-based spaced repetition scheduler for vocabulary study

pub mod config;
pub mod study;
