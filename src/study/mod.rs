//! Spaced repetition study engine
//!
//! This module provides:
//! - Study set models (terms, score queues, cycle bookkeeping)
//! - Cycle boundary checks with periodic queue resets
//! - Quota-based deck construction with FIFO queue rotation
//! - Post-session queue rebalancing
//! - The session context tying these together, and file storage

pub mod cycle;
pub mod deck;
pub mod error;
pub mod models;
pub mod rebalance;
pub mod review;
pub mod session;
pub mod storage;

pub use cycle::CycleDecision;
pub use deck::Deck;
pub use error::{Result, StudyError};
pub use models::*;
pub use rebalance::RebalanceReport;
pub use review::{CardView, Example, ExampleSource, RandomReference, ReviewAction, Reviewer};
pub use session::{FinishedSession, SessionStart, StudySession};
pub use storage::StudySetStorage;
