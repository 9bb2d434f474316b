pub mod add;
pub mod check;
pub mod init;
pub mod preview;
pub mod rebalance;
pub mod stats;
pub mod study;
