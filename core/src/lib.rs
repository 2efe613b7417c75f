//! # pqprobe core
//!
//! The scanning engine: the task space, the probe abstraction, the bounded
//! scheduler and the single-writer aggregation sink.
//!
//! ```text
//! TaskSpace ──► scanner::perform_scan ──► worker (probe + classify) ──► sink
//! ```

pub mod probe;
pub mod report;
pub mod scanner;
pub mod sink;
pub mod tasks;
