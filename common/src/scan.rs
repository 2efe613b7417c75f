//! # Scan data model
//!
//! * [`task`]: domains, groups and the (domain, group) pairs that get probed.
//! * [`outcome`]: the classified result of a single probe.
//! * [`list`]: loading of the line-oriented input lists.

pub mod list;
pub mod outcome;
pub mod task;

pub use outcome::{ProbeReport, ScanOutcome, Status, TaskResult};
pub use task::{Domain, Group, ScanTask};
