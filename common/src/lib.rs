//! # pqprobe common
//!
//! Types shared by every crate in the workspace: the scan data model, the run
//! configuration, the error taxonomy and the logging macros.

pub mod config;
pub mod error;
pub mod macros;
pub mod scan;

pub use config::{ProbeConfig, ScanConfig};
pub use error::{ConfigError, ScanError, SinkError};
