use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_WORKERS: usize = 250;
/// Largest pool the async runtime can admit (tokio's semaphore permit ceiling).
pub const MAX_WORKERS: usize = usize::MAX >> 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_OPENSSL: &str = "openssl";
pub const DEFAULT_PROVIDERS: &[&str] = &["oqsprovider", "default"];

pub const SUMMARY_FILE_NAME: &str = "pqc_summary.csv";
pub const DEBUG_FILE_NAME: &str = "pqc_debug.log";

/// Run-wide settings, resolved once at startup and never mutated during a scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum number of probes in flight at any moment.
    pub workers: usize,
    /// Hard wall-clock budget of a single probe.
    pub timeout: Duration,
    /// Directory receiving the summary CSV and the debug log.
    pub output_dir: PathBuf,
    pub domains_path: PathBuf,
    pub groups_path: PathBuf,
    pub probe: ProbeConfig,
    /// Verbosity reduction, `0` prints everything.
    pub quiet: u8,
}

/// Location of the handshake-capable binary and the provider that supplies the
/// post-quantum groups.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub program: PathBuf,
    pub provider_path: Option<PathBuf>,
    pub providers: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_OPENSSL),
            provider_path: None,
            providers: Vec::new(),
        }
    }
}

impl ProbeConfig {
    /// Providers to load. Falls back to the PQC provider plus the default one
    /// when only a provider path was given.
    pub fn effective_providers(&self) -> Vec<String> {
        if self.providers.is_empty() && self.provider_path.is_some() {
            return DEFAULT_PROVIDERS.iter().map(|p| p.to_string()).collect();
        }
        self.providers.clone()
    }
}

impl ScanConfig {
    pub fn new(domains_path: PathBuf, groups_path: PathBuf) -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            output_dir: PathBuf::from("."),
            domains_path,
            groups_path,
            probe: ProbeConfig::default(),
            quiet: 0,
        }
    }

    /// Checks the numeric knobs. Input lists and the probe are checked separately
    /// because they need IO.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkers);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE_NAME)
    }

    pub fn debug_path(&self) -> PathBuf {
        self.output_dir.join(DEBUG_FILE_NAME)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
