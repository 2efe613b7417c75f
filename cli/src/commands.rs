pub mod pivot;
pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use pqprobe_common::config::{self, ProbeConfig, ScanConfig};

#[derive(Parser)]
#[command(name = "pqprobe")]
#[command(about = "Measures post-quantum key-exchange support of TLS 1.3 servers.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe every domain with every key-exchange group
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Turn a summary CSV into a per-domain readiness matrix
    #[command(alias = "p")]
    Pivot {
        /// Summary CSV produced by `scan`
        #[arg(short, long, default_value = config::SUMMARY_FILE_NAME)]
        summary: PathBuf,
        /// Where to write the matrix [default: pqc_readiness.csv next to the summary]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct ScanArgs {
    /// File with one domain per line
    #[arg(short, long)]
    pub domains: PathBuf,

    /// File with one key-exchange group per line
    #[arg(short, long)]
    pub groups: PathBuf,

    /// Maximum number of probes in flight
    #[arg(short, long, default_value_t = config::DEFAULT_WORKERS)]
    pub workers: usize,

    /// Per-probe timeout in seconds
    #[arg(short, long, default_value_t = config::DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Directory for the summary CSV and the debug log
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Handshake-capable openssl binary
    #[arg(long, default_value = config::DEFAULT_OPENSSL)]
    pub openssl: PathBuf,

    /// Directory holding the post-quantum provider module
    #[arg(long)]
    pub provider_path: Option<PathBuf>,

    /// Provider to load, repeatable [default with --provider-path: oqsprovider, default]
    #[arg(long = "provider")]
    pub providers: Vec<String>,

    /// Print less, repeat for even less
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
}

impl ScanArgs {
    pub fn into_config(self) -> ScanConfig {
        ScanConfig {
            workers: self.workers,
            timeout: Duration::from_secs(self.timeout),
            output_dir: self.output_dir,
            domains_path: self.domains,
            groups_path: self.groups,
            probe: ProbeConfig {
                program: self.openssl,
                provider_path: self.provider_path,
                providers: self.providers,
            },
            quiet: self.quiet,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
