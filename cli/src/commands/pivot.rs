use std::path::{Path, PathBuf};

use colored::*;

use crate::terminal::{colors, print};
use pqprobe_common::success;
use pqprobe_core::report;

const PIVOT_FILE_NAME: &str = "pqc_readiness.csv";

pub async fn pivot(summary: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| default_output(summary));
    let matrix = report::pivot_file(summary, &output).await?;

    print::aligned_line("Groups", matrix.groups().len().to_string());
    for (group, ready) in matrix.ready_per_group() {
        print::aligned_line(group, ready.to_string());
    }

    let ready: ColoredString = matrix.ready_domains().to_string().bold().color(colors::SUCCESS);
    success!(
        "{ready} of {} domains accept at least one group, matrix written to {}",
        matrix.domain_count(),
        output.display()
    );
    Ok(())
}

fn default_output(summary: &Path) -> PathBuf {
    summary.with_file_name(PIVOT_FILE_NAME)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
