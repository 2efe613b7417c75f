//! # Readiness pivot
//!
//! Turns a summary CSV (one row per domain and group) into a matrix with one row
//! per domain and one `0`/`1` column per group, the shape the downstream
//! readiness analysis reads.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use thiserror::Error;
use tracing::debug;

use pqprobe_common::scan::Status;
use pqprobe_protocols::summary::{self, HEADER, RowError, SummaryRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("summary is empty")]
    Empty,
    #[error("line 1: expected header '{HEADER}'")]
    MissingHeader,
    #[error("line {line}: {source}")]
    Row {
        line: usize,
        #[source]
        source: RowError,
    },
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReadinessMatrix {
    groups: Vec<String>,
    domains: Vec<(String, Vec<bool>)>,
}

impl ReadinessMatrix {
    /// Builds the matrix from summary CSV text. Domains and groups keep the order
    /// in which they first appear; a pair seen twice counts as ready if any of its
    /// rows succeeded.
    pub fn from_summary(text: &str) -> Result<Self, ReportError> {
        let mut lines = text.lines().enumerate();
        match lines.next() {
            None => return Err(ReportError::Empty),
            Some((_, header)) if header.trim_end() != HEADER => {
                return Err(ReportError::MissingHeader);
            }
            Some(_) => {}
        }

        let mut matrix = ReadinessMatrix::default();
        let mut group_index: HashMap<String, usize> = HashMap::new();
        let mut domain_index: HashMap<String, usize> = HashMap::new();

        for (idx, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let record = SummaryRecord::parse(line)
                .map_err(|source| ReportError::Row { line: idx + 1, source })?;

            let column = *group_index.entry(record.group.clone()).or_insert_with(|| {
                matrix.groups.push(record.group.clone());
                for (_, cells) in matrix.domains.iter_mut() {
                    cells.push(false);
                }
                matrix.groups.len() - 1
            });

            let row = *domain_index.entry(record.domain.clone()).or_insert_with(|| {
                matrix
                    .domains
                    .push((record.domain.clone(), vec![false; matrix.groups.len()]));
                matrix.domains.len() - 1
            });

            matrix.domains[row].1[column] |= record.status == Status::Success;
        }

        debug!(
            "pivoted {} domains across {} groups",
            matrix.domains.len(),
            matrix.groups.len()
        );
        Ok(matrix)
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    /// Domains that completed a handshake with at least one group.
    pub fn ready_domains(&self) -> usize {
        self.domains
            .iter()
            .filter(|(_, cells)| cells.iter().any(|ready| *ready))
            .count()
    }

    /// Successful handshakes per group, in column order.
    pub fn ready_per_group(&self) -> Vec<(&str, usize)> {
        self.groups
            .iter()
            .enumerate()
            .map(|(col, group)| {
                let ready = self.domains.iter().filter(|(_, cells)| cells[col]).count();
                (group.as_str(), ready)
            })
            .collect()
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from("domain");
        for group in &self.groups {
            out.push(',');
            out.push_str(&summary::escape(group));
        }
        out.push('\n');

        for (domain, cells) in &self.domains {
            out.push_str(&summary::escape(domain));
            for ready in cells {
                out.push_str(if *ready { ",1" } else { ",0" });
            }
            out.push('\n');
        }
        out
    }
}

/// Reads `summary`, writes the pivoted matrix to `output` and returns it.
pub async fn pivot_file(summary: &Path, output: &Path) -> anyhow::Result<ReadinessMatrix> {
    let text = tokio::fs::read_to_string(summary)
        .await
        .with_context(|| format!("reading summary '{}'", summary.display()))?;

    let matrix = ReadinessMatrix::from_summary(&text)
        .with_context(|| format!("parsing summary '{}'", summary.display()))?;

    tokio::fs::write(output, matrix.to_csv())
        .await
        .with_context(|| format!("writing pivot '{}'", output.display()))?;

    Ok(matrix)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
