//! Line-oriented input lists (domains and groups).
//!
//! One entry per line. Surrounding whitespace is trimmed, blank lines and `#`
//! comments are skipped. Duplicates are kept on purpose: every line is scanned.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;

pub fn parse_entries(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Reads a list file, failing when it cannot be read or holds no entries.
pub fn load(kind: &'static str, path: &Path) -> Result<Vec<String>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::UnreadableList {
        kind,
        path: path.to_path_buf(),
        source,
    })?;

    let entries = parse_entries(&text);
    if entries.is_empty() {
        return Err(ConfigError::EmptyList {
            kind,
            path: path.to_path_buf(),
        });
    }

    tracing::debug!("loaded {} {kind} entries from {}", entries.len(), path.display());
    Ok(entries)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
