//! Rows of the summary CSV: `Domain,Group,Status,Cipher/Notes`.
//!
//! Fields holding a comma, a quote or a line break are quoted the CSV way, so a
//! row is always exactly one line.

use pqprobe_common::scan::{Status, TaskResult};
use thiserror::Error;

pub const HEADER: &str = "Domain,Group,Status,Cipher/Notes";
const FIELD_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryRecord {
    pub domain: String,
    pub group: String,
    pub status: Status,
    /// Cipher on success, the status note otherwise.
    pub detail: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("expected {FIELD_COUNT} fields, found {0}")]
    FieldCount(usize),
    #[error("unknown status symbol '{0}'")]
    UnknownStatus(String),
    #[error("unterminated quoted field")]
    UnterminatedQuote,
}

impl From<&TaskResult> for SummaryRecord {
    fn from(result: &TaskResult) -> Self {
        let status = result.outcome.status();
        let detail = match result.outcome.cipher() {
            Some(cipher) => cipher.to_string(),
            None => status.note().to_string(),
        };
        Self {
            domain: result.task.domain.to_string(),
            group: result.task.group.to_string(),
            status,
            detail,
        }
    }
}

impl SummaryRecord {
    /// The row as written to disk, trailing newline included.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{}\n",
            escape(&self.domain),
            escape(&self.group),
            self.status.symbol(),
            escape(&self.detail)
        )
    }

    pub fn parse(line: &str) -> Result<Self, RowError> {
        let fields = split_fields(line.trim_end_matches(['\r', '\n']))?;
        if fields.len() != FIELD_COUNT {
            return Err(RowError::FieldCount(fields.len()));
        }

        let mut fields = fields.into_iter();
        let domain = fields.next().unwrap_or_default();
        let group = fields.next().unwrap_or_default();
        let symbol = fields.next().unwrap_or_default();
        let detail = fields.next().unwrap_or_default();

        let status = Status::from_symbol(&symbol).ok_or(RowError::UnknownStatus(symbol))?;
        Ok(Self { domain, group, status, detail })
    }
}

/// Header line as written to disk.
pub fn header_line() -> String {
    format!("{HEADER}\n")
}

/// Quotes `field` the CSV way when it holds a comma, a quote or a line break.
pub fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn split_fields(line: &str) -> Result<Vec<String>, RowError> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if current.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut current)),
            (c, _) => current.push(c),
        }
    }

    if in_quotes {
        return Err(RowError::UnterminatedQuote);
    }
    fields.push(current);
    Ok(fields)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
