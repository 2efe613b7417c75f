//! Blocks of the free-text debug log, one per non-successful task.

use pqprobe_common::scan::TaskResult;

pub const MARKER: &str = "========================================";

/// Renders the whole block for `result`, or `None` for a successful task.
///
/// The block is returned as one string so the sink can hand it to a single write.
pub fn render_block(result: &TaskResult) -> Option<String> {
    let diagnostics = result.outcome.diagnostics()?;

    let mut block = String::with_capacity(128 + diagnostics.iter().map(|d| d.len() + 3).sum::<usize>());
    block.push_str(MARKER);
    block.push('\n');
    block.push_str(&format!("Domain: {}\n", result.task.domain));
    block.push_str(&format!("Group: {}\n", result.task.group));
    block.push_str(&format!("Status: {}\n", result.outcome.status()));
    for line in diagnostics {
        block.push_str("  ");
        block.push_str(line);
        block.push('\n');
    }
    block.push('\n');
    Some(block)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
