use std::sync::Arc;

use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use pqprobe_core::sink::ProgressCallback;

const BAR_TEMPLATE: &str =
    "{spinner:.blue} [{elapsed_precise}] {bar:40.green/white} {pos}/{len} tasks ({per_sec}, eta {eta})";

/// Span owning the scan progress bar. The bar is drawn while the span is entered.
pub fn scan_span(total: usize) -> Span {
    let span = info_span!("scan", indicatif.pb_show = true);
    let style = ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);
    span.pb_set_style(&style);
    span.pb_set_length(total as u64);
    span
}

/// Moves the bar to the number of outcomes the sink has persisted.
pub fn reporter(span: Span) -> ProgressCallback {
    Arc::new(move |persisted: usize| span.pb_set_position(persisted as u64))
}
