use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tracing::Instrument;

use crate::mprint;
use crate::terminal::{colors, print, progress};
use pqprobe_common::config::ScanConfig;
use pqprobe_common::error::{ConfigError, ScanError};
use pqprobe_common::scan::list;
use pqprobe_common::{success, warn};
use pqprobe_core::probe::SubprocessProbe;
use pqprobe_core::scanner::{self, ScanMonitor};
use pqprobe_core::sink::{Sink, Tally};
use pqprobe_core::tasks::TaskSpace;

pub async fn scan(cfg: ScanConfig) -> anyhow::Result<()> {
    let space = prepare(&cfg).await?;

    let sink = Sink::create(&cfg.summary_path(), &cfg.debug_path())
        .await
        .context("opening output streams")?;

    let monitor = ScanMonitor::new();
    watch_interrupt(monitor.clone());

    let span = progress::scan_span(space.len());
    let sink = sink.on_persist(progress::reporter(span.clone()));

    print::header("scanning", cfg.quiet);
    let start_time = Instant::now();
    let probe = Arc::new(SubprocessProbe::new(cfg.probe.clone()));

    let result = scanner::run_scan(&space, probe, sink, &cfg, monitor.clone())
        .instrument(span)
        .await;

    match result {
        Ok(report) => {
            scan_ends(&report.tally, start_time.elapsed(), &cfg);
            Ok(())
        }
        Err(ScanError::Interrupted { completed, total }) => {
            print::header("scan interrupted", cfg.quiet);
            print::aligned_line("Persisted", format!("{completed} of {total} tasks"));
            print_outputs(&cfg);
            anyhow::bail!("scan interrupted before all tasks completed")
        }
        Err(e) => Err(e).context("scan aborted"),
    }
}

/// Everything that can fail before a single probe runs.
async fn prepare(cfg: &ScanConfig) -> anyhow::Result<TaskSpace> {
    cfg.validate()?;

    let domains = list::load("domain", &cfg.domains_path)?;
    let groups = list::load("group", &cfg.groups_path)?;
    let space = TaskSpace::new(domains, groups)?;

    let version = SubprocessProbe::new(cfg.probe.clone()).verify().await?;

    tokio::fs::create_dir_all(&cfg.output_dir)
        .await
        .map_err(|source| ConfigError::OutputDir {
            path: cfg.output_dir.clone(),
            source,
        })?;

    if cfg.quiet == 0 {
        print::aligned_line("Domains", space.domains().len().to_string());
        print::aligned_line("Groups", space.groups().len().to_string());
        print::aligned_line("Tasks", space.len().to_string().bold());
        print::aligned_line("Workers", cfg.workers.to_string());
        print::aligned_line("Timeout", format!("{}s", cfg.timeout.as_secs_f64()));
        print::aligned_line("Probe", version);
        if let Some(path) = &cfg.probe.provider_path {
            print::aligned_line("Providers", format!(
                "{} ({})",
                cfg.probe.effective_providers().join(", "),
                path.display()
            ));
        }
    }

    Ok(space)
}

fn watch_interrupt(monitor: Arc<ScanMonitor>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, waiting for in-flight probes to finish...");
            monitor.stop();
        }
    });
}

fn scan_ends(tally: &Tally, total_time: Duration, cfg: &ScanConfig) {
    if cfg.quiet > 0 {
        mprint!();
        success!(
            "Scan complete: {} succeeded, {} timed out, {} failed",
            tally.success,
            tally.timeout,
            tally.failed
        );
        return;
    }

    print::header("scan results", cfg.quiet);
    print::aligned_line("Success", tally.success.to_string().color(colors::SUCCESS));
    print::aligned_line("Timeout", tally.timeout.to_string().color(colors::TIMEOUT));
    print::aligned_line("Failed", tally.failed.to_string().color(colors::FAILED));
    print_outputs(cfg);

    let tasks: ColoredString = format!("{} tasks", tally.total()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output = format!("Scan Complete: {tasks} persisted in {total_time}").color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(&output.to_string());
}

fn print_outputs(cfg: &ScanConfig) {
    print::aligned_line("Summary", cfg.summary_path().display().to_string());
    print::aligned_line("Debug log", cfg.debug_path().display().to_string());
}
