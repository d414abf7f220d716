//! Row processing and metric emission.
//!
//! The [`Reporter`] walks every cell of a parsed sample and, for each
//! configured counter: derives the metric name, formats the value, writes a
//! metric line, and evaluates the optional bounds. Bounds violations print a
//! `CHECK ERROR` diagnostic to the same output stream and flip the overall
//! status to CRITICAL for the remainder of the run.

use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;

use countermon_common::error::{CounterMonError, CounterMonResult};

use crate::config::{CounterSpec, MetricsConfig};
use crate::sample::Sample;
use crate::sampler;
use crate::scheme;
use crate::status::CheckStatus;

/// Summary of one reporting pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportSummary {
    /// Metric lines written.
    pub emitted: usize,
    /// Individual bounds failures (a counter failing both bounds counts
    /// twice).
    pub violations: usize,
    /// Final overall status.
    pub status: CheckStatus,
}

/// Processes sample cells against the counter specification table.
pub struct Reporter {
    config: MetricsConfig,
    prefix: String,
}

impl Reporter {
    /// Creates a reporter for one run. `prefix` is the global scheme
    /// prepended to every emitted name.
    pub fn new(config: MetricsConfig, prefix: impl Into<String>) -> Self {
        Self {
            config,
            prefix: prefix.into(),
        }
    }

    /// Processes one parsed sample, writing metric lines and diagnostics to
    /// `out`. `timestamp` is shared by every line of the run.
    pub fn report<W: Write>(
        &self,
        sample: &Sample,
        timestamp: i64,
        out: &mut W,
    ) -> CounterMonResult<ReportSummary> {
        let mut summary = ReportSummary::default();
        for (counter, value) in sample.cells() {
            self.process_cell(counter, value, timestamp, out, &mut summary)?;
        }
        if summary.emitted == 0 {
            tracing::warn!("No configured counters found in sample; nothing emitted");
        }
        Ok(summary)
    }

    fn process_cell<W: Write>(
        &self,
        counter: &str,
        raw_value: &str,
        timestamp: i64,
        out: &mut W,
        summary: &mut ReportSummary,
    ) -> CounterMonResult<()> {
        let raw_value = raw_value.trim();
        if counter.is_empty() || raw_value.is_empty() {
            return Ok(());
        }

        let Some(leaf) = scheme::leaf_path(counter) else {
            tracing::debug!(counter = %counter, "Identifier too short, skipping");
            return Ok(());
        };
        let key = scheme::lookup_key(leaf);
        let Some(spec) = self.config.get(&key) else {
            tracing::debug!(key = %key, "Counter not configured, skipping");
            return Ok(());
        };

        let value: f64 = match raw_value.parse() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(key = %key, value = %raw_value, "Unparseable counter value, skipping");
                return Ok(());
            }
        };

        let relative = match &spec.scheme {
            Some(s) => s.clone(),
            None => scheme::derive_relative(leaf),
        };
        let name = scheme::metric_name(&self.prefix, &relative);

        writeln!(out, "{} {:.2} {}", name, value, timestamp)
            .map_err(|e| CounterMonError::internal(format!("metric write failed: {e}")))?;
        summary.emitted += 1;

        if !spec.has_bounds() {
            return Ok(());
        }

        // Both bounds are always evaluated; a failed minimum does not
        // suppress the maximum check.
        let min_ok = check_min(spec, &key, raw_value, value, out)?;
        let max_ok = check_max(spec, &key, raw_value, value, out)?;
        if !min_ok {
            summary.violations += 1;
            summary.status.record_failure();
        }
        if !max_ok {
            summary.violations += 1;
            summary.status.record_failure();
        }
        Ok(())
    }
}

fn check_min<W: Write>(
    spec: &CounterSpec,
    key: &str,
    raw_value: &str,
    value: f64,
    out: &mut W,
) -> CounterMonResult<bool> {
    let Some(min) = spec.min else {
        return Ok(true);
    };
    if value >= min {
        return Ok(true);
    }
    writeln!(
        out,
        "CHECK ERROR: value {} below minimum {} for key {}",
        raw_value, min, key
    )
    .map_err(|e| CounterMonError::internal(format!("diagnostic write failed: {e}")))?;
    Ok(false)
}

fn check_max<W: Write>(
    spec: &CounterSpec,
    key: &str,
    raw_value: &str,
    value: f64,
    out: &mut W,
) -> CounterMonResult<bool> {
    let Some(max) = spec.max else {
        return Ok(true);
    };
    if value <= max {
        return Ok(true);
    }
    writeln!(
        out,
        "CHECK ERROR: value {} above maximum {} for key {}",
        raw_value, max, key
    )
    .map_err(|e| CounterMonError::internal(format!("diagnostic write failed: {e}")))?;
    Ok(false)
}

/// Options for a single check run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Path to the counter configuration file.
    pub config_path: PathBuf,
    /// Global scheme prefix.
    pub prefix: String,
    /// Sampler executable.
    pub sampler_cmd: String,
}

/// Executes one full check: load configuration, run the sampler once, parse
/// its output, and report every configured counter.
pub async fn run_once<W: Write>(opts: &RunOptions, out: &mut W) -> CounterMonResult<ReportSummary> {
    let config = MetricsConfig::load_from_file(&opts.config_path)?;
    tracing::debug!(counters = config.len(), "Configuration loaded");

    let raw = {
        let paths = config.counter_paths();
        sampler::collect(&opts.sampler_cmd, &paths).await?
    };

    // One timestamp per invocation, shared by every emitted line.
    let timestamp = Utc::now().timestamp();

    let sample = Sample::parse(&raw);
    tracing::debug!(rows = sample.row_count(), "Sample parsed");

    let reporter = Reporter::new(config, &opts.prefix);
    reporter.report(&sample, timestamp, out)
}
