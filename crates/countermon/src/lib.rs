//! # countermon - Performance Counter Check & Metrics Plugin
//!
//! One-shot monitoring plugin for Windows performance counters. Each
//! invocation runs the external sampler (`typeperf` by default) once against
//! the configured counter set, emits Graphite-style plaintext metric lines
//! on stdout, applies optional min/max threshold checks, and exits with a
//! conventional monitoring status code.
//!
//! ## Responsibilities
//! - Load the counter specification table from a YAML file
//! - Invoke the sampler once with the full counter set as arguments
//! - Parse the sampler's tabular output up to its termination sentinel
//! - Map counter paths to metric names (configured override or derived)
//! - Emit `<name> <value> <timestamp>` lines with two-decimal values
//! - Evaluate optional bounds and accumulate the overall status
//!
//! ## Invariants
//! - Unconfigured counters in the sample are silently skipped
//! - One shared epoch timestamp per invocation, identical across all lines
//! - A single failing bounds check makes the whole run CRITICAL; the status
//!   never recovers within a run
//! - stdout carries only metric lines and check diagnostics; logs go to
//!   stderr

pub mod config;
pub mod reporter;
pub mod sample;
pub mod sampler;
pub mod scheme;
pub mod status;

pub use config::{CounterSpec, MetricsConfig};
pub use reporter::{run_once, ReportSummary, Reporter, RunOptions};
pub use sample::Sample;
pub use status::CheckStatus;
