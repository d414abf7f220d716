//! Common infrastructure for the countermon plugin.
//!
//! This crate provides the pieces shared by the plugin binary and its tests:
//!
//! - [`error`]: Error types for configuration, sampling, and reporting
//! - [`process`]: External command execution (the sampler, hostname lookup)
//!
//! The plugin itself is a one-shot check: it never holds state across
//! invocations, so this crate intentionally carries no configuration or
//! persistence layers.

pub mod error;
pub mod process;

// Re-export commonly used items at crate root
pub use error::{CounterMonError, CounterMonResult};
pub use process::{ExecResult, HOSTNAME_CMD, TYPEPERF_CMD};
