//! Error types for countermon operations.
//!
//! All errors implement `std::error::Error` via `thiserror`. Operational
//! faults (unreadable config, sampler failure) are distinguished from
//! bounds violations, which are not errors at all but part of the normal
//! check outcome.

use std::io;
use thiserror::Error;

/// Result type alias for countermon operations.
pub type CounterMonResult<T> = Result<T, CounterMonError>;

/// Errors that can occur during a check run.
#[derive(Debug, Error)]
pub enum CounterMonError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        /// The configuration file path.
        path: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Configuration file did not parse as the expected YAML shape.
    #[error("Invalid config: {message}")]
    ConfigParse {
        /// Parser error message.
        message: String,
    },

    /// Configuration parsed but failed validation.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// Failed to spawn an external command.
    #[error("Failed to execute command '{command}': {source}")]
    CommandExec {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// External command returned a non-zero exit code.
    #[error("Command failed: '{command}' (exit code {exit_code}): {output}")]
    CommandFailed {
        /// The command that failed.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// Combined stdout/stderr output.
        output: String,
    },

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl CounterMonError {
    /// Creates a config parse error.
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error means the run could not even start
    /// (configuration problems, as opposed to runtime sampler faults).
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CounterMonError::ConfigRead { .. }
                | CounterMonError::ConfigParse { .. }
                | CounterMonError::InvalidConfig { .. }
        )
    }
}
