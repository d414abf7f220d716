//! External command execution for the countermon plugin.
//!
//! The sampler and the hostname lookup both run as short-lived child
//! processes. Arguments are passed as a vector, never through a shell, so
//! counter paths containing spaces, parentheses, and backslashes need no
//! quoting layer.

use std::process::Stdio;
use tokio::process::Command;

use crate::error::{CounterMonError, CounterMonResult};

/// Default sampler executable. `typeperf` ships with Windows and prints
/// one CSV row per sample interval.
pub const TYPEPERF_CMD: &str = "typeperf";

/// Executable used to resolve the local hostname when no global scheme
/// prefix is configured.
pub const HOSTNAME_CMD: &str = "hostname";

/// Result of an external command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// The exit code of the command (0 = success).
    pub exit_code: i32,
    /// The captured stdout output.
    pub stdout: String,
    /// The captured stderr output.
    pub stderr: String,
}

impl ExecResult {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the combined output (stdout + stderr) for error messages.
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Renders a program + argument vector for log and error messages.
fn display_command(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Executes an external command and captures its output.
///
/// stdout is NOT trimmed: the sampler's tabular output is parsed
/// line-by-line downstream and must arrive intact.
///
/// # Arguments
///
/// * `program` - The executable to run
/// * `args` - Argument vector, passed through without shell interpretation
///
/// # Returns
///
/// * `Ok(ExecResult)` - The command execution result (any exit code)
/// * `Err(CounterMonError)` - If the command could not be spawned
pub async fn exec(program: &str, args: &[String]) -> CounterMonResult<ExecResult> {
    let command = display_command(program, args);
    tracing::debug!(command = %command, "Executing command");

    let output = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| CounterMonError::CommandExec {
            command: command.clone(),
            source: e,
        })?;

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    let result = ExecResult {
        exit_code,
        stdout,
        stderr,
    };

    if result.success() {
        tracing::trace!(command = %command, exit_code = exit_code, "Command succeeded");
    } else {
        tracing::warn!(
            command = %command,
            exit_code = exit_code,
            stderr = %result.stderr,
            "Command failed"
        );
    }

    Ok(result)
}

/// Executes an external command and returns its stdout, erroring on
/// non-zero exit.
///
/// # Returns
///
/// * `Ok(String)` - The stdout output on success
/// * `Err(CounterMonError)` - If the command fails to spawn or exits non-zero
pub async fn exec_or_throw(program: &str, args: &[String]) -> CounterMonResult<String> {
    let result = exec(program, args).await?;
    if result.success() {
        Ok(result.stdout)
    } else {
        Err(CounterMonError::CommandFailed {
            command: display_command(program, args),
            exit_code: result.exit_code,
            output: result.combined_output(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_display_command() {
        assert_eq!(display_command("hostname", &[]), "hostname");
        assert_eq!(
            display_command("typeperf", &args(&["-sc", "1"])),
            "typeperf -sc 1"
        );
    }

    #[test]
    fn test_exec_result_success() {
        let result = ExecResult {
            exit_code: 0,
            stdout: "output".to_string(),
            stderr: "".to_string(),
        };
        assert!(result.success());
        assert_eq!(result.combined_output(), "output");
    }

    #[test]
    fn test_exec_result_failure() {
        let result = ExecResult {
            exit_code: 1,
            stdout: "".to_string(),
            stderr: "error message".to_string(),
        };
        assert!(!result.success());
        assert_eq!(result.combined_output(), "error message");
    }

    #[test]
    fn test_exec_result_combined() {
        let result = ExecResult {
            exit_code: 0,
            stdout: "stdout".to_string(),
            stderr: "stderr".to_string(),
        };
        assert_eq!(result.combined_output(), "stdout\nstderr");
    }

    #[tokio::test]
    async fn test_exec_echo() {
        let result = exec("echo", &args(&["hello"])).await.unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "hello\n");
    }

    #[tokio::test]
    async fn test_exec_preserves_argument_spaces() {
        let result = exec("echo", &args(&[r"\Memory\Available MBytes"]))
            .await
            .unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "\\Memory\\Available MBytes\n");
    }

    #[tokio::test]
    async fn test_exec_nonzero_exit() {
        let result = exec("sh", &args(&["-c", "exit 42"])).await.unwrap();
        assert!(!result.success());
        assert_eq!(result.exit_code, 42);
    }

    #[tokio::test]
    async fn test_exec_spawn_failure() {
        let result = exec("countermon-no-such-binary", &[]).await;
        assert!(matches!(
            result,
            Err(CounterMonError::CommandExec { .. })
        ));
    }

    #[tokio::test]
    async fn test_exec_or_throw_success() {
        let output = exec_or_throw("echo", &args(&["success"])).await.unwrap();
        assert_eq!(output, "success\n");
    }

    #[tokio::test]
    async fn test_exec_or_throw_failure() {
        let result = exec_or_throw("sh", &args(&["-c", "exit 1"])).await;
        match result {
            Err(CounterMonError::CommandFailed { exit_code, .. }) => {
                assert_eq!(exit_code, 1);
            }
            _ => panic!("Expected CommandFailed error"),
        }
    }
}
