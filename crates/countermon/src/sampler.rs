//! Sampler invocation: one shot, full counter set as arguments.

use countermon_common::error::{CounterMonError, CounterMonResult};
use countermon_common::process;

/// Number of samples requested from the sampler per run.
const SAMPLE_COUNT: &str = "1";

/// Builds the sampler argument vector: `-sc 1 <path>...`.
///
/// Counter paths are passed as separate process arguments, so embedded
/// spaces and parentheses survive without any quoting.
pub fn sampler_args(paths: &[&str]) -> Vec<String> {
    let mut args = Vec::with_capacity(paths.len() + 2);
    args.push("-sc".to_string());
    args.push(SAMPLE_COUNT.to_string());
    args.extend(paths.iter().map(|p| p.to_string()));
    args
}

/// Runs the sampler once against the configured counter set and returns its
/// raw tabular output. A spawn failure or non-zero exit is an operational
/// fault, not a CRITICAL check result.
pub async fn collect(sampler_cmd: &str, paths: &[&str]) -> CounterMonResult<String> {
    tracing::info!(sampler = %sampler_cmd, counters = paths.len(), "Collecting sample");
    process::exec_or_throw(sampler_cmd, &sampler_args(paths)).await
}

/// Resolves the local hostname, the default global scheme prefix.
pub async fn resolve_hostname() -> CounterMonResult<String> {
    let output = process::exec_or_throw(process::HOSTNAME_CMD, &[]).await?;
    let name = output.trim().to_string();
    if name.is_empty() {
        return Err(CounterMonError::internal(
            "hostname resolved to an empty string",
        ));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sampler_args() {
        let args = sampler_args(&[r"\Memory\Available MBytes", r"\System\Processes"]);
        assert_eq!(
            args,
            vec![
                "-sc",
                "1",
                r"\Memory\Available MBytes",
                r"\System\Processes",
            ]
        );
    }

    #[test]
    fn test_sampler_args_no_paths() {
        assert_eq!(sampler_args(&[]), vec!["-sc", "1"]);
    }

    #[tokio::test]
    async fn test_collect_passes_paths_through() {
        // `echo` stands in for the sampler; its output echoes the argument
        // vector back, spaces intact.
        let output = collect("echo", &[r"\Memory\Available MBytes"]).await.unwrap();
        assert_eq!(output, "-sc 1 \\Memory\\Available MBytes\n");
    }

    #[tokio::test]
    async fn test_collect_sampler_failure() {
        let result = collect("false", &[]).await;
        assert!(matches!(
            result,
            Err(CounterMonError::CommandFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_hostname() {
        let name = resolve_hostname().await.unwrap();
        assert!(!name.is_empty());
        assert!(!name.contains('\n'));
    }
}
