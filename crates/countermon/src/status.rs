//! Overall check status accumulation.

/// Final health signal of a run, in monitoring-plugin convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckStatus {
    /// Every evaluated bounds check passed (or none were configured).
    #[default]
    Ok,
    /// At least one counter failed a bounds check.
    Critical,
}

impl CheckStatus {
    /// Returns the status name as reported to the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "OK",
            CheckStatus::Critical => "CRITICAL",
        }
    }

    /// Conventional monitoring process exit code.
    pub fn exit_code(&self) -> u8 {
        match self {
            CheckStatus::Ok => 0,
            CheckStatus::Critical => 2,
        }
    }

    /// Records a bounds failure. Critical is sticky: once set it holds for
    /// the remainder of the run.
    pub fn record_failure(&mut self) {
        *self = CheckStatus::Critical;
    }
}
