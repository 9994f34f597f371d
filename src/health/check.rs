//! Health check trait and result types

use std::time::Duration;

use colored::Colorize;

/// Status of a system check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    /// Pass or Warn
    pub fn is_ok(&self) -> bool {
        !self.is_fail()
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, CheckStatus::Fail)
    }

    pub fn as_colored_str(&self) -> String {
        match self {
            CheckStatus::Pass => "PASS".green().to_string(),
            CheckStatus::Warn => "WARN".yellow().to_string(),
            CheckStatus::Fail => "FAIL".red().to_string(),
        }
    }
}

/// Result of a system check
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub status: CheckStatus,
    /// Brief message describing the result
    pub message: String,
    /// Optional detailed information, one step per line
    pub details: Option<String>,
    pub duration: Duration,
}

impl CheckResult {
    fn new(status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
            duration: Duration::ZERO,
        }
    }

    pub fn pass(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Pass, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Warn, message)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Fail, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Accumulates ✓/⚠/✗ step lines and derives the overall status from them
#[derive(Debug, Default)]
pub struct CheckSteps {
    lines: Vec<String>,
    worst: Option<CheckStatus>,
}

impl CheckSteps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(&mut self, line: impl AsRef<str>) {
        self.record(CheckStatus::Pass, "✓", line.as_ref());
    }

    pub fn warn(&mut self, line: impl AsRef<str>) {
        self.record(CheckStatus::Warn, "⚠", line.as_ref());
    }

    pub fn fail(&mut self, line: impl AsRef<str>) {
        self.record(CheckStatus::Fail, "✗", line.as_ref());
    }

    /// Records a step as passed or failed depending on `passed`
    pub fn expect(&mut self, passed: bool, line: impl AsRef<str>) -> bool {
        if passed {
            self.ok(line);
        } else {
            self.fail(line);
        }
        passed
    }

    pub fn has_failures(&self) -> bool {
        self.worst == Some(CheckStatus::Fail)
    }

    /// Builds the result, choosing the message matching the worst step
    pub fn finish(self, pass: &str, warn: &str, fail: &str) -> CheckResult {
        let details = self.lines.join("\n");
        let result = match self.worst.unwrap_or(CheckStatus::Pass) {
            CheckStatus::Pass => CheckResult::pass(pass),
            CheckStatus::Warn => CheckResult::warn(warn),
            CheckStatus::Fail => CheckResult::fail(fail),
        };
        result.with_details(details)
    }

    fn record(&mut self, status: CheckStatus, mark: &str, line: &str) {
        self.lines.push(format!("  {} {}", mark, line));
        self.worst = Some(self.worst.map_or(status, |w| w.max(status)));
    }
}

/// Trait for system health checks
pub trait SystemCheck {
    /// Name of the system being checked
    fn name(&self) -> &'static str;

    fn check(&self) -> CheckResult;

    /// What this check validates
    fn description(&self) -> Option<&'static str> {
        None
    }
}
