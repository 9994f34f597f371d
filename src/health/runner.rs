//! Runner for orchestrating health checks

use std::time::Instant;

use tracing::{debug, warn};

use super::check::{CheckResult, CheckStatus, SystemCheck};

/// Results from running a health check suite
#[derive(Debug)]
pub struct HealthCheckReport {
    /// Individual check results with their system names
    pub results: Vec<(String, CheckResult)>,
    /// Total number of checks run
    pub total: usize,
    /// Number of checks that passed
    pub passed: usize,
    /// Number of checks that passed with warnings
    pub warned: usize,
    /// Number of checks that failed
    pub failed: usize,
}

impl HealthCheckReport {
    /// True if no check failed
    pub fn is_healthy(&self) -> bool {
        self.failed == 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warned > 0
    }

    /// 0 = all pass, 1 = any fail, 2 = any warn (but no fail)
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else if self.warned > 0 {
            2
        } else {
            0
        }
    }

    /// Look up a check's result by its system name
    pub fn result(&self, name: &str) -> Option<&CheckResult> {
        self.results
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }
}

/// Orchestrates running health checks and collecting results
#[derive(Default)]
pub struct HealthCheckRunner {
    checks: Vec<Box<dyn SystemCheck>>,
}

impl HealthCheckRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check to the suite
    pub fn add_check<C: SystemCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Names of registered checks, in run order
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Run all checks in registration order and collect the report
    pub fn run(self) -> HealthCheckReport {
        let mut report = HealthCheckReport {
            results: Vec::with_capacity(self.checks.len()),
            total: 0,
            passed: 0,
            warned: 0,
            failed: 0,
        };

        for check in self.checks {
            let name = check.name().to_string();
            let start = Instant::now();
            let result = check.check().with_duration(start.elapsed());

            match result.status {
                CheckStatus::Pass => report.passed += 1,
                CheckStatus::Warn => report.warned += 1,
                CheckStatus::Fail => {
                    warn!(check = %name, message = %result.message, "Health check failed");
                    report.failed += 1;
                }
            }
            debug!(check = %name, status = ?result.status, duration = ?result.duration, "Health check finished");

            report.results.push((name, result));
        }

        report.total = report.results.len();
        report
    }
}
