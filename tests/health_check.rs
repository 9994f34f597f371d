//! Integration tests for the health check system

use xr_input::health::{self, CheckResult, CheckStatus, HealthCheckRunner, SystemCheck, checks::*};

#[test]
fn test_all_health_checks() {
    let report = health::run_all_checks();

    // Print report for debugging if tests fail
    if !report.is_healthy() {
        eprintln!("\n{}", health::format_report(&report));
        eprintln!("{}", health::format_details(&report));
    }

    assert!(
        report.is_healthy(),
        "Health checks failed: {} failures, {} warnings",
        report.failed,
        report.warned
    );
    assert_eq!(report.total, 3);
}

#[test]
fn test_config_check() {
    let result = ConfigCheck::new().check();

    assert!(
        result.status.is_ok(),
        "Config check failed: {}",
        result.message
    );
    let details = result.details.unwrap_or_default();
    assert!(details.contains("Profile 'release'"), "{}", details);
    assert!(details.contains("Profile 'debug'"), "{}", details);
}

#[test]
fn test_router_check() {
    let result = RouterCheck::new().check();

    assert_eq!(
        result.status,
        CheckStatus::Pass,
        "Router check failed: {}\n{}",
        result.message,
        result.details.unwrap_or_default()
    );
}

#[test]
fn test_build_info_check() {
    let result = BuildInfoCheck::new().check();

    assert!(
        result.status.is_ok(),
        "Build info check failed: {}",
        result.message
    );
}

struct Fixed(CheckStatus);

impl SystemCheck for Fixed {
    fn name(&self) -> &'static str {
        match self.0 {
            CheckStatus::Pass => "Fixed Pass",
            CheckStatus::Warn => "Fixed Warn",
            CheckStatus::Fail => "Fixed Fail",
        }
    }

    fn check(&self) -> CheckResult {
        let result = match self.0 {
            CheckStatus::Pass => CheckResult::pass("fine"),
            CheckStatus::Warn => CheckResult::warn("degraded"),
            CheckStatus::Fail => CheckResult::fail("broken"),
        };
        result.with_details(format!("  {:?}", self.0))
    }
}

#[test]
fn test_runner_collects_all_checks() {
    let report = HealthCheckRunner::new()
        .add_check(ConfigCheck::new())
        .add_check(RouterCheck::new())
        .run();

    assert_eq!(report.total, 2, "Expected 2 checks in report");
    assert_eq!(report.passed + report.warned + report.failed, report.total);
    assert!(report.result("Input Router").is_some());
    assert!(report.result("Missing").is_none());
}

#[test]
fn test_report_exit_codes() {
    let pass = HealthCheckRunner::new()
        .add_check(Fixed(CheckStatus::Pass))
        .run();
    assert_eq!(pass.exit_code(), 0);

    let warn = HealthCheckRunner::new()
        .add_check(Fixed(CheckStatus::Pass))
        .add_check(Fixed(CheckStatus::Warn))
        .run();
    assert_eq!(warn.exit_code(), 2);
    assert!(warn.is_healthy());

    let fail = HealthCheckRunner::new()
        .add_check(Fixed(CheckStatus::Warn))
        .add_check(Fixed(CheckStatus::Fail))
        .run();
    assert_eq!(fail.exit_code(), 1);
    assert!(!fail.is_healthy());
}

#[test]
fn test_details_list_failures_first() {
    let report = HealthCheckRunner::new()
        .add_check(Fixed(CheckStatus::Pass))
        .add_check(Fixed(CheckStatus::Fail))
        .run();

    let details = health::format_details(&report);
    let fail_at = details.find("Fixed Fail");
    let pass_at = details.find("Fixed Pass");
    assert!(fail_at.is_some());
    if let (Some(fail_at), Some(pass_at)) = (fail_at, pass_at) {
        assert!(fail_at < pass_at);
    }
}
