//! Health check system for validating configuration and router behavior
//!
//! Useful for:
//! - Validating a deployment's configuration profile
//! - CI/CD health checks
//! - Debugging routing problems without a device attached
//!
//! # Example
//!
//! ```no_run
//! use xr_input::health::{HealthCheckRunner, checks::*};
//!
//! let report = HealthCheckRunner::new()
//!     .add_check(ConfigCheck::new())
//!     .add_check(RouterCheck::new())
//!     .add_check(BuildInfoCheck::new())
//!     .run();
//!
//! if report.is_healthy() {
//!     println!("All systems operational!");
//! }
//! ```

pub mod check;
pub mod checks;
pub mod reporter;
pub mod runner;

pub use check::{CheckResult, CheckStatus, CheckSteps, SystemCheck};
pub use reporter::{format_details, format_report, print_report};
pub use runner::{HealthCheckReport, HealthCheckRunner};

/// Runs all default health checks and returns a report
pub fn run_all_checks() -> HealthCheckReport {
    HealthCheckRunner::new()
        .add_check(checks::ConfigCheck::new())
        .add_check(checks::RouterCheck::new())
        .add_check(checks::BuildInfoCheck::new())
        .run()
}
