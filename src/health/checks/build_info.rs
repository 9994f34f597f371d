//! Build information health check

use crate::build_info;
use crate::health::check::{CheckResult, CheckSteps, SystemCheck};

/// Checks that build metadata was captured
pub struct BuildInfoCheck;

impl BuildInfoCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BuildInfoCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for BuildInfoCheck {
    fn name(&self) -> &'static str {
        "Build Info"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates build metadata (rustc, target, timestamps)")
    }

    fn check(&self) -> CheckResult {
        let mut steps = CheckSteps::new();

        steps.ok(format!("Package: {} {}", build_info::PKG_NAME, build_info::PKG_VERSION));
        steps.ok(format!("Build time: {}", build_info::BUILD_TIMESTAMP));
        steps.ok(format!(
            "Rustc: {} ({})",
            build_info::RUSTC_SEMVER,
            build_info::RUSTC_CHANNEL
        ));
        steps.ok(format!("Target: {}", build_info::CARGO_TARGET_TRIPLE));
        steps.ok(format!("Opt level: {}", build_info::CARGO_OPT_LEVEL));

        match build_info::git_sha_short() {
            Some(sha) => steps.ok(format!("Git: {}", sha)),
            None => steps.ok("Git: not available"),
        }

        steps.finish(
            "Build metadata accessible",
            "Build metadata incomplete",
            "Build metadata missing",
        )
    }
}
