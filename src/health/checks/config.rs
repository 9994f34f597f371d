//! Configuration and profile health check

use crate::config::RouterConfig;
use crate::health::check::{CheckResult, CheckSteps, SystemCheck};

/// Checks that every configuration profile loads and its input profiles validate
pub struct ConfigCheck {
    profiles: Vec<&'static str>,
}

impl ConfigCheck {
    pub fn new() -> Self {
        Self {
            profiles: vec!["debug", "release"],
        }
    }

    pub fn with_profiles(profiles: Vec<&'static str>) -> Self {
        Self { profiles }
    }
}

impl Default for ConfigCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for ConfigCheck {
    fn name(&self) -> &'static str {
        "Configuration"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates configuration loading and input profile consistency")
    }

    fn check(&self) -> CheckResult {
        let mut steps = CheckSteps::new();

        if RouterConfig::find_config_dir().is_none() {
            steps.warn("No config directory found, built-in defaults apply");
        }

        for profile in &self.profiles {
            let config = match RouterConfig::load(profile) {
                Ok(config) => config,
                Err(e) => {
                    steps.fail(format!("Profile '{}': failed to load - {}", profile, e));
                    continue;
                }
            };

            let p = &config.profiles;
            match p.validate() {
                Ok(()) => steps.ok(format!(
                    "Profile '{}': {} actions, {} gestures, {} rules",
                    profile,
                    p.input_actions.len(),
                    p.gestures.gestures.len(),
                    p.action_rules.len()
                )),
                Err(e) => steps.fail(format!("Profile '{}': invalid input profiles - {}", profile, e)),
            }
        }

        match RouterConfig::load_from_env() {
            Ok(config) => steps.ok(format!("Environment config: profile '{}' loaded", config.profile)),
            Err(e) => steps.warn(format!("Environment config: {}", e)),
        }

        let validated = format!("{} profiles validated", self.profiles.len());
        steps.finish(
            &validated,
            "Config loaded with warnings",
            "Failed to load one or more config profiles",
        )
    }
}
