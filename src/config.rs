//! Router configuration
//!
//! Supports multiple profiles (debug, release) with different settings.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::profile::InputProfiles;

/// Environment variable prefix for overrides (e.g. XR_INPUT_ROUTER__LOG_DROPPED_EVENTS=true)
pub const ENV_PREFIX: &str = "XR_INPUT";

/// Environment variable selecting the configuration profile
pub const PROFILE_ENV: &str = "XR_INPUT_PROFILE";

/// Runtime behavior of the router
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterSettings {
    /// Log events dropped while input is disabled
    #[serde(default)]
    pub log_dropped_events: bool,
    /// Upper bound on stack commands applied after a single dispatch
    #[serde(default = "default_max_deferred_commands")]
    pub max_deferred_commands: usize,
}

fn default_max_deferred_commands() -> usize {
    1024
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            log_dropped_events: false,
            max_deferred_commands: default_max_deferred_commands(),
        }
    }
}

/// Full router configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    /// Router settings
    #[serde(default)]
    pub router: RouterSettings,
    /// Input actions, gestures and action rules
    #[serde(default)]
    pub profiles: InputProfiles,
}

impl RouterConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Sources, later overriding earlier:
    /// 1. config/{profile}.toml
    /// 2. Environment variables with prefix XR_INPUT_ (e.g., XR_INPUT_ROUTER__LOG_DROPPED_EVENTS=true)
    ///
    /// Config files are searched for in:
    /// 1. Next to the executable (target/debug/config or target/release/config)
    /// 2. In the current directory (./config)
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        Self::load_from(Self::find_config_dir().as_deref(), profile)
    }

    /// Loads `{profile}.toml` from an explicit directory
    ///
    /// With no directory, `config/{profile}` relative to the working
    /// directory is tried.
    pub fn load_from(config_dir: Option<&Path>, profile: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(dir) = config_dir {
            let profile_path = dir.join(profile);
            builder = builder.add_source(File::from(profile_path.as_path()).required(false));
        } else {
            builder =
                builder.add_source(File::with_name(&format!("config/{}", profile)).required(false));
        }

        // Use __ as separator for nested fields (e.g., XR_INPUT_ROUTER__LOG_DROPPED_EVENTS)
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.set_override("profile", profile)?.build()?;

        config.try_deserialize()
    }

    /// Finds the config directory by searching in multiple locations
    pub fn find_config_dir() -> Option<PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }

    /// Loads configuration using the XR_INPUT_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var(PROFILE_ENV).unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }

    /// Built-in configuration with no actions, used when nothing can be loaded
    pub fn builtin(profile: &str) -> Self {
        Self {
            profile: profile.to_string(),
            router: RouterSettings::default(),
            profiles: InputProfiles::default(),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::load("release").unwrap_or_else(|_| Self::builtin("release"))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::input::AxisConstraint;
    use crate::profile::GestureInputType;

    const SAMPLE: &str = r#"
[router]
log_dropped_events = true

[[profiles.input_actions.actions]]
id = 1
description = "Select"
axis_constraint = "Digital"

[[profiles.input_actions.actions]]
id = 2
description = "Navigate"
axis_constraint = "DualAxis"

[[profiles.gestures.gestures]]
description = "Tap"
gesture_type = "Select"
action = { id = 1, description = "Select", axis_constraint = "Digital" }
"#;

    #[test]
    fn test_load_profile_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sample.toml"), SAMPLE).unwrap();

        let config = RouterConfig::load_from(Some(dir.path()), "sample").unwrap();
        assert_eq!(config.profile, "sample");
        assert!(config.router.log_dropped_events);
        assert_eq!(config.router.max_deferred_commands, 1024);
        assert_eq!(config.profiles.input_actions.len(), 2);
        assert_eq!(
            config.profiles.input_actions.get(2).map(|a| a.axis_constraint),
            Some(AxisConstraint::DualAxis)
        );
        assert_eq!(
            config
                .profiles
                .gestures
                .action_for(GestureInputType::Select)
                .map(|a| a.id),
            Some(1)
        );
        assert!(config.profiles.validate().is_ok());
    }

    #[test]
    fn test_missing_profile_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RouterConfig::load_from(Some(dir.path()), "absent").unwrap();
        assert_eq!(config.profile, "absent");
        assert_eq!(config.router, RouterSettings::default());
        assert!(config.profiles.input_actions.is_empty());
    }

    #[test]
    fn test_builtin() {
        let config = RouterConfig::builtin("debug");
        assert_eq!(config.profile, "debug");
        assert!(config.profiles.validate().is_ok());
    }
}
