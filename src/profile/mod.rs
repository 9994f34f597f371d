//! Configuration profiles for the input system
//!
//! Profiles are plain data loaded through [`crate::config::RouterConfig`]:
//! - [`InputActionsProfile`]: every action the application can raise
//! - [`GesturesProfile`]: gesture-to-action bindings and recognizer settings
//! - [`InputActionRulesProfile`]: criterion-based action substitution
//!
//! Each profile validates itself against the actions profile so that a
//! router is never initialized with dangling action references.

pub mod actions;
pub mod gestures;
pub mod rules;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::AxisConstraint;

pub use actions::InputActionsProfile;
pub use gestures::{
    AutoStartBehavior, GestureInputType, GestureMapping, GestureSettings, GesturesProfile,
};
pub use rules::{InputActionRule, InputActionRulesProfile, RuleCriterion};

/// Invalid profile content
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("action id 0 is reserved for the None action")]
    ReservedActionId,
    #[error("action id {0} is defined more than once")]
    DuplicateActionId(u32),
    #[error("action id {id} is not defined in the input actions profile")]
    UnknownAction { id: u32 },
    #[error("action {id} is declared as {declared:?} but referenced as {referenced:?}")]
    ActionConstraintMismatch {
        id: u32,
        declared: AxisConstraint,
        referenced: AxisConstraint,
    },
    #[error("gesture mapping has no gesture type")]
    UndefinedGestureType,
    #[error("gesture {0:?} is mapped more than once")]
    DuplicateGesture(GestureInputType),
    #[error("rule needs both a base action and a rule action")]
    RuleMissingAction,
    #[error("rules cannot be defined for {0:?} actions")]
    RuleUnsupportedConstraint(AxisConstraint),
    #[error("rule action {0} is the same as its base action")]
    RuleTargetsItself(u32),
    #[error("rule action constraint {rule:?} does not match base constraint {base:?}")]
    RuleConstraintMismatch {
        base: AxisConstraint,
        rule: AxisConstraint,
    },
    #[error("rule criterion is {found:?} but base action expects {expected:?}")]
    RuleCriterionMismatch {
        expected: AxisConstraint,
        found: AxisConstraint,
    },
    #[error("rule {base} -> {rule} with this criterion already exists")]
    DuplicateRule { base: u32, rule: u32 },
}

/// All profiles the router consumes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputProfiles {
    #[serde(default)]
    pub input_actions: InputActionsProfile,
    #[serde(default)]
    pub gestures: GesturesProfile,
    #[serde(default)]
    pub action_rules: InputActionRulesProfile,
}

impl InputProfiles {
    pub fn validate(&self) -> Result<(), ProfileError> {
        self.input_actions.validate()?;
        self.gestures.validate(&self.input_actions)?;
        self.action_rules.validate(&self.input_actions)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputAction;

    #[test]
    fn test_validate_reports_first_failing_profile() {
        let mut profiles = InputProfiles::default();
        assert!(profiles.validate().is_ok());

        profiles
            .gestures
            .add_gesture(
                "Hold",
                GestureInputType::Hold,
                InputAction::new(3, "Hold", AxisConstraint::Digital),
            )
            .unwrap();
        assert_eq!(
            profiles.validate(),
            Err(ProfileError::UnknownAction { id: 3 })
        );

        profiles.input_actions.add_action("Select", AxisConstraint::Digital);
        profiles.input_actions.add_action("Menu", AxisConstraint::Digital);
        profiles.input_actions.add_action("Hold", AxisConstraint::Digital);
        assert!(profiles.validate().is_ok());
    }
}
