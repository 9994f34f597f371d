//! Input action rules: alternative actions raised when a value matches a criterion

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::ProfileError;
use super::actions::InputActionsProfile;
use crate::input::{AxisConstraint, InputAction, Pose};

/// Value a rule compares against, shaped by the base action's constraint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCriterion {
    Digital(bool),
    SingleAxis(f32),
    DualAxis(Vec2),
    Position(Vec3),
    Rotation(Quat),
    Pose(Pose),
}

impl RuleCriterion {
    pub fn axis_constraint(&self) -> AxisConstraint {
        match self {
            RuleCriterion::Digital(_) => AxisConstraint::Digital,
            RuleCriterion::SingleAxis(_) => AxisConstraint::SingleAxis,
            RuleCriterion::DualAxis(_) => AxisConstraint::DualAxis,
            RuleCriterion::Position(_) => AxisConstraint::ThreeDofPosition,
            RuleCriterion::Rotation(_) => AxisConstraint::ThreeDofRotation,
            RuleCriterion::Pose(_) => AxisConstraint::SixDof,
        }
    }
}

/// Raises `rule_action` in place of `base_action` when the event value equals `criterion`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputActionRule {
    pub base_action: InputAction,
    pub rule_action: InputAction,
    pub criterion: RuleCriterion,
}

impl InputActionRule {
    /// Structural checks that do not depend on other rules
    pub fn check(&self) -> Result<(), ProfileError> {
        let base = &self.base_action;
        let rule = &self.rule_action;
        if base.is_none() || rule.is_none() {
            return Err(ProfileError::RuleMissingAction);
        }
        if !base.axis_constraint.supports_rules() {
            return Err(ProfileError::RuleUnsupportedConstraint(base.axis_constraint));
        }
        if base.id == rule.id {
            return Err(ProfileError::RuleTargetsItself(base.id));
        }
        if base.axis_constraint != rule.axis_constraint {
            return Err(ProfileError::RuleConstraintMismatch {
                base: base.axis_constraint,
                rule: rule.axis_constraint,
            });
        }
        if self.criterion.axis_constraint() != base.axis_constraint {
            return Err(ProfileError::RuleCriterionMismatch {
                expected: base.axis_constraint,
                found: self.criterion.axis_constraint(),
            });
        }
        Ok(())
    }
}

/// All configured rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputActionRulesProfile {
    #[serde(default)]
    pub rules: Vec<InputActionRule>,
}

impl InputActionRulesProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(
        &mut self,
        base_action: InputAction,
        rule_action: InputAction,
        criterion: RuleCriterion,
    ) -> Result<(), ProfileError> {
        let rule = InputActionRule {
            base_action,
            rule_action,
            criterion,
        };
        rule.check()?;
        if self.rules.contains(&rule) {
            return Err(ProfileError::DuplicateRule {
                base: rule.base_action.id,
                rule: rule.rule_action.id,
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn remove_rule(&mut self, index: usize) -> Option<InputActionRule> {
        (index < self.rules.len()).then(|| self.rules.remove(index))
    }

    /// Rules whose base action is `action`
    pub fn rules_for<'a>(
        &'a self,
        action: &InputAction,
    ) -> impl Iterator<Item = &'a InputActionRule> + use<'a> {
        let id = action.id;
        self.rules.iter().filter(move |r| r.base_action.id == id)
    }

    /// First rule action whose criterion equals `value`
    pub fn resolve(&self, action: &InputAction, value: &RuleCriterion) -> Option<&InputAction> {
        self.rules_for(action)
            .find(|r| &r.criterion == value)
            .map(|r| &r.rule_action)
    }

    pub fn validate(&self, actions: &InputActionsProfile) -> Result<(), ProfileError> {
        for (i, rule) in self.rules.iter().enumerate() {
            rule.check()?;
            actions.check_known(&rule.base_action)?;
            actions.check_known(&rule.rule_action)?;
            if self.rules[..i].contains(rule) {
                return Err(ProfileError::DuplicateRule {
                    base: rule.base_action.id,
                    rule: rule.rule_action.id,
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
