//! Input actions profile

use serde::{Deserialize, Serialize};

use super::ProfileError;
use crate::input::{AxisConstraint, InputAction};

/// Every action the application can raise
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputActionsProfile {
    #[serde(default)]
    pub actions: Vec<InputAction>,
}

impl InputActionsProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new action with the next free id
    pub fn add_action(
        &mut self,
        description: impl Into<String>,
        axis_constraint: AxisConstraint,
    ) -> &InputAction {
        let id = self.actions.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        self.actions
            .push(InputAction::new(id, description, axis_constraint));
        &self.actions[self.actions.len() - 1]
    }

    /// Removes an action by id, returning it if present
    pub fn remove_action(&mut self, id: u32) -> Option<InputAction> {
        let index = self.actions.iter().position(|a| a.id == id)?;
        Some(self.actions.remove(index))
    }

    pub fn get(&self, id: u32) -> Option<&InputAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    pub fn find_by_description(&self, description: &str) -> Option<&InputAction> {
        self.actions.iter().find(|a| a.description == description)
    }

    /// Actions sharing the given constraint
    pub fn with_constraint(
        &self,
        constraint: AxisConstraint,
    ) -> impl Iterator<Item = &InputAction> {
        self.actions
            .iter()
            .filter(move |a| a.axis_constraint == constraint)
    }

    /// Checks that `action` is defined here with the same constraint
    pub fn check_known(&self, action: &InputAction) -> Result<(), ProfileError> {
        match self.get(action.id) {
            None => Err(ProfileError::UnknownAction { id: action.id }),
            Some(known) if known.axis_constraint != action.axis_constraint => {
                Err(ProfileError::ActionConstraintMismatch {
                    id: action.id,
                    declared: known.axis_constraint,
                    referenced: action.axis_constraint,
                })
            }
            Some(_) => Ok(()),
        }
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        let mut seen = std::collections::HashSet::new();
        for action in &self.actions {
            if action.is_none() {
                return Err(ProfileError::ReservedActionId);
            }
            if !seen.insert(action.id) {
                return Err(ProfileError::DuplicateActionId(action.id));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
