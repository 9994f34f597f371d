//! Gestures profile: gesture-to-action mappings and platform recognizer settings

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::ProfileError;
use super::actions::InputActionsProfile;
use crate::input::InputAction;

/// Kind of gesture a recognizer can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GestureInputType {
    #[default]
    None,
    Hold,
    Manipulation,
    Navigation,
    Select,
}

impl GestureInputType {
    pub const ALL: [GestureInputType; 4] = [
        GestureInputType::Hold,
        GestureInputType::Manipulation,
        GestureInputType::Navigation,
        GestureInputType::Select,
    ];
}

bitflags! {
    /// Gestures the platform recognizer should listen for
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct GestureSettings: u32 {
        const TAP = 1;
        const DOUBLE_TAP = 1 << 1;
        const HOLD = 1 << 2;
        const MANIPULATION_TRANSLATE = 1 << 3;
        const NAVIGATION_X = 1 << 4;
        const NAVIGATION_Y = 1 << 5;
        const NAVIGATION_Z = 1 << 6;
        const NAVIGATION_RAILS_X = 1 << 7;
        const NAVIGATION_RAILS_Y = 1 << 8;
        const NAVIGATION_RAILS_Z = 1 << 9;
    }
}

/// Whether gesture recognizers start with the input system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AutoStartBehavior {
    #[default]
    AutoStart,
    ManualStart,
}

/// Binds a gesture type to the action it raises
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureMapping {
    pub description: String,
    pub gesture_type: GestureInputType,
    #[serde(default)]
    pub action: InputAction,
}

fn default_manipulation() -> GestureSettings {
    GestureSettings::MANIPULATION_TRANSLATE
}

fn default_navigation() -> GestureSettings {
    GestureSettings::NAVIGATION_X | GestureSettings::NAVIGATION_Y | GestureSettings::NAVIGATION_Z
}

/// Gesture configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GesturesProfile {
    #[serde(default)]
    pub gestures: Vec<GestureMapping>,
    #[serde(default = "default_manipulation")]
    pub manipulation_gestures: GestureSettings,
    #[serde(default = "default_navigation")]
    pub navigation_gestures: GestureSettings,
    #[serde(default)]
    pub use_rails_navigation: bool,
    #[serde(default = "default_navigation")]
    pub rails_navigation_gestures: GestureSettings,
    #[serde(default)]
    pub auto_start: AutoStartBehavior,
}

impl Default for GesturesProfile {
    fn default() -> Self {
        Self {
            gestures: Vec::new(),
            manipulation_gestures: default_manipulation(),
            navigation_gestures: default_navigation(),
            use_rails_navigation: false,
            rails_navigation_gestures: default_navigation(),
            auto_start: AutoStartBehavior::AutoStart,
        }
    }
}

impl GesturesProfile {
    /// Adds a mapping; each gesture type may be mapped once
    pub fn add_gesture(
        &mut self,
        description: impl Into<String>,
        gesture_type: GestureInputType,
        action: InputAction,
    ) -> Result<(), ProfileError> {
        Self::check_type(gesture_type)?;
        if self.mapping(gesture_type).is_some() {
            return Err(ProfileError::DuplicateGesture(gesture_type));
        }
        self.gestures.push(GestureMapping {
            description: description.into(),
            gesture_type,
            action,
        });
        Ok(())
    }

    pub fn remove_gesture(&mut self, gesture_type: GestureInputType) -> Option<GestureMapping> {
        let index = self
            .gestures
            .iter()
            .position(|g| g.gesture_type == gesture_type)?;
        Some(self.gestures.remove(index))
    }

    pub fn mapping(&self, gesture_type: GestureInputType) -> Option<&GestureMapping> {
        self.gestures.iter().find(|g| g.gesture_type == gesture_type)
    }

    /// Action bound to a gesture type, skipping unbound mappings
    pub fn action_for(&self, gesture_type: GestureInputType) -> Option<&InputAction> {
        self.mapping(gesture_type)
            .map(|g| &g.action)
            .filter(|a| !a.is_none())
    }

    /// Gesture types not yet mapped
    pub fn unmapped_types(&self) -> Vec<GestureInputType> {
        GestureInputType::ALL
            .into_iter()
            .filter(|t| self.mapping(*t).is_none())
            .collect()
    }

    /// Navigation gestures in effect, honoring the rails toggle
    pub fn effective_navigation(&self) -> GestureSettings {
        if self.use_rails_navigation {
            self.rails_navigation_gestures
        } else {
            self.navigation_gestures
        }
    }

    pub fn validate(&self, actions: &InputActionsProfile) -> Result<(), ProfileError> {
        let mut seen = std::collections::HashSet::new();
        for mapping in &self.gestures {
            Self::check_type(mapping.gesture_type)?;
            if !seen.insert(mapping.gesture_type) {
                return Err(ProfileError::DuplicateGesture(mapping.gesture_type));
            }
            if !mapping.action.is_none() {
                actions.check_known(&mapping.action)?;
            }
        }
        Ok(())
    }

    fn check_type(gesture_type: GestureInputType) -> Result<(), ProfileError> {
        if gesture_type == GestureInputType::None {
            Err(ProfileError::UndefinedGestureType)
        } else {
            Ok(())
        }
    }
}
