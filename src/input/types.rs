//! Core input data model: sources, controllers, actions

use std::fmt;
use std::time::Instant;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Unique identifier of an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub u32);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

/// Identifier of a pointer owned by an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u32);

/// Opaque identifier of a scene object that can hold focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u64);

/// Which hand (if any) a source or event is associated with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Handedness {
    #[default]
    None,
    Left,
    Right,
    Both,
    /// Matches any handedness when filtering
    Any,
}

impl Handedness {
    /// Returns true if `other` satisfies this handedness as a filter
    pub fn matches(self, other: Handedness) -> bool {
        match self {
            Handedness::Any => true,
            Handedness::Both => matches!(other, Handedness::Left | Handedness::Right | Handedness::Both),
            h => h == other,
        }
    }
}

/// Tracking state reported for a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    #[default]
    NotTracked,
    Tracked,
    Lost,
}

/// Declared payload shape for an input action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AxisConstraint {
    #[default]
    None,
    Raw,
    Digital,
    SingleAxis,
    DualAxis,
    ThreeDofPosition,
    ThreeDofRotation,
    SixDof,
}

impl AxisConstraint {
    /// Whether input action rules can be defined for this constraint
    pub fn supports_rules(self) -> bool {
        !matches!(self, AxisConstraint::None | AxisConstraint::Raw)
    }
}

/// A named, axis-typed semantic action
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputAction {
    pub id: u32,
    pub description: String,
    #[serde(default)]
    pub axis_constraint: AxisConstraint,
}

impl InputAction {
    /// The "no action" sentinel
    pub const NONE: InputAction = InputAction {
        id: 0,
        description: String::new(),
        axis_constraint: AxisConstraint::None,
    };

    pub fn new(id: u32, description: impl Into<String>, axis_constraint: AxisConstraint) -> Self {
        Self {
            id,
            description: description.into(),
            axis_constraint,
        }
    }

    pub fn is_none(&self) -> bool {
        self.id == Self::NONE.id
    }
}

impl Default for InputAction {
    fn default() -> Self {
        Self::NONE
    }
}

/// Position + orientation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

/// Last spatial sample recorded for a source or controller
#[derive(Debug, Clone, Copy, Default)]
pub struct SpatialSample {
    pub position_2d: Option<Vec2>,
    pub position: Option<Vec3>,
    pub rotation: Option<Quat>,
    /// When any field was last written
    pub updated_at: Option<Instant>,
}

impl SpatialSample {
    pub fn set_position_2d(&mut self, position: Vec2) {
        self.position_2d = Some(position);
        self.touch();
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = Some(position);
        self.touch();
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = Some(rotation);
        self.touch();
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.position = Some(pose.position);
        self.rotation = Some(pose.rotation);
        self.touch();
    }

    /// Full pose, if both position and rotation have been sampled
    pub fn pose(&self) -> Option<Pose> {
        Some(Pose::new(self.position?, self.rotation?))
    }

    fn touch(&mut self) {
        self.updated_at = Some(Instant::now());
    }
}

/// A logical origin of input (hand, controller, voice channel)
#[derive(Debug, Clone)]
pub struct InputSource {
    pub id: SourceId,
    pub name: String,
    pub pointers: Vec<PointerId>,
    pub sample: SpatialSample,
}

impl InputSource {
    pub fn new(id: SourceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            pointers: Vec::new(),
            sample: SpatialSample::default(),
        }
    }

    pub fn with_pointers(mut self, pointers: impl IntoIterator<Item = PointerId>) -> Self {
        self.pointers = pointers.into_iter().collect();
        self
    }
}

/// A trackable device bound to an input source
#[derive(Debug, Clone)]
pub struct Controller {
    pub source_id: SourceId,
    pub handedness: Handedness,
    pub tracking_state: TrackingState,
    pub sample: SpatialSample,
}

impl Controller {
    pub fn new(source_id: SourceId, handedness: Handedness) -> Self {
        Self {
            source_id,
            handedness,
            tracking_state: TrackingState::NotTracked,
            sample: SpatialSample::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_action_sentinel() {
        assert!(InputAction::NONE.is_none());
        assert!(InputAction::default().is_none());
        assert!(!InputAction::new(3, "Select", AxisConstraint::Digital).is_none());
    }

    #[test]
    fn test_handedness_matching() {
        assert!(Handedness::Any.matches(Handedness::Left));
        assert!(Handedness::Both.matches(Handedness::Right));
        assert!(!Handedness::Both.matches(Handedness::None));
        assert!(Handedness::Left.matches(Handedness::Left));
        assert!(!Handedness::Left.matches(Handedness::Right));
    }

    #[test]
    fn test_rule_capable_constraints() {
        assert!(!AxisConstraint::None.supports_rules());
        assert!(!AxisConstraint::Raw.supports_rules());
        assert!(AxisConstraint::Digital.supports_rules());
        assert!(AxisConstraint::SixDof.supports_rules());
    }

    #[test]
    fn test_sample_pose_requires_both_parts() {
        let mut sample = SpatialSample::default();
        assert!(sample.updated_at.is_none());

        sample.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert!(sample.pose().is_none());
        assert!(sample.updated_at.is_some());

        sample.set_rotation(Quat::IDENTITY);
        assert_eq!(
            sample.pose(),
            Some(Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY))
        );
    }
}
