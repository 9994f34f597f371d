//! Input events raised through the router

use std::time::Duration;

use chrono::{DateTime, Utc};
use glam::{Quat, Vec2, Vec3};

use super::types::{
    AxisConstraint, Handedness, InputAction, PointerId, Pose, SourceId, TargetId, TrackingState,
};

/// Optional qualifiers shared by pointer and generic input events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOptions {
    /// Handedness of the event, `None` when not hand-specific
    pub handedness: Handedness,
    /// Originating source, when not implied by the pointer
    pub source: Option<SourceId>,
}

impl EventOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    pub fn with_source(mut self, source: SourceId) -> Self {
        self.source = Some(source);
        self
    }
}

/// Position reported for a source: screen-space or world-space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourcePosition {
    TwoD(Vec2),
    ThreeD(Vec3),
}

/// Typed payload for gesture updates and completions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePayload {
    DualAxis(Vec2),
    Position(Vec3),
    Rotation(Quat),
    Pose(Pose),
}

impl GesturePayload {
    /// The axis constraint this payload shape corresponds to
    pub fn axis_constraint(&self) -> AxisConstraint {
        match self {
            GesturePayload::DualAxis(_) => AxisConstraint::DualAxis,
            GesturePayload::Position(_) => AxisConstraint::ThreeDofPosition,
            GesturePayload::Rotation(_) => AxisConstraint::ThreeDofRotation,
            GesturePayload::Pose(_) => AxisConstraint::SixDof,
        }
    }
}

/// Phase of a gesture lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    Started,
    Updated,
    Completed,
    Canceled,
}

/// Value carried by axis-typed generic input events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisValue {
    DualAxis(Vec2),
    Position(Vec3),
    Rotation(Quat),
    Pose(Pose),
}

/// Confidence of a speech recognition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecognitionConfidence {
    High,
    Medium,
    Low,
    Unrecognized,
}

/// Audio captured alongside dictation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioClip {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl AudioClip {
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// Stage of a dictation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictationStage {
    Hypothesis,
    Result,
    Complete,
    Error,
}

/// Everything the router can deliver to subscribers and handlers
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Disable stack became empty
    InputEnabled,
    /// Disable stack became non-empty
    InputDisabled,

    SourceDetected {
        source: SourceId,
        has_controller: bool,
    },
    SourceLost {
        source: SourceId,
    },
    SourceTrackingStateChanged {
        source: SourceId,
        state: TrackingState,
    },
    SourcePositionChanged {
        source: SourceId,
        position: SourcePosition,
    },
    SourceRotationChanged {
        source: SourceId,
        rotation: Quat,
    },
    SourcePoseChanged {
        source: SourceId,
        pose: Pose,
    },

    PreFocusChanged {
        pointer: PointerId,
        old: Option<TargetId>,
        new: Option<TargetId>,
    },
    FocusChanged {
        pointer: PointerId,
        old: Option<TargetId>,
        new: Option<TargetId>,
    },
    FocusEnter {
        pointer: PointerId,
        target: TargetId,
    },
    FocusExit {
        pointer: PointerId,
        target: TargetId,
    },

    PointerDown {
        pointer: PointerId,
        action: InputAction,
        options: EventOptions,
    },
    PointerUp {
        pointer: PointerId,
        action: InputAction,
        options: EventOptions,
    },
    PointerClicked {
        pointer: PointerId,
        action: InputAction,
        count: u32,
        options: EventOptions,
    },

    InputDown {
        source: SourceId,
        action: InputAction,
        handedness: Handedness,
    },
    InputUp {
        source: SourceId,
        action: InputAction,
        handedness: Handedness,
    },
    InputPressed {
        source: SourceId,
        action: InputAction,
        handedness: Handedness,
        press_amount: Option<f32>,
    },
    AxisInputChanged {
        source: SourceId,
        action: InputAction,
        handedness: Handedness,
        value: AxisValue,
    },

    Gesture {
        source: SourceId,
        action: InputAction,
        phase: GesturePhase,
        payload: Option<GesturePayload>,
    },

    SpeechCommandRecognized {
        source: SourceId,
        action: InputAction,
        confidence: RecognitionConfidence,
        phrase_duration: Duration,
        phrase_start: DateTime<Utc>,
        text: String,
    },

    Dictation {
        source: SourceId,
        stage: DictationStage,
        text: String,
        audio: Option<AudioClip>,
    },
}

/// Discriminant used to key subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    InputEnabled,
    InputDisabled,
    SourceDetected,
    SourceLost,
    SourceTrackingStateChanged,
    SourcePositionChanged,
    SourceRotationChanged,
    SourcePoseChanged,
    PreFocusChanged,
    FocusChanged,
    FocusEnter,
    FocusExit,
    PointerDown,
    PointerUp,
    PointerClicked,
    InputDown,
    InputUp,
    InputPressed,
    AxisInputChanged,
    Gesture,
    SpeechCommandRecognized,
    Dictation,
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::InputEnabled => EventKind::InputEnabled,
            InputEvent::InputDisabled => EventKind::InputDisabled,
            InputEvent::SourceDetected { .. } => EventKind::SourceDetected,
            InputEvent::SourceLost { .. } => EventKind::SourceLost,
            InputEvent::SourceTrackingStateChanged { .. } => EventKind::SourceTrackingStateChanged,
            InputEvent::SourcePositionChanged { .. } => EventKind::SourcePositionChanged,
            InputEvent::SourceRotationChanged { .. } => EventKind::SourceRotationChanged,
            InputEvent::SourcePoseChanged { .. } => EventKind::SourcePoseChanged,
            InputEvent::PreFocusChanged { .. } => EventKind::PreFocusChanged,
            InputEvent::FocusChanged { .. } => EventKind::FocusChanged,
            InputEvent::FocusEnter { .. } => EventKind::FocusEnter,
            InputEvent::FocusExit { .. } => EventKind::FocusExit,
            InputEvent::PointerDown { .. } => EventKind::PointerDown,
            InputEvent::PointerUp { .. } => EventKind::PointerUp,
            InputEvent::PointerClicked { .. } => EventKind::PointerClicked,
            InputEvent::InputDown { .. } => EventKind::InputDown,
            InputEvent::InputUp { .. } => EventKind::InputUp,
            InputEvent::InputPressed { .. } => EventKind::InputPressed,
            InputEvent::AxisInputChanged { .. } => EventKind::AxisInputChanged,
            InputEvent::Gesture { .. } => EventKind::Gesture,
            InputEvent::SpeechCommandRecognized { .. } => EventKind::SpeechCommandRecognized,
            InputEvent::Dictation { .. } => EventKind::Dictation,
        }
    }

    /// Source the event originates from, if it names one
    pub fn source(&self) -> Option<SourceId> {
        match self {
            InputEvent::SourceDetected { source, .. }
            | InputEvent::SourceLost { source }
            | InputEvent::SourceTrackingStateChanged { source, .. }
            | InputEvent::SourcePositionChanged { source, .. }
            | InputEvent::SourceRotationChanged { source, .. }
            | InputEvent::SourcePoseChanged { source, .. }
            | InputEvent::InputDown { source, .. }
            | InputEvent::InputUp { source, .. }
            | InputEvent::InputPressed { source, .. }
            | InputEvent::AxisInputChanged { source, .. }
            | InputEvent::Gesture { source, .. }
            | InputEvent::SpeechCommandRecognized { source, .. }
            | InputEvent::Dictation { source, .. } => Some(*source),
            InputEvent::PointerDown { options, .. }
            | InputEvent::PointerUp { options, .. }
            | InputEvent::PointerClicked { options, .. } => options.source,
            _ => None,
        }
    }

    /// Pointer the event is raised on, if any
    pub fn pointer(&self) -> Option<PointerId> {
        match self {
            InputEvent::PreFocusChanged { pointer, .. }
            | InputEvent::FocusChanged { pointer, .. }
            | InputEvent::FocusEnter { pointer, .. }
            | InputEvent::FocusExit { pointer, .. }
            | InputEvent::PointerDown { pointer, .. }
            | InputEvent::PointerUp { pointer, .. }
            | InputEvent::PointerClicked { pointer, .. } => Some(*pointer),
            _ => None,
        }
    }

    /// Action carried by the event, if any
    pub fn action(&self) -> Option<&InputAction> {
        match self {
            InputEvent::PointerDown { action, .. }
            | InputEvent::PointerUp { action, .. }
            | InputEvent::PointerClicked { action, .. }
            | InputEvent::InputDown { action, .. }
            | InputEvent::InputUp { action, .. }
            | InputEvent::InputPressed { action, .. }
            | InputEvent::AxisInputChanged { action, .. }
            | InputEvent::Gesture { action, .. }
            | InputEvent::SpeechCommandRecognized { action, .. } => Some(action),
            _ => None,
        }
    }

    /// Hand the event is attributed to; `None` for events without one
    pub fn handedness(&self) -> Handedness {
        match self {
            InputEvent::PointerDown { options, .. }
            | InputEvent::PointerUp { options, .. }
            | InputEvent::PointerClicked { options, .. } => options.handedness,
            InputEvent::InputDown { handedness, .. }
            | InputEvent::InputUp { handedness, .. }
            | InputEvent::InputPressed { handedness, .. }
            | InputEvent::AxisInputChanged { handedness, .. } => *handedness,
            _ => Handedness::None,
        }
    }

    /// Whether the event is a notification about the router itself
    /// rather than routed input
    pub fn is_state_notification(&self) -> bool {
        matches!(self, InputEvent::InputEnabled | InputEvent::InputDisabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_event_source_comes_from_options() {
        let event = InputEvent::PointerDown {
            pointer: PointerId(4),
            action: InputAction::NONE,
            options: EventOptions::new().with_source(SourceId(9)),
        };
        assert_eq!(event.kind(), EventKind::PointerDown);
        assert_eq!(event.source(), Some(SourceId(9)));
        assert_eq!(event.pointer(), Some(PointerId(4)));
    }

    #[test]
    fn test_gesture_payload_constraint() {
        assert_eq!(
            GesturePayload::DualAxis(Vec2::ZERO).axis_constraint(),
            AxisConstraint::DualAxis
        );
        assert_eq!(
            GesturePayload::Pose(Pose::IDENTITY).axis_constraint(),
            AxisConstraint::SixDof
        );
    }

    #[test]
    fn test_audio_clip_duration() {
        let clip = AudioClip {
            sample_rate: 4,
            samples: vec![0.0; 8],
        };
        assert_eq!(clip.duration(), Duration::from_secs(2));
        assert_eq!(AudioClip::default().duration(), Duration::ZERO);
    }

    #[test]
    fn test_enabled_notifications_are_not_routed_input() {
        assert!(InputEvent::InputEnabled.is_state_notification());
        assert!(
            !InputEvent::SourceLost {
                source: SourceId(1)
            }
            .is_state_notification()
        );
    }
}
