//! `raise_*` operations: one canonical entry point per event kind

use std::time::Duration;

use chrono::{DateTime, Utc};
use glam::Quat;
use tracing::{debug, trace, warn};

use super::{InputRouter, generate_new_source_id};
use crate::input::events::{
    AudioClip, AxisValue, DictationStage, EventOptions, GesturePayload, GesturePhase,
    InputEvent, RecognitionConfidence, SourcePosition,
};
use crate::input::types::{
    Controller, Handedness, InputAction, InputSource, PointerId, Pose, SourceId, TargetId,
    TrackingState,
};
use crate::profile::RuleCriterion;

impl InputRouter {
    // ------------------------------------------------------------------
    // Source lifecycle
    // ------------------------------------------------------------------

    /// Returns a process-unique input source id
    pub fn generate_new_source_id(&self) -> SourceId {
        generate_new_source_id()
    }

    /// Creates a source with a fresh id and adds it to the detected set
    ///
    /// No event is raised; call [`raise_source_detected`](Self::raise_source_detected)
    /// once the device is ready.
    pub fn request_new_generic_input_source(
        &mut self,
        name: impl Into<String>,
        pointers: &[PointerId],
    ) -> InputSource {
        let source =
            InputSource::new(generate_new_source_id(), name).with_pointers(pointers.iter().copied());
        debug!(source = %source.id, name = %source.name, "Registered generic input source");
        self.sources.insert(source.id, source.clone());
        source
    }

    pub fn raise_source_detected(&mut self, source: InputSource, controller: Option<Controller>) {
        if !self.is_valid() {
            return;
        }
        let id = source.id;
        let has_controller = match controller {
            Some(controller) if controller.source_id == id => {
                self.controllers.insert(id, controller);
                true
            }
            Some(controller) => {
                warn!(
                    source = %id,
                    controller_source = %controller.source_id,
                    "Controller does not belong to the detected source, ignoring controller"
                );
                false
            }
            None => false,
        };
        debug!(source = %id, name = %source.name, has_controller, "Source detected");
        self.sources.insert(id, source);
        self.dispatch(InputEvent::SourceDetected {
            source: id,
            has_controller,
        });
    }

    pub fn raise_source_lost(&mut self, source: SourceId) {
        if !self.is_valid() || !self.require_source(source, "source_lost") {
            return;
        }
        if let Some(lost) = self.sources.remove(&source) {
            for pointer in &lost.pointers {
                self.focused.remove(pointer);
                self.entered.retain(|(p, _)| p != pointer);
            }
            debug!(%source, name = %lost.name, "Source lost");
        }
        self.controllers.remove(&source);
        self.dispatch(InputEvent::SourceLost { source });
    }

    pub fn raise_source_tracking_state_changed(&mut self, source: SourceId, state: TrackingState) {
        if !self.is_valid() || !self.require_controller(source, "tracking_state_changed") {
            return;
        }
        if let Some(controller) = self.controllers.get_mut(&source) {
            controller.tracking_state = state;
        }
        self.dispatch(InputEvent::SourceTrackingStateChanged { source, state });
    }

    // ------------------------------------------------------------------
    // Spatial updates
    // ------------------------------------------------------------------

    pub fn raise_source_position_changed(&mut self, source: SourceId, position: SourcePosition) {
        if !self.is_valid() || !self.require_source(source, "source_position_changed") {
            return;
        }
        self.update_samples(source, |sample| match position {
            SourcePosition::TwoD(p) => sample.set_position_2d(p),
            SourcePosition::ThreeD(p) => sample.set_position(p),
        });
        self.dispatch(InputEvent::SourcePositionChanged { source, position });
    }

    pub fn raise_source_rotation_changed(&mut self, source: SourceId, rotation: Quat) {
        if !self.is_valid() || !self.require_source(source, "source_rotation_changed") {
            return;
        }
        self.update_samples(source, |sample| sample.set_rotation(rotation));
        self.dispatch(InputEvent::SourceRotationChanged { source, rotation });
    }

    pub fn raise_source_pose_changed(&mut self, source: SourceId, pose: Pose) {
        if !self.is_valid() || !self.require_source(source, "source_pose_changed") {
            return;
        }
        self.update_samples(source, |sample| sample.set_pose(pose));
        self.dispatch(InputEvent::SourcePoseChanged { source, pose });
    }

    fn update_samples(
        &mut self,
        source: SourceId,
        update: impl Fn(&mut crate::input::types::SpatialSample),
    ) {
        if let Some(s) = self.sources.get_mut(&source) {
            update(&mut s.sample);
        }
        if let Some(c) = self.controllers.get_mut(&source) {
            update(&mut c.sample);
        }
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Informational; focus state is not touched
    pub fn raise_pre_focus_changed(
        &mut self,
        pointer: PointerId,
        old: Option<TargetId>,
        new: Option<TargetId>,
    ) {
        if !self.is_valid() {
            return;
        }
        self.dispatch(InputEvent::PreFocusChanged { pointer, old, new });
    }

    /// Records the pointer's new focus, then notifies
    ///
    /// No-op when `new` is already the pointer's recorded focus, whatever
    /// the caller passes as `old`.
    pub fn raise_focus_changed(
        &mut self,
        pointer: PointerId,
        old: Option<TargetId>,
        new: Option<TargetId>,
    ) {
        if !self.is_valid() {
            return;
        }
        if self.focused.get(&pointer).copied() == new {
            trace!(?pointer, ?old, "Focus unchanged, not raising focus changed");
            return;
        }
        match new {
            Some(target) => self.focused.insert(pointer, target),
            None => self.focused.remove(&pointer),
        };
        self.dispatch(InputEvent::FocusChanged { pointer, old, new });
    }

    /// Fires once per target gaining focus under a pointer
    pub fn raise_focus_enter(&mut self, pointer: PointerId, target: TargetId) {
        if !self.is_valid() {
            return;
        }
        if !self.entered.insert((pointer, target)) {
            trace!(?pointer, ?target, "Focus already entered");
            return;
        }
        self.dispatch(InputEvent::FocusEnter { pointer, target });
    }

    /// Fires once per target losing focus under a pointer
    pub fn raise_focus_exit(&mut self, pointer: PointerId, target: TargetId) {
        if !self.is_valid() {
            return;
        }
        if !self.entered.remove(&(pointer, target)) {
            trace!(?pointer, ?target, "Focus exit without enter");
            return;
        }
        self.dispatch(InputEvent::FocusExit { pointer, target });
    }

    // ------------------------------------------------------------------
    // Pointer events
    // ------------------------------------------------------------------

    pub fn raise_pointer_down(
        &mut self,
        pointer: PointerId,
        action: InputAction,
        options: EventOptions,
    ) {
        if !self.check_pointer_options(&options, "pointer_down") {
            return;
        }
        let action = self.apply_rules(action, RuleCriterion::Digital(true));
        self.dispatch(InputEvent::PointerDown {
            pointer,
            action,
            options,
        });
    }

    pub fn raise_pointer_up(&mut self, pointer: PointerId, action: InputAction, options: EventOptions) {
        if !self.check_pointer_options(&options, "pointer_up") {
            return;
        }
        let action = self.apply_rules(action, RuleCriterion::Digital(false));
        self.dispatch(InputEvent::PointerUp {
            pointer,
            action,
            options,
        });
    }

    pub fn raise_pointer_clicked(
        &mut self,
        pointer: PointerId,
        action: InputAction,
        count: u32,
        options: EventOptions,
    ) {
        if !self.check_pointer_options(&options, "pointer_clicked") {
            return;
        }
        let action = self.apply_rules(action, RuleCriterion::Digital(true));
        self.dispatch(InputEvent::PointerClicked {
            pointer,
            action,
            count,
            options,
        });
    }

    fn check_pointer_options(&self, options: &EventOptions, operation: &'static str) -> bool {
        if !self.is_valid() {
            return false;
        }
        match options.source {
            Some(source) => self.require_source(source, operation),
            None => true,
        }
    }

    // ------------------------------------------------------------------
    // Generic input
    // ------------------------------------------------------------------

    pub fn raise_input_down(&mut self, source: SourceId, action: InputAction, handedness: Handedness) {
        if !self.is_valid() || !self.require_source(source, "input_down") {
            return;
        }
        let action = self.apply_rules(action, RuleCriterion::Digital(true));
        self.dispatch(InputEvent::InputDown {
            source,
            action,
            handedness,
        });
    }

    pub fn raise_input_up(&mut self, source: SourceId, action: InputAction, handedness: Handedness) {
        if !self.is_valid() || !self.require_source(source, "input_up") {
            return;
        }
        let action = self.apply_rules(action, RuleCriterion::Digital(false));
        self.dispatch(InputEvent::InputUp {
            source,
            action,
            handedness,
        });
    }

    /// `press_amount` is expected in 0.0..=1.0; the range is not enforced
    pub fn raise_input_pressed(
        &mut self,
        source: SourceId,
        action: InputAction,
        handedness: Handedness,
        press_amount: Option<f32>,
    ) {
        if !self.is_valid() || !self.require_source(source, "input_pressed") {
            return;
        }
        let criterion = match press_amount {
            Some(amount) => RuleCriterion::SingleAxis(amount),
            None => RuleCriterion::Digital(true),
        };
        let action = self.apply_rules(action, criterion);
        self.dispatch(InputEvent::InputPressed {
            source,
            action,
            handedness,
            press_amount,
        });
    }

    pub fn raise_position_input_changed(
        &mut self,
        source: SourceId,
        action: InputAction,
        handedness: Handedness,
        position: SourcePosition,
    ) {
        let value = match position {
            SourcePosition::TwoD(p) => AxisValue::DualAxis(p),
            SourcePosition::ThreeD(p) => AxisValue::Position(p),
        };
        self.raise_axis_input(source, action, handedness, value, "position_input_changed");
    }

    pub fn raise_rotation_input_changed(
        &mut self,
        source: SourceId,
        action: InputAction,
        handedness: Handedness,
        rotation: Quat,
    ) {
        self.raise_axis_input(
            source,
            action,
            handedness,
            AxisValue::Rotation(rotation),
            "rotation_input_changed",
        );
    }

    pub fn raise_pose_input_changed(
        &mut self,
        source: SourceId,
        action: InputAction,
        handedness: Handedness,
        pose: Pose,
    ) {
        self.raise_axis_input(source, action, handedness, AxisValue::Pose(pose), "pose_input_changed");
    }

    fn raise_axis_input(
        &mut self,
        source: SourceId,
        action: InputAction,
        handedness: Handedness,
        value: AxisValue,
        operation: &'static str,
    ) {
        if !self.is_valid() || !self.require_source(source, operation) {
            return;
        }
        let criterion = match value {
            AxisValue::DualAxis(v) => RuleCriterion::DualAxis(v),
            AxisValue::Position(v) => RuleCriterion::Position(v),
            AxisValue::Rotation(q) => RuleCriterion::Rotation(q),
            AxisValue::Pose(p) => RuleCriterion::Pose(p),
        };
        let action = self.apply_rules(action, criterion);
        self.dispatch(InputEvent::AxisInputChanged {
            source,
            action,
            handedness,
            value,
        });
    }

    /// Substitute the first matching rule action, if any
    fn apply_rules(&self, action: InputAction, value: RuleCriterion) -> InputAction {
        match self.profiles.action_rules.resolve(&action, &value) {
            Some(rule_action) => {
                trace!(base = action.id, rule = rule_action.id, "Input action rule matched");
                rule_action.clone()
            }
            None => action,
        }
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    pub fn raise_gesture_started(&mut self, controller: SourceId, action: InputAction) {
        self.raise_gesture(controller, action, GesturePhase::Started, None);
    }

    pub fn raise_gesture_updated(
        &mut self,
        controller: SourceId,
        action: InputAction,
        payload: Option<GesturePayload>,
    ) {
        self.raise_gesture(controller, action, GesturePhase::Updated, payload);
    }

    pub fn raise_gesture_completed(
        &mut self,
        controller: SourceId,
        action: InputAction,
        payload: Option<GesturePayload>,
    ) {
        self.raise_gesture(controller, action, GesturePhase::Completed, payload);
    }

    pub fn raise_gesture_canceled(&mut self, controller: SourceId, action: InputAction) {
        self.raise_gesture(controller, action, GesturePhase::Canceled, None);
    }

    pub(super) fn raise_gesture(
        &mut self,
        source: SourceId,
        action: InputAction,
        phase: GesturePhase,
        payload: Option<GesturePayload>,
    ) {
        if !self.is_valid() || !self.require_controller(source, "gesture") {
            return;
        }
        if let Some(p) = &payload
            && p.axis_constraint() != action.axis_constraint
        {
            // Not rejected; payload shape is the caller's contract
            trace!(
                action = action.id,
                expected = ?action.axis_constraint,
                found = ?p.axis_constraint(),
                "Gesture payload does not match action constraint"
            );
        }
        self.dispatch(InputEvent::Gesture {
            source,
            action,
            phase,
            payload,
        });
    }

    // ------------------------------------------------------------------
    // Speech and dictation
    // ------------------------------------------------------------------

    pub fn raise_speech_command_recognized(
        &mut self,
        source: SourceId,
        action: InputAction,
        confidence: RecognitionConfidence,
        phrase_duration: Duration,
        phrase_start: DateTime<Utc>,
        text: impl Into<String>,
    ) {
        if !self.is_valid() || !self.require_source(source, "speech_command_recognized") {
            return;
        }
        self.dispatch(InputEvent::SpeechCommandRecognized {
            source,
            action,
            confidence,
            phrase_duration,
            phrase_start,
            text: text.into(),
        });
    }

    pub fn raise_dictation_hypothesis(
        &mut self,
        source: SourceId,
        hypothesis: impl Into<String>,
        audio: Option<AudioClip>,
    ) {
        self.raise_dictation(source, DictationStage::Hypothesis, hypothesis.into(), audio);
    }

    pub fn raise_dictation_result(
        &mut self,
        source: SourceId,
        result: impl Into<String>,
        audio: Option<AudioClip>,
    ) {
        self.raise_dictation(source, DictationStage::Result, result.into(), audio);
    }

    pub fn raise_dictation_complete(
        &mut self,
        source: SourceId,
        result: impl Into<String>,
        audio: Option<AudioClip>,
    ) {
        self.raise_dictation(source, DictationStage::Complete, result.into(), audio);
    }

    pub fn raise_dictation_error(
        &mut self,
        source: SourceId,
        message: impl Into<String>,
        audio: Option<AudioClip>,
    ) {
        self.raise_dictation(source, DictationStage::Error, message.into(), audio);
    }

    fn raise_dictation(
        &mut self,
        source: SourceId,
        stage: DictationStage,
        text: String,
        audio: Option<AudioClip>,
    ) {
        if !self.is_valid() || !self.require_source(source, "dictation") {
            return;
        }
        self.dispatch(InputEvent::Dictation {
            source,
            stage,
            text,
            audio,
        });
    }
}
