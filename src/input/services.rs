//! Collaborator services injected into the router

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Quat;

use super::events::{GesturePayload, GesturePhase, SourcePosition};
use super::handler::HandlerRef;
use super::types::{
    Controller, Handedness, InputAction, InputSource, PointerId, Pose, SourceId, TrackingState,
};
use crate::profile::GestureInputType;

/// Resolves which handler currently has focus under a pointer
pub trait FocusProvider {
    /// Name of this provider for diagnostics
    fn name(&self) -> &str;

    /// Handler attached to the object focused by `pointer`, if any
    fn focused_handler(&self, pointer: PointerId) -> Option<HandlerRef>;
}

/// A raw sample reported by a device enumerator during a tick
#[derive(Debug, Clone)]
pub enum DeviceSample {
    SourceDetected {
        source: InputSource,
        controller: Option<Controller>,
    },
    SourceLost(SourceId),
    TrackingStateChanged {
        source: SourceId,
        state: TrackingState,
    },
    Position {
        source: SourceId,
        position: SourcePosition,
    },
    Rotation {
        source: SourceId,
        rotation: Quat,
    },
    Pose {
        source: SourceId,
        pose: Pose,
    },
    ButtonDown {
        source: SourceId,
        action: InputAction,
        handedness: Handedness,
    },
    ButtonUp {
        source: SourceId,
        action: InputAction,
        handedness: Handedness,
    },
    ButtonPressed {
        source: SourceId,
        action: InputAction,
        handedness: Handedness,
        amount: Option<f32>,
    },
    /// Recognized gesture; the action comes from the gestures profile
    Gesture {
        source: SourceId,
        gesture: GestureInputType,
        phase: GesturePhase,
        payload: Option<GesturePayload>,
    },
}

/// Supplies raw device samples once per tick
pub trait DeviceEnumerator {
    /// Name of this enumerator for diagnostics
    fn name(&self) -> &str;

    /// Samples gathered since the previous poll, in arrival order
    fn poll(&mut self) -> Vec<DeviceSample>;
}

/// Collaborators handed to [`InputRouter::initialize`](super::InputRouter::initialize)
#[derive(Default)]
pub struct RouterServices {
    /// Required
    pub focus_provider: Option<Box<dyn FocusProvider>>,
    /// Optional; hosts without one raise events directly
    pub device_enumerator: Option<Box<dyn DeviceEnumerator>>,
}

impl RouterServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_focus_provider(mut self, provider: impl FocusProvider + 'static) -> Self {
        self.focus_provider = Some(Box::new(provider));
        self
    }

    pub fn with_device_enumerator(mut self, enumerator: impl DeviceEnumerator + 'static) -> Self {
        self.device_enumerator = Some(Box::new(enumerator));
        self
    }
}

/// Focus provider backed by an explicit pointer → handler map
///
/// Clones share the same map, so a host can keep one clone to update focus
/// while the router owns another.
#[derive(Clone, Default)]
pub struct FocusMap {
    focused: Rc<RefCell<HashMap<PointerId, HandlerRef>>>,
}

impl FocusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_focus(&self, pointer: PointerId, handler: HandlerRef) {
        self.focused.borrow_mut().insert(pointer, handler);
    }

    pub fn clear_focus(&self, pointer: PointerId) {
        self.focused.borrow_mut().remove(&pointer);
    }
}

impl FocusProvider for FocusMap {
    fn name(&self) -> &str {
        "focus-map"
    }

    fn focused_handler(&self, pointer: PointerId) -> Option<HandlerRef> {
        self.focused.borrow().get(&pointer).cloned()
    }
}

/// Device enumerator fed from a shared queue
///
/// Clones share the queue; push samples on one clone and the router drains
/// them on its next tick.
#[derive(Clone, Default)]
pub struct QueuedDevices {
    pending: Rc<RefCell<Vec<DeviceSample>>>,
}

impl QueuedDevices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, sample: DeviceSample) {
        self.pending.borrow_mut().push(sample);
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl DeviceEnumerator for QueuedDevices {
    fn name(&self) -> &str {
        "queued-devices"
    }

    fn poll(&mut self) -> Vec<DeviceSample> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}
