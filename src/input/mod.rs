//! Input event routing
//!
//! Provides a stack-based input routing system that:
//! - Tracks detected input sources and their controllers
//! - Suppresses input while any caller holds a disable request
//! - Notifies subscribers of every event in registration order
//! - Routes events to modal, focused and fallback handlers
//! - Substitutes actions according to the input action rules profile
//!
//! # Architecture
//!
//! ```text
//! DeviceEnumerator ─┐
//!                   ├→ InputRouter::raise_* → disable gate
//! host code ────────┘                             ↓
//!                                          subscribers (all)
//!                                                 ↓
//!                                   modal stack (top → bottom)
//!                                                 ↓
//!                                  focused handler (FocusProvider)
//!                                                 ↓
//!                                  fallback stack (top → bottom)
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use xr_input::config::RouterConfig;
//! use xr_input::input::{FocusMap, InputRouter, RouterServices};
//!
//! let focus = FocusMap::new();
//! let mut router = InputRouter::initialize(
//!     &RouterConfig::builtin("debug"),
//!     RouterServices::new().with_focus_provider(focus.clone()),
//! );
//!
//! // Each frame
//! router.tick();
//!
//! router.shutdown();
//! ```

mod events;
mod handler;
mod registry;
mod router;
mod services;
mod stacks;
mod types;

// Re-export public API
pub use events::{
    AudioClip, AxisValue, DictationStage, EventKind, EventOptions, GesturePayload, GesturePhase,
    InputEvent, RecognitionConfidence, SourcePosition,
};
pub use handler::{DispatchContext, HandlerRef, InputHandler, StackCommand, handler_ref};
pub use registry::{SubscriberRegistry, SubscriptionId};
pub use router::{Delivery, InputRouter, RouterError, generate_new_source_id};
pub use services::{
    DeviceEnumerator, DeviceSample, FocusMap, FocusProvider, QueuedDevices, RouterServices,
};
pub use stacks::{DisableStack, EnabledTransition, HandlerStack};
pub use types::{
    AxisConstraint, Controller, Handedness, InputAction, InputSource, PointerId, Pose, SourceId,
    SpatialSample, TargetId, TrackingState,
};
