//! Input event routing and distribution

mod raise;

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

use super::events::{EventKind, InputEvent};
use super::handler::{DispatchContext, HandlerRef, StackCommand, handler_name};
use super::registry::{SubscriberRegistry, SubscriptionId};
use super::services::{DeviceEnumerator, DeviceSample, FocusProvider, RouterServices};
use super::stacks::{DisableStack, EnabledTransition, HandlerStack};
use super::types::{Controller, Handedness, InputSource, PointerId, SourceId, TargetId};
use crate::config::{RouterConfig, RouterSettings};
use crate::profile::{InputProfiles, ProfileError};

static NEXT_SOURCE_ID: AtomicU32 = AtomicU32::new(1);

/// Returns a process-unique input source id
pub fn generate_new_source_id() -> SourceId {
    SourceId(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
}

/// Why a router was left inert at initialization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("required service missing: {0}")]
    MissingService(&'static str),
    #[error("invalid input profiles: {0}")]
    InvalidProfiles(#[from] ProfileError),
    #[error("invalid router setting: {0}")]
    InvalidSetting(&'static str),
}

/// Where a routed event ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Router is inert or the event was rejected before dispatch
    Dropped,
    /// Input is disabled
    Suppressed,
    /// Delivered to subscribers; no handler consumed it
    Unconsumed,
    /// Consumed by the named handler
    Consumed(String),
}

/// Central input routing and distribution system
///
/// Every `raise_*` call runs to completion on the calling thread: it updates
/// the detected-source bookkeeping, notifies subscribers in registration
/// order, then offers the event to the modal stack, the focused handler and
/// the fallback stack until one consumes it.
pub struct InputRouter {
    settings: RouterSettings,
    profiles: InputProfiles,
    /// Set when initialization failed; the router ignores all raise calls
    init_error: Option<RouterError>,
    focus_provider: Option<Box<dyn FocusProvider>>,
    device_enumerator: Option<Box<dyn DeviceEnumerator>>,
    disable_stack: DisableStack,
    modal_stack: HandlerStack,
    fallback_stack: HandlerStack,
    subscribers: SubscriberRegistry,
    sources: BTreeMap<SourceId, InputSource>,
    controllers: BTreeMap<SourceId, Controller>,
    /// Focused target per pointer, maintained by focus-changed events
    focused: HashMap<PointerId, TargetId>,
    /// Pointer/target pairs that have received focus-enter but not focus-exit
    entered: HashSet<(PointerId, TargetId)>,
    frame: u64,
    last_delivery: Delivery,
}

impl InputRouter {
    /// Builds a router from configuration and collaborators
    ///
    /// A missing focus provider or invalid profiles are logged and leave
    /// the router permanently inert instead of failing.
    pub fn initialize(config: &RouterConfig, services: RouterServices) -> Self {
        info!(profile = %config.profile, "Initializing input router");

        let init_error = Self::validate(config, &services).err();
        if let Some(err) = &init_error {
            error!(error = %err, "Invalid input router configuration, router is inert");
        } else {
            info!(
                actions = config.profiles.input_actions.len(),
                gestures = config.profiles.gestures.gestures.len(),
                rules = config.profiles.action_rules.len(),
                focus_provider = services.focus_provider.as_ref().map(|p| p.name()),
                device_enumerator = services.device_enumerator.as_ref().map(|d| d.name()),
                "Input router ready"
            );
        }

        Self {
            settings: config.router.clone(),
            profiles: config.profiles.clone(),
            init_error,
            focus_provider: services.focus_provider,
            device_enumerator: services.device_enumerator,
            disable_stack: DisableStack::new(),
            modal_stack: HandlerStack::new(),
            fallback_stack: HandlerStack::new(),
            subscribers: SubscriberRegistry::new(),
            sources: BTreeMap::new(),
            controllers: BTreeMap::new(),
            focused: HashMap::new(),
            entered: HashSet::new(),
            frame: 0,
            last_delivery: Delivery::Dropped,
        }
    }

    fn validate(config: &RouterConfig, services: &RouterServices) -> Result<(), RouterError> {
        if services.focus_provider.is_none() {
            return Err(RouterError::MissingService("focus provider"));
        }
        if config.router.max_deferred_commands == 0 {
            return Err(RouterError::InvalidSetting(
                "max_deferred_commands must be at least 1",
            ));
        }
        config.profiles.validate()?;
        Ok(())
    }

    /// Advance one frame: drain the device enumerator and raise its samples
    pub fn tick(&mut self) {
        self.frame += 1;
        if !self.is_valid() {
            return;
        }

        let samples = match self.device_enumerator.as_mut() {
            Some(enumerator) => enumerator.poll(),
            None => return,
        };
        if !samples.is_empty() {
            trace!(frame = self.frame, samples = samples.len(), "Applying device samples");
        }
        for sample in samples {
            self.apply_sample(sample);
        }
    }

    /// Tear down: report every remaining source as lost and release all handlers
    pub fn shutdown(mut self) {
        let remaining: Vec<SourceId> = self.sources.keys().copied().collect();
        for source in remaining {
            self.raise_source_lost(source);
        }
        self.modal_stack.clear();
        self.fallback_stack.clear();
        self.disable_stack.clear();
        self.subscribers.clear();
        self.focused.clear();
        self.entered.clear();
        info!(frames = self.frame, "Input router shut down");
    }

    fn apply_sample(&mut self, sample: DeviceSample) {
        match sample {
            DeviceSample::SourceDetected { source, controller } => {
                self.raise_source_detected(source, controller)
            }
            DeviceSample::SourceLost(source) => self.raise_source_lost(source),
            DeviceSample::TrackingStateChanged { source, state } => {
                self.raise_source_tracking_state_changed(source, state)
            }
            DeviceSample::Position { source, position } => {
                self.raise_source_position_changed(source, position)
            }
            DeviceSample::Rotation { source, rotation } => {
                self.raise_source_rotation_changed(source, rotation)
            }
            DeviceSample::Pose { source, pose } => self.raise_source_pose_changed(source, pose),
            DeviceSample::ButtonDown {
                source,
                action,
                handedness,
            } => self.raise_input_down(source, action, handedness),
            DeviceSample::ButtonUp {
                source,
                action,
                handedness,
            } => self.raise_input_up(source, action, handedness),
            DeviceSample::ButtonPressed {
                source,
                action,
                handedness,
                amount,
            } => self.raise_input_pressed(source, action, handedness, amount),
            DeviceSample::Gesture {
                source,
                gesture,
                phase,
                payload,
            } => {
                let Some(action) = self.profiles.gestures.action_for(gesture).cloned() else {
                    debug!(?gesture, %source, "Gesture has no mapped action, ignoring");
                    return;
                };
                self.raise_gesture(source, action, phase, payload);
            }
        }
    }

    // ------------------------------------------------------------------
    // State accessors
    // ------------------------------------------------------------------

    /// False when initialization failed and the router is inert
    pub fn is_valid(&self) -> bool {
        self.init_error.is_none()
    }

    /// Why initialization failed, if it did
    pub fn init_error(&self) -> Option<&RouterError> {
        self.init_error.as_ref()
    }

    /// True while no disable request is outstanding
    pub fn is_input_enabled(&self) -> bool {
        self.disable_stack.is_enabled()
    }

    /// Number of outstanding disable requests
    pub fn disable_depth(&self) -> usize {
        self.disable_stack.depth()
    }

    /// Sources currently detected, in no particular order
    pub fn detected_input_sources(&self) -> impl Iterator<Item = &InputSource> {
        self.sources.values()
    }

    pub fn detected_controllers(&self) -> impl Iterator<Item = &Controller> {
        self.controllers.values()
    }

    pub fn input_source(&self, id: SourceId) -> Option<&InputSource> {
        self.sources.get(&id)
    }

    pub fn controller(&self, id: SourceId) -> Option<&Controller> {
        self.controllers.get(&id)
    }

    /// Target the pointer last reported focus on
    pub fn focused_target(&self, pointer: PointerId) -> Option<TargetId> {
        self.focused.get(&pointer).copied()
    }

    /// Handlers consulted before the focused target
    pub fn modal_stack(&self) -> &HandlerStack {
        &self.modal_stack
    }

    /// Handlers consulted when nothing else consumed the event
    pub fn fallback_stack(&self) -> &HandlerStack {
        &self.fallback_stack
    }

    pub fn profiles(&self) -> &InputProfiles {
        &self.profiles
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Number of completed [`InputRouter::update`] calls
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Outcome of the most recent routed event
    pub fn last_delivery(&self) -> &Delivery {
        &self.last_delivery
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Observe every routed event of `kind`
    ///
    /// Subscribers see events before handlers do, and see them even when
    /// input is disabled. Stack changes queued on the context are applied
    /// after the event finishes routing.
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&InputEvent, &mut DispatchContext) + 'static,
    {
        self.subscribers.subscribe(kind, callback)
    }

    /// Like [`InputRouter::subscribe`], restricted to events raised for `handedness`
    pub fn subscribe_handed<F>(
        &mut self,
        kind: EventKind,
        handedness: Handedness,
        callback: F,
    ) -> SubscriptionId
    where
        F: FnMut(&InputEvent, &mut DispatchContext) + 'static,
    {
        self.subscribers.subscribe_handed(kind, handedness, callback)
    }

    pub fn subscribe_all<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&InputEvent, &mut DispatchContext) + 'static,
    {
        self.subscribers.subscribe_all(callback)
    }

    /// Returns false for an unknown id
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Disable and handler stacks
    // ------------------------------------------------------------------

    /// Disable input; subscribers get `InputDisabled` on the first push
    pub fn push_input_disable(&mut self) {
        self.apply_commands(vec![StackCommand::PushInputDisable]);
    }

    /// Popping with nothing pushed is a no-op
    pub fn pop_input_disable(&mut self) {
        self.apply_commands(vec![StackCommand::PopInputDisable]);
    }

    /// Drop every disable request and re-enable input
    pub fn clear_input_disable_stack(&mut self) {
        self.apply_commands(vec![StackCommand::ClearInputDisableStack]);
    }

    /// The most recently pushed modal handler is asked first
    pub fn push_modal_input_handler(&mut self, handler: HandlerRef) {
        self.apply_commands(vec![StackCommand::PushModal(handler)]);
    }

    pub fn pop_modal_input_handler(&mut self) {
        self.apply_commands(vec![StackCommand::PopModal]);
    }

    pub fn clear_modal_input_stack(&mut self) {
        self.apply_commands(vec![StackCommand::ClearModal]);
    }

    pub fn push_fallback_input_handler(&mut self, handler: HandlerRef) {
        self.apply_commands(vec![StackCommand::PushFallback(handler)]);
    }

    pub fn pop_fallback_input_handler(&mut self) {
        self.apply_commands(vec![StackCommand::PopFallback]);
    }

    pub fn clear_fallback_input_stack(&mut self) {
        self.apply_commands(vec![StackCommand::ClearFallback]);
    }

    /// Apply stack commands in order, including any queued by
    /// enabled/disabled subscribers along the way
    ///
    /// `commands` are always applied in full; only commands chained by
    /// notification subscribers count against `max_deferred_commands`.
    fn apply_commands(&mut self, commands: Vec<StackCommand>) {
        let mut queue: VecDeque<(StackCommand, bool)> =
            commands.into_iter().map(|c| (c, false)).collect();
        let mut chained = 0;

        while let Some((command, is_chained)) = queue.pop_front() {
            if is_chained {
                if chained == self.settings.max_deferred_commands {
                    let dropped = 1 + queue.iter().filter(|(_, c)| *c).count();
                    warn!(dropped, "Too many chained stack commands, dropping the chain");
                    queue.retain(|(_, c)| !*c);
                    continue;
                }
                chained += 1;
            }
            trace!(?command, is_chained, "Applying stack command");

            let transition = match command {
                StackCommand::PushInputDisable => self.disable_stack.push(),
                StackCommand::PopInputDisable => self.disable_stack.pop(),
                StackCommand::ClearInputDisableStack => self.disable_stack.clear(),
                StackCommand::PushModal(handler) => {
                    self.modal_stack.push(handler);
                    EnabledTransition::Unchanged
                }
                StackCommand::PopModal => {
                    self.modal_stack.pop();
                    EnabledTransition::Unchanged
                }
                StackCommand::ClearModal => {
                    self.modal_stack.clear();
                    EnabledTransition::Unchanged
                }
                StackCommand::PushFallback(handler) => {
                    self.fallback_stack.push(handler);
                    EnabledTransition::Unchanged
                }
                StackCommand::PopFallback => {
                    self.fallback_stack.pop();
                    EnabledTransition::Unchanged
                }
                StackCommand::ClearFallback => {
                    self.fallback_stack.clear();
                    EnabledTransition::Unchanged
                }
            };

            let notification = match transition {
                EnabledTransition::Unchanged => continue,
                EnabledTransition::Disabled => InputEvent::InputDisabled,
                EnabledTransition::Enabled => InputEvent::InputEnabled,
            };
            debug!(event = ?notification.kind(), "Input enabled state changed");

            let mut ctx = DispatchContext::new();
            self.subscribers.notify(&notification, &mut ctx);
            queue.extend(ctx.drain().into_iter().map(|c| (c, true)));
        }
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Route an event through subscribers, modal, focused and fallback handlers
    fn dispatch(&mut self, event: InputEvent) {
        if !self.is_valid() {
            self.last_delivery = Delivery::Dropped;
            return;
        }
        if !self.disable_stack.is_enabled() {
            if self.settings.log_dropped_events {
                debug!(event = ?event.kind(), depth = self.disable_stack.depth(), "Input disabled, event dropped");
            }
            self.last_delivery = Delivery::Suppressed;
            return;
        }

        let mut ctx = DispatchContext::new();
        let delivery = self.deliver(&event, &mut ctx);
        trace!(event = ?event.kind(), ?delivery, "Event routed");
        self.last_delivery = delivery;

        self.apply_commands(ctx.drain());
    }

    fn deliver(&mut self, event: &InputEvent, ctx: &mut DispatchContext) -> Delivery {
        self.subscribers.notify(event, ctx);

        for handler in self.modal_stack.snapshot() {
            if Self::offer(&handler, event, ctx) {
                return Delivery::Consumed(handler_name(&handler));
            }
        }

        for handler in self.focused_handlers(event) {
            if Self::offer(&handler, event, ctx) {
                return Delivery::Consumed(handler_name(&handler));
            }
        }

        for handler in self.fallback_stack.snapshot() {
            if Self::offer(&handler, event, ctx) {
                return Delivery::Consumed(handler_name(&handler));
            }
        }

        Delivery::Unconsumed
    }

    fn offer(handler: &HandlerRef, event: &InputEvent, ctx: &mut DispatchContext) -> bool {
        match handler.try_borrow_mut() {
            Ok(mut h) => h.handle_event(event, ctx),
            Err(_) => {
                warn!(event = ?event.kind(), "Handler already borrowed, skipping");
                false
            }
        }
    }

    /// Focused handlers for the pointers involved in an event, deduplicated
    fn focused_handlers(&self, event: &InputEvent) -> Vec<HandlerRef> {
        let Some(provider) = self.focus_provider.as_ref() else {
            return Vec::new();
        };

        let pointers: Vec<PointerId> = match event.pointer() {
            Some(pointer) => vec![pointer],
            None => event
                .source()
                .and_then(|id| self.sources.get(&id))
                .map(|s| s.pointers.clone())
                .unwrap_or_default(),
        };

        let mut handlers: Vec<HandlerRef> = Vec::new();
        for pointer in pointers {
            if let Some(handler) = provider.focused_handler(pointer)
                && !handlers.iter().any(|h| Rc::ptr_eq(h, &handler))
            {
                handlers.push(handler);
            }
        }
        handlers
    }

    /// Logs and returns false for sources not in the detected set
    fn require_source(&self, source: SourceId, operation: &'static str) -> bool {
        if self.sources.contains_key(&source) {
            true
        } else {
            warn!(%source, operation, "Event references an undetected input source, ignoring");
            false
        }
    }

    /// Logs and returns false for sources without a detected controller
    fn require_controller(&self, source: SourceId, operation: &'static str) -> bool {
        if self.controllers.contains_key(&source) {
            true
        } else {
            warn!(%source, operation, "Event references an undetected controller, ignoring");
            false
        }
    }
}
