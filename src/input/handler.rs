//! Input handler trait for modal, focused and fallback targets

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use super::events::InputEvent;

/// Trait for objects that can receive routed input events
///
/// Handlers are consulted in routing order (modal stack, focused target,
/// fallback stack). When a handler consumes an event (returns true),
/// propagation stops.
pub trait InputHandler {
    /// Name of this handler for debugging
    fn name(&self) -> &str;

    /// Handle a routed input event
    ///
    /// # Arguments
    /// * `event` - The event being routed
    /// * `ctx` - Queue for stack changes, applied once this event finishes routing
    ///
    /// # Returns
    /// * `true` if the event was consumed (stops propagation)
    /// * `false` if the event was declined (continues to the next handler)
    fn handle_event(&mut self, event: &InputEvent, ctx: &mut DispatchContext) -> bool;

    /// Downcast to concrete type for accessing handler-specific methods
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Shared handle to a handler, as stored on the modal and fallback stacks
pub type HandlerRef = Rc<RefCell<dyn InputHandler>>;

/// Wraps a handler into a [`HandlerRef`]
pub fn handler_ref<H: InputHandler + 'static>(handler: H) -> HandlerRef {
    Rc::new(RefCell::new(handler))
}

/// Stack mutation requested while an event was being dispatched
#[derive(Clone)]
pub enum StackCommand {
    PushInputDisable,
    PopInputDisable,
    ClearInputDisableStack,
    PushModal(HandlerRef),
    PopModal,
    ClearModal,
    PushFallback(HandlerRef),
    PopFallback,
    ClearFallback,
}

impl std::fmt::Debug for StackCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackCommand::PushModal(h) => write!(f, "PushModal({})", handler_name(h)),
            StackCommand::PushFallback(h) => write!(f, "PushFallback({})", handler_name(h)),
            StackCommand::PushInputDisable => f.write_str("PushInputDisable"),
            StackCommand::PopInputDisable => f.write_str("PopInputDisable"),
            StackCommand::ClearInputDisableStack => f.write_str("ClearInputDisableStack"),
            StackCommand::PopModal => f.write_str("PopModal"),
            StackCommand::ClearModal => f.write_str("ClearModal"),
            StackCommand::PopFallback => f.write_str("PopFallback"),
            StackCommand::ClearFallback => f.write_str("ClearFallback"),
        }
    }
}

/// Name of a handler, or a placeholder while it is mutably borrowed
pub(crate) fn handler_name(handler: &HandlerRef) -> String {
    handler
        .try_borrow()
        .map(|h| h.name().to_string())
        .unwrap_or_else(|_| "<busy>".to_string())
}

/// Deferred command queue handed to handlers during dispatch
///
/// Handlers cannot touch the router while it is dispatching, so any stack
/// change they request is recorded here and applied in order afterwards.
#[derive(Debug, Default)]
pub struct DispatchContext {
    commands: Vec<StackCommand>,
}

impl DispatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_input_disable(&mut self) {
        self.commands.push(StackCommand::PushInputDisable);
    }

    pub fn pop_input_disable(&mut self) {
        self.commands.push(StackCommand::PopInputDisable);
    }

    pub fn clear_input_disable_stack(&mut self) {
        self.commands.push(StackCommand::ClearInputDisableStack);
    }

    pub fn push_modal_input_handler(&mut self, handler: HandlerRef) {
        self.commands.push(StackCommand::PushModal(handler));
    }

    pub fn pop_modal_input_handler(&mut self) {
        self.commands.push(StackCommand::PopModal);
    }

    pub fn clear_modal_input_stack(&mut self) {
        self.commands.push(StackCommand::ClearModal);
    }

    pub fn push_fallback_input_handler(&mut self, handler: HandlerRef) {
        self.commands.push(StackCommand::PushFallback(handler));
    }

    pub fn pop_fallback_input_handler(&mut self) {
        self.commands.push(StackCommand::PopFallback);
    }

    pub fn clear_fallback_input_stack(&mut self) {
        self.commands.push(StackCommand::ClearFallback);
    }

    /// Number of queued commands
    pub fn pending(&self) -> usize {
        self.commands.len()
    }

    /// Take all queued commands, leaving the queue empty
    pub fn drain(&mut self) -> Vec<StackCommand> {
        std::mem::take(&mut self.commands)
    }
}
