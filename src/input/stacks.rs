//! Disable stack and modal/fallback handler stacks

use std::rc::Rc;

use super::handler::HandlerRef;

/// Change in the enabled state caused by a disable-stack mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnabledTransition {
    /// Enabled state did not change
    Unchanged,
    /// Input went from enabled to disabled
    Disabled,
    /// Input went from disabled to enabled
    Enabled,
}

/// Nested requests to suppress input
///
/// Only the depth matters: input is enabled iff nothing is pushed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisableStack {
    depth: usize,
}

impl DisableStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self) -> EnabledTransition {
        self.depth += 1;
        if self.depth == 1 {
            EnabledTransition::Disabled
        } else {
            EnabledTransition::Unchanged
        }
    }

    /// Popping an empty stack is a no-op
    pub fn pop(&mut self) -> EnabledTransition {
        match self.depth {
            0 => EnabledTransition::Unchanged,
            1 => {
                self.depth = 0;
                EnabledTransition::Enabled
            }
            _ => {
                self.depth -= 1;
                EnabledTransition::Unchanged
            }
        }
    }

    pub fn clear(&mut self) -> EnabledTransition {
        let was_disabled = self.depth > 0;
        self.depth = 0;
        if was_disabled {
            EnabledTransition::Enabled
        } else {
            EnabledTransition::Unchanged
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_enabled(&self) -> bool {
        self.depth == 0
    }
}

/// Ordered stack of handlers; the most recently pushed entry has priority
#[derive(Default, Clone)]
pub struct HandlerStack {
    entries: Vec<HandlerRef>,
}

impl HandlerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duplicates are allowed; re-pushing moves a handler's priority to the top
    pub fn push(&mut self, handler: HandlerRef) {
        self.entries.push(handler);
    }

    pub fn pop(&mut self) -> Option<HandlerRef> {
        self.entries.pop()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn top(&self) -> Option<&HandlerRef> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, handler: &HandlerRef) -> bool {
        self.entries.iter().any(|h| Rc::ptr_eq(h, handler))
    }

    /// Handlers from top to bottom
    pub fn iter_top_down(&self) -> impl Iterator<Item = &HandlerRef> {
        self.entries.iter().rev()
    }

    /// Snapshot of the stack, top first, for use while the stack may change
    pub fn snapshot(&self) -> Vec<HandlerRef> {
        self.iter_top_down().cloned().collect()
    }
}

impl std::fmt::Debug for HandlerStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(super::handler::handler_name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::InputEvent;
    use crate::input::handler::{DispatchContext, InputHandler, handler_ref};

    struct Named(&'static str);

    impl InputHandler for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn handle_event(&mut self, _event: &InputEvent, _ctx: &mut DispatchContext) -> bool {
            false
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    }

    fn top_name(stack: &HandlerStack) -> Option<String> {
        stack.top().map(|h| h.borrow().name().to_string())
    }

    #[test]
    fn test_disable_stack_nesting() {
        let mut stack = DisableStack::new();
        assert!(stack.is_enabled());

        assert_eq!(stack.push(), EnabledTransition::Disabled);
        assert_eq!(stack.push(), EnabledTransition::Unchanged);
        assert_eq!(stack.pop(), EnabledTransition::Unchanged);
        assert!(!stack.is_enabled());

        assert_eq!(stack.pop(), EnabledTransition::Enabled);
        assert!(stack.is_enabled());

        // Underflow stays at zero
        assert_eq!(stack.pop(), EnabledTransition::Unchanged);
        assert!(stack.is_enabled());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_disable_stack_clear() {
        let mut stack = DisableStack::new();
        assert_eq!(stack.clear(), EnabledTransition::Unchanged);
        stack.push();
        stack.push();
        stack.push();
        assert_eq!(stack.clear(), EnabledTransition::Enabled);
        assert!(stack.is_enabled());
    }

    #[test]
    fn test_enabled_iff_no_net_pushes() {
        // Deterministic pseudo-random push/pop sequence
        let mut stack = DisableStack::new();
        let mut pending: i64 = 0;
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            if seed % 3 == 0 {
                stack.push();
                pending += 1;
            } else {
                stack.pop();
                pending = (pending - 1).max(0);
            }
            assert_eq!(stack.is_enabled(), pending == 0);
            assert_eq!(stack.depth() as i64, pending);
        }
    }

    #[test]
    fn test_handler_stack_lifo() {
        let mut stack = HandlerStack::new();
        assert!(stack.pop().is_none());

        stack.push(handler_ref(Named("a")));
        stack.push(handler_ref(Named("b")));
        assert_eq!(top_name(&stack).as_deref(), Some("b"));

        stack.pop();
        assert_eq!(top_name(&stack).as_deref(), Some("a"));
        assert_eq!(stack.len(), 1);

        stack.clear();
        assert!(stack.is_empty());
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_handler_stack_allows_duplicates() {
        let a = handler_ref(Named("a"));
        let b = handler_ref(Named("b"));
        let mut stack = HandlerStack::new();
        stack.push(a.clone());
        stack.push(b.clone());
        stack.push(a.clone());

        assert_eq!(stack.len(), 3);
        let order: Vec<String> = stack
            .iter_top_down()
            .map(|h| h.borrow().name().to_string())
            .collect();
        assert_eq!(order, ["a", "b", "a"]);

        stack.pop();
        assert_eq!(top_name(&stack).as_deref(), Some("b"));
        assert!(stack.contains(&a));
    }
}
