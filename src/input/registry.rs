//! Observer registry for router events

use super::events::{EventKind, InputEvent};
use super::handler::DispatchContext;
use super::types::Handedness;

/// Handle returned by [`SubscriberRegistry::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&InputEvent, &mut DispatchContext)>;

struct Subscription {
    id: SubscriptionId,
    /// `None` subscribes to every event kind
    kind: Option<EventKind>,
    /// Filter on the event's handedness; `Any` accepts every event
    handedness: Handedness,
    callback: Callback,
}

impl Subscription {
    fn wants(&self, event: &InputEvent) -> bool {
        self.kind.is_none_or(|k| k == event.kind()) && self.handedness.matches(event.handedness())
    }
}

/// Event-kind keyed callback registrations, invoked in registration order
///
/// Subscribers observe every event that passes the enabled gate; unlike
/// handlers they cannot consume events.
#[derive(Default)]
pub struct SubscriberRegistry {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a single event kind
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&InputEvent, &mut DispatchContext) + 'static,
    {
        self.insert(Some(kind), Handedness::Any, Box::new(callback))
    }

    /// Subscribe to a single event kind raised for a particular hand
    ///
    /// Filtering uses [`Handedness::matches`]: `Both` accepts left and
    /// right handed events, `Any` accepts everything.
    pub fn subscribe_handed<F>(
        &mut self,
        kind: EventKind,
        handedness: Handedness,
        callback: F,
    ) -> SubscriptionId
    where
        F: FnMut(&InputEvent, &mut DispatchContext) + 'static,
    {
        self.insert(Some(kind), handedness, Box::new(callback))
    }

    /// Subscribe to every event kind
    pub fn subscribe_all<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&InputEvent, &mut DispatchContext) + 'static,
    {
        self.insert(None, Handedness::Any, Box::new(callback))
    }

    /// Returns false if the subscription was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Invoke every matching callback, returning how many were called
    pub fn notify(&mut self, event: &InputEvent, ctx: &mut DispatchContext) -> usize {
        let mut notified = 0;
        for sub in &mut self.subscriptions {
            if sub.wants(event) {
                (sub.callback)(event, ctx);
                notified += 1;
            }
        }
        notified
    }

    /// Number of registrations that would receive `kind`, ignoring hand filters
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscriptions
            .iter()
            .filter(|s| s.kind.is_none_or(|k| k == kind))
            .count()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    fn insert(
        &mut self,
        kind: Option<EventKind>,
        handedness: Handedness,
        callback: Callback,
    ) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscriptions.push(Subscription {
            id,
            kind,
            handedness,
            callback,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::input::types::SourceId;

    fn lost(id: u32) -> InputEvent {
        InputEvent::SourceLost {
            source: SourceId(id),
        }
    }

    #[test]
    fn test_notify_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = SubscriberRegistry::new();

        let l = log.clone();
        registry.subscribe(EventKind::SourceLost, move |_, _| l.borrow_mut().push("first"));
        let l = log.clone();
        registry.subscribe_all(move |_, _| l.borrow_mut().push("all"));
        let l = log.clone();
        registry.subscribe(EventKind::SourceLost, move |_, _| l.borrow_mut().push("third"));
        let l = log.clone();
        registry.subscribe(EventKind::SourceDetected, move |_, _| l.borrow_mut().push("other"));

        let mut ctx = DispatchContext::new();
        assert_eq!(registry.notify(&lost(1), &mut ctx), 3);
        assert_eq!(*log.borrow(), ["first", "all", "third"]);
        assert_eq!(registry.subscriber_count(EventKind::SourceDetected), 2);
    }

    #[test]
    fn test_handed_subscription_filters_by_hand() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = SubscriberRegistry::new();
        for hand in [Handedness::Left, Handedness::Both, Handedness::Any] {
            let l = log.clone();
            registry.subscribe_handed(EventKind::InputDown, hand, move |_, _| {
                l.borrow_mut().push(hand)
            });
        }

        let down = |handedness| InputEvent::InputDown {
            source: SourceId(1),
            action: crate::input::types::InputAction::NONE,
            handedness,
        };
        let mut ctx = DispatchContext::new();
        assert_eq!(registry.notify(&down(Handedness::Left), &mut ctx), 3);
        assert_eq!(registry.notify(&down(Handedness::Right), &mut ctx), 2);
        assert_eq!(registry.notify(&down(Handedness::None), &mut ctx), 1);
        assert_eq!(
            *log.borrow(),
            [
                Handedness::Left,
                Handedness::Both,
                Handedness::Any,
                Handedness::Both,
                Handedness::Any,
                Handedness::Any
            ]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut registry = SubscriberRegistry::new();
        let c = count.clone();
        let id = registry.subscribe_all(move |_, _| *c.borrow_mut() += 1);

        let mut ctx = DispatchContext::new();
        registry.notify(&lost(1), &mut ctx);
        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.notify(&lost(1), &mut ctx);

        assert_eq!(*count.borrow(), 1);
        assert!(registry.is_empty());
    }
}
