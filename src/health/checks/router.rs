//! Input router health check

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::RouterConfig;
use crate::health::check::{CheckResult, CheckSteps, SystemCheck};
use crate::input::{
    Delivery, DispatchContext, EventKind, EventOptions, FocusMap, InputAction, InputEvent,
    InputHandler, InputRouter, PointerId, RouterServices, handler_ref,
};

/// Consumes every event it sees
struct Probe {
    name: &'static str,
}

impl InputHandler for Probe {
    fn name(&self) -> &str {
        self.name
    }

    fn handle_event(&mut self, _event: &InputEvent, _ctx: &mut DispatchContext) -> bool {
        true
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Exercises a router built from the built-in configuration
pub struct RouterCheck;

impl RouterCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RouterCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for RouterCheck {
    fn name(&self) -> &'static str {
        "Input Router"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates router initialization, disable stack and handler routing")
    }

    fn check(&self) -> CheckResult {
        let mut steps = CheckSteps::new();
        let config = RouterConfig::builtin("health");

        let inert = InputRouter::initialize(&config, RouterServices::new());
        steps.expect(
            !inert.is_valid(),
            "Router without a focus provider is inert",
        );

        let mut router = InputRouter::initialize(
            &config,
            RouterServices::new().with_focus_provider(FocusMap::new()),
        );
        if !steps.expect(router.is_valid(), "Router initialized") {
            return steps.finish("", "", "Router initialization failed");
        }

        let transitions = Rc::new(RefCell::new(0));
        let t = transitions.clone();
        router.subscribe(EventKind::InputDisabled, move |_, _| *t.borrow_mut() += 1);
        let t = transitions.clone();
        router.subscribe(EventKind::InputEnabled, move |_, _| *t.borrow_mut() += 1);

        router.push_input_disable();
        router.push_input_disable();
        router.pop_input_disable();
        let still_disabled = !router.is_input_enabled();
        router.pop_input_disable();
        router.pop_input_disable();
        steps.expect(
            still_disabled && router.is_input_enabled() && *transitions.borrow() == 2,
            "Disable stack nests and clamps at zero",
        );

        router.push_modal_input_handler(handler_ref(Probe { name: "modal-a" }));
        router.push_modal_input_handler(handler_ref(Probe { name: "modal-b" }));
        router.pop_modal_input_handler();
        router.raise_pointer_clicked(PointerId(0), InputAction::NONE, 1, EventOptions::new());
        steps.expect(
            *router.last_delivery() == Delivery::Consumed("modal-a".into()),
            "Modal stack routes to most recent handler",
        );

        router.clear_modal_input_stack();
        router.push_fallback_input_handler(handler_ref(Probe { name: "fallback" }));
        router.raise_pointer_clicked(PointerId(0), InputAction::NONE, 2, EventOptions::new());
        steps.expect(
            *router.last_delivery() == Delivery::Consumed("fallback".into()),
            "Fallback stack receives unconsumed events",
        );

        let source = router.request_new_generic_input_source("health-check", &[]);
        router.raise_source_lost(source.id);
        steps.expect(
            router.detected_input_sources().next().is_none(),
            "Source registration round-trips",
        );

        router.shutdown();

        steps.finish(
            "Router routing operational",
            "Router operational with warnings",
            "Router routing failed",
        )
    }
}
