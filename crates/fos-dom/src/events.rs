//! DOM Events
//!
//! Event objects, listener callbacks and listener options. Dispatch itself
//! lives on `Element` because it needs the document borrowed between
//! listener invocations.

use std::fmt;
use std::rc::Rc;

use crate::NodeId;

/// Closure listener
pub type EventCallback = Rc<dyn Fn(&mut Event)>;

/// Object listener exposing `handleEvent`
pub trait EventHandler {
    fn handle_event(&self, event: &mut Event);
}

/// Anything `addEventListener` accepts
#[derive(Clone)]
pub enum Listener {
    Callback(EventCallback),
    Handler(Rc<dyn EventHandler>),
}

impl Listener {
    /// Wrap a closure
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&mut Event) + 'static,
    {
        Self::Callback(Rc::new(f))
    }

    /// Invoke the listener
    pub fn invoke(&self, event: &mut Event) {
        match self {
            Self::Callback(f) => f(event),
            Self::Handler(h) => h.handle_event(event),
        }
    }

    /// Identity comparison (same closure or same handler object)
    pub fn same(&self, other: &Listener) -> bool {
        match (self, other) {
            (Self::Callback(a), Self::Callback(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            (Self::Handler(a), Self::Handler(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            _ => false,
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Listener::Callback"),
            Self::Handler(_) => f.write_str("Listener::Handler"),
        }
    }
}

/// Listener options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    pub capture: bool,
    pub passive: bool,
    pub once: bool,
}

/// A listener registered on an element
#[derive(Debug, Clone)]
pub struct RegisteredListener {
    pub event_type: String,
    pub listener: Listener,
    pub options: ListenerOptions,
}

/// Which phase of dispatch is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// A DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub target: Option<NodeId>,
    pub current_target: Option<NodeId>,
    pub phase: EventPhase,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) immediate_stopped: bool,
    pub(crate) in_passive_listener: bool,
}

impl Event {
    /// Create a new event
    pub fn new(event_type: &str, bubbles: bool, cancelable: bool) -> Self {
        Self {
            event_type: event_type.to_string(),
            target: None,
            current_target: None,
            phase: EventPhase::None,
            bubbles,
            cancelable,
            default_prevented: false,
            propagation_stopped: false,
            immediate_stopped: false,
            in_passive_listener: false,
        }
    }

    /// Prevent default action. No effect inside passive listeners.
    pub fn prevent_default(&mut self) {
        if self.cancelable && !self.in_passive_listener {
            self.default_prevented = true;
        }
    }

    /// Stop propagation to further nodes
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation and skip remaining listeners on this node
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}
