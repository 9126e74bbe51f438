use std::fmt;

use super::{NodeId, Size};

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Document,
    Node(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyUp,
    Resize,
}

/// Keys the page distinguishes. Everything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Char(char),
    Other,
}

/// Attribute selector used for event delegation, e.g. `[data-toggle="modal"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub attribute: String,
    pub value: String,
}

impl Selector {
    pub fn attribute(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Whether an element carrying `value` for the attribute matches.
    #[must_use]
    pub fn matches(&self, value: Option<&str>) -> bool {
        value == Some(self.value.as_str())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}=\"{}\"]", self.attribute, self.value)
    }
}

/// A listener registration.
///
/// Instead of a closure, a binding carries the message that is reported back
/// when it fires. Bindings sharing a namespace are removed together.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding<M> {
    pub target: EventTarget,
    pub kind: EventKind,
    pub namespace: String,
    /// Only fire for events originating at or below an element matching this.
    pub delegate: Option<Selector>,
    /// Only fire for this key (key events only).
    pub key: Option<Key>,
    pub prevent_default: bool,
    pub message: M,
}

impl<M> Binding<M> {
    pub fn new(target: EventTarget, kind: EventKind, namespace: impl Into<String>, message: M) -> Self {
        Self {
            target,
            kind,
            namespace: namespace.into(),
            delegate: None,
            key: None,
            prevent_default: false,
            message,
        }
    }

    #[must_use]
    pub fn delegate(mut self, selector: Selector) -> Self {
        self.delegate = Some(selector);
        self
    }

    #[must_use]
    pub const fn key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    #[must_use]
    pub const fn prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }
}

/// Input the host feeds into the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomEvent {
    Click(NodeId),
    KeyUp(Key),
    /// The viewport changed to the given size.
    Resize(Size),
}

/// Outcome of dispatching one [`DomEvent`].
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched<M> {
    /// Messages of the bindings that fired, in firing order.
    pub messages: Vec<M>,
    pub default_prevented: bool,
}

impl<M> Default for Dispatched<M> {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            default_prevented: false,
        }
    }
}

impl<M> Dispatched<M> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
