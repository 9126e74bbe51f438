//! Host document contract.
//!
//! The modal never touches a concrete document. Everything it needs from the
//! page (element creation, styling, measurement, namespaced listeners and
//! fades) goes through the [`Dom`] trait. Listener handlers are plain
//! messages of type `M`: the host hands the messages of the bindings that
//! fired back to whoever owns the controllers.

mod event;
pub mod memory;
mod style;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use event::{Binding, Dispatched, DomEvent, EventKind, EventTarget, Key, Selector};
pub use style::{Display, Length, Position, Style};

/// Stable identity of an element inside a host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node{}", self.0)
    }
}

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Document, event and animation primitives consumed by the modal.
///
/// Operations on ids the host does not know are ignored; none of them fail.
pub trait Dom<M> {
    /// The top-level body element.
    fn body(&self) -> NodeId;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId;

    fn add_class(&mut self, node: NodeId, class: &str);

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Replace the element's children with a single text run.
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Replace the element's children with parsed markup. No sanitization.
    fn set_html(&mut self, node: NodeId, html: &str);

    /// Merge the set properties of `style` into the element's inline style.
    fn css(&mut self, node: NodeId, style: &Style);

    /// Append `child` as the last child of `parent`, detaching it first.
    fn append(&mut self, parent: NodeId, child: NodeId);

    /// Detach and drop the element with its subtree.
    fn remove(&mut self, node: NodeId);

    /// Outer box (content, padding and border).
    ///
    /// `Window` measures the viewport and `Document` the full scrollable page.
    fn outer_size(&self, target: EventTarget) -> Size;

    /// Current vertical scroll offset of the window or an element.
    fn scroll_top(&self, target: EventTarget) -> f64;

    fn on(&mut self, binding: Binding<M>);

    /// Remove every binding registered under `namespace`, on any target.
    fn off(&mut self, namespace: &str);

    /// Cancel the in-flight animation, leaving the element where it is.
    fn stop(&mut self, node: NodeId);

    fn fade_in(&mut self, node: NodeId);

    fn fade_out(&mut self, node: NodeId);
}
