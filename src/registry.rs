use std::collections::HashMap;

use tracing::debug;

use crate::dom::memory::MemoryDom;
use crate::dom::{Dispatched, Dom, DomEvent, NodeId};
use crate::modal::{Modal, ModalHooks, ModalMsg, ModalOptions};

/// One modal controller per target element.
///
/// Binding the same element twice hands back the existing controller, so a
/// page can call [`ModalRegistry::bind`] wherever it needs the modal without
/// tracking whether it was set up already.
///
/// # Example
///
/// ```rust
/// use lazymodal::dom::{Dom, Size, memory::MemoryDom};
/// use lazymodal::{ModalHooks, ModalOptions, ModalRegistry};
///
/// let mut dom = MemoryDom::new(Size::new(1024.0, 768.0));
/// let mut registry = ModalRegistry::new();
///
/// let body = dom.body();
/// registry
///     .bind(body, ModalOptions::default(), ModalHooks::default())
///     .open(&mut dom, Some("<p>Hello</p>"));
/// assert!(registry.get(body).is_some_and(|modal| modal.is_open()));
/// ```
#[derive(Debug, Default)]
pub struct ModalRegistry {
    modals: HashMap<NodeId, Modal>,
}

impl ModalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the controller for `target`, creating it on first use.
    ///
    /// When a controller already exists, `options` and `hooks` are ignored.
    pub fn bind(&mut self, target: NodeId, options: ModalOptions, hooks: ModalHooks) -> &mut Modal {
        self.modals.entry(target).or_insert_with(|| {
            debug!(node = %target, "modal bound");
            Modal::new(target, options, hooks)
        })
    }

    pub fn get(&self, target: NodeId) -> Option<&Modal> {
        self.modals.get(&target)
    }

    pub fn get_mut(&mut self, target: NodeId) -> Option<&mut Modal> {
        self.modals.get_mut(&target)
    }

    /// Route a fired listener message to the controller it belongs to.
    ///
    /// Returns `false` when no controller is bound to the message's target.
    pub fn deliver<D: Dom<ModalMsg>>(&mut self, dom: &mut D, msg: ModalMsg) -> bool {
        let Some(modal) = self.modals.get_mut(&msg.target) else {
            debug!(node = %msg.target, trigger = ?msg.trigger, "message for unbound target dropped");
            return false;
        };
        modal.handle(dom, msg.trigger);
        true
    }

    /// Dispatch `event` on the page and deliver every message it fires.
    pub fn handle(&mut self, dom: &mut MemoryDom<ModalMsg>, event: &DomEvent) -> Dispatched<ModalMsg> {
        let dispatched = dom.dispatch(event);
        for &msg in &dispatched.messages {
            self.deliver(dom, msg);
        }
        dispatched
    }

    /// Tear the controller for `target` down and forget it.
    ///
    /// Its listeners and generated nodes are removed. Returns whether a
    /// controller was bound.
    pub fn unbind<D: Dom<ModalMsg>>(&mut self, dom: &mut D, target: NodeId) -> bool {
        let Some(mut modal) = self.modals.remove(&target) else {
            return false;
        };
        modal.teardown(dom);
        debug!(node = %target, "modal unbound");
        true
    }

    pub fn len(&self) -> usize {
        self.modals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modals.is_empty()
    }
}
