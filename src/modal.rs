//! The modal controller.
//!
//! A [`Modal`] is bound to one target element: the page body or any other
//! container. It holds only configuration until the first [`Modal::open`],
//! which builds the wrapper, close affordance, content area and optional
//! backdrop inside the target. After that the same nodes are reused for every
//! open, update and hide.

pub mod align;
mod options;

use tracing::debug;

use crate::dom::{
    Binding, Display, Dom, EventKind, EventTarget, Key, Length, NodeId, Position, Selector, Style,
};

pub use options::{Hook, ModalHooks, ModalOptions};

/// Attribute that marks an element as a dismiss trigger.
///
/// Content markup may carry `data-toggle="modal"` to add its own close buttons.
pub const DISMISS_ATTRIBUTE: &str = "data-toggle";
pub const DISMISS_VALUE: &str = "modal";

pub const WRAPPER_CLASS: &str = "modal-wrapper";
pub const CLOSE_CLASS: &str = "modal-close";
pub const CONTENT_CLASS: &str = "modal-content";
pub const OVERLAY_CLASS: &str = "modal-overlay";

/// Selector matching every dismiss trigger.
#[must_use]
pub fn dismiss_selector() -> Selector {
    Selector::attribute(DISMISS_ATTRIBUTE, DISMISS_VALUE)
}

/// What a fired listener asks its modal to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Realign,
    Dismiss,
}

/// Message carried by the modal's listener bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalMsg {
    /// Target element of the modal that registered the listener.
    pub target: NodeId,
    pub trigger: Trigger,
}

/// Reference used for measuring and scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Page-level modal: the window.
    Viewport,
    /// Container modal: the target element itself.
    Element(NodeId),
}

impl Context {
    #[must_use]
    pub const fn event_target(self) -> EventTarget {
        match self {
            Self::Viewport => EventTarget::Window,
            Self::Element(node) => EventTarget::Node(node),
        }
    }
}

/// Nodes created on first open.
#[derive(Debug, Clone, Copy)]
struct Parts {
    wrapper: NodeId,
    close: NodeId,
    content: NodeId,
    overlay: Option<NodeId>,
    context: Context,
    is_body: bool,
}

impl Parts {
    /// The elements that fade together.
    fn faded(self) -> impl Iterator<Item = NodeId> {
        std::iter::once(self.wrapper).chain(self.overlay)
    }
}

/// Centered overlay window bound to one target element.
#[derive(Debug)]
pub struct Modal {
    target: NodeId,
    options: ModalOptions,
    hooks: ModalHooks,
    is_open: bool,
    parts: Option<Parts>,
    pending: Option<String>,
}

impl Modal {
    /// Store configuration for `target`. No document work happens here.
    pub fn new(target: NodeId, options: ModalOptions, hooks: ModalHooks) -> Self {
        Self {
            target,
            options,
            hooks,
            is_open: false,
            parts: None,
            pending: None,
        }
    }

    pub const fn target(&self) -> NodeId {
        self.target
    }

    pub const fn options(&self) -> &ModalOptions {
        &self.options
    }

    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    pub const fn is_initialized(&self) -> bool {
        self.parts.is_some()
    }

    pub fn wrapper(&self) -> Option<NodeId> {
        self.parts.map(|p| p.wrapper)
    }

    pub fn close_button(&self) -> Option<NodeId> {
        self.parts.map(|p| p.close)
    }

    pub fn content(&self) -> Option<NodeId> {
        self.parts.map(|p| p.content)
    }

    /// The backdrop, `None` before initialization or when disabled.
    pub fn overlay(&self) -> Option<NodeId> {
        self.parts.and_then(|p| p.overlay)
    }

    pub fn context(&self) -> Option<Context> {
        self.parts.map(|p| p.context)
    }

    /// Listener namespace owned by this modal.
    pub fn namespace(&self) -> String {
        format!("modal.{}", self.target.index())
    }

    const fn message(&self, trigger: Trigger) -> ModalMsg {
        ModalMsg {
            target: self.target,
            trigger,
        }
    }

    fn ensure_parts<D: Dom<ModalMsg>>(&mut self, dom: &mut D) -> Parts {
        if let Some(parts) = self.parts {
            return parts;
        }

        let options = &self.options;
        let wrapper = dom.create_element("div");
        dom.add_class(wrapper, WRAPPER_CLASS);
        dom.css(
            wrapper,
            &Style::new()
                .position(if options.fixed {
                    Position::Fixed
                } else {
                    Position::Absolute
                })
                .width(options.width.clone())
                .max_width(options.max_width.clone())
                .height(options.height.clone())
                .max_height(options.max_height.clone())
                .display(Display::None),
        );

        let close = dom.create_element("span");
        dom.add_class(close, CLOSE_CLASS);
        dom.set_attribute(close, DISMISS_ATTRIBUTE, DISMISS_VALUE);
        dom.set_text(close, "Close");
        dom.append(wrapper, close);

        let content = dom.create_element("div");
        dom.add_class(content, CONTENT_CLASS);
        dom.append(wrapper, content);

        dom.append(self.target, wrapper);

        let overlay = options.overlay.then(|| {
            let overlay = dom.create_element("div");
            dom.add_class(overlay, OVERLAY_CLASS);
            if options.blur {
                dom.set_attribute(overlay, DISMISS_ATTRIBUTE, DISMISS_VALUE);
            }
            dom.css(
                overlay,
                &Style::new()
                    .position(Position::Absolute)
                    .top(0.0)
                    .left(0.0)
                    .width(Length::Percent(100.0))
                    .display(Display::None),
            );
            dom.append(self.target, overlay);
            overlay
        });

        let is_body = self.target == dom.body();
        let context = if is_body {
            Context::Viewport
        } else {
            dom.css(self.target, &Style::new().position(Position::Relative));
            Context::Element(self.target)
        };

        if let Some(pending) = self.pending.take() {
            dom.set_html(content, &pending);
        }

        let parts = Parts {
            wrapper,
            close,
            content,
            overlay,
            context,
            is_body,
        };
        self.parts = Some(parts);
        debug!(node = %self.target, is_body, overlay = overlay.is_some(), "modal initialized");
        parts
    }

    /// Center the wrapper in its context and stretch the backdrop over it.
    pub fn align<D: Dom<ModalMsg>>(&self, dom: &mut D) {
        let Some(parts) = self.parts else {
            return;
        };
        let context = parts.context.event_target();
        let wrapper = dom.outer_size(EventTarget::Node(parts.wrapper));
        let bounds = dom.outer_size(context);
        let base = if self.options.fixed {
            0.0
        } else {
            dom.scroll_top(context)
        };

        let offset = align::center(wrapper, bounds, base);
        dom.css(parts.wrapper, &Style::new().top(offset.top).left(offset.left));

        if let Some(overlay) = parts.overlay {
            let height = if parts.is_body {
                dom.outer_size(EventTarget::Document).height
            } else {
                bounds.height
            };
            dom.css(overlay, &Style::new().height(height));
        }
    }

    pub fn open<D: Dom<ModalMsg>>(&mut self, dom: &mut D, content: Option<&str>) {
        self.open_with(dom, content, |_| {});
    }

    /// Show the modal, optionally replacing its content, then run `on_open`
    /// and `callback`.
    ///
    /// The fade is only requested; callbacks run before it finishes.
    pub fn open_with<D, F>(&mut self, dom: &mut D, content: Option<&str>, callback: F)
    where
        D: Dom<ModalMsg>,
        F: FnOnce(&Self),
    {
        let parts = self.ensure_parts(dom);
        let namespace = self.namespace();

        // Re-opening an open modal must not stack a second set of listeners.
        dom.off(&namespace);
        if parts.is_body {
            dom.on(Binding::new(
                EventTarget::Window,
                EventKind::Resize,
                namespace.as_str(),
                self.message(Trigger::Realign),
            ));
            if self.options.escape {
                dom.on(
                    Binding::new(
                        EventTarget::Document,
                        EventKind::KeyUp,
                        namespace.as_str(),
                        self.message(Trigger::Dismiss),
                    )
                    .key(Key::Escape),
                );
            }
        }
        dom.on(
            Binding::new(
                EventTarget::Document,
                EventKind::Click,
                namespace,
                self.message(Trigger::Dismiss),
            )
            .delegate(dismiss_selector())
            .prevent_default(),
        );

        for node in parts.faded() {
            dom.stop(node);
            dom.fade_in(node);
        }

        self.is_open = true;
        debug!(node = %self.target, "modal opened");

        if let Some(content) = content.filter(|c| !c.is_empty()) {
            self.update(dom, content);
        }

        if let Some(hook) = self.hooks.on_open.clone() {
            hook(self);
        }
        callback(self);
    }

    pub fn update<D: Dom<ModalMsg>>(&mut self, dom: &mut D, content: &str) {
        self.update_with(dom, content, |_| {});
    }

    /// Replace the content markup. Realigns when open.
    ///
    /// Markup handed in before the first open is kept and written once the
    /// structure exists.
    pub fn update_with<D, F>(&mut self, dom: &mut D, content: &str, callback: F)
    where
        D: Dom<ModalMsg>,
        F: FnOnce(&Self),
    {
        match self.parts {
            Some(parts) => {
                dom.set_html(parts.content, content);
                if self.is_open {
                    self.align(dom);
                }
            }
            None => self.pending = Some(content.to_string()),
        }

        if let Some(hook) = self.hooks.on_update.clone() {
            hook(self);
        }
        callback(self);
    }

    /// Change the wrapper's width and height, then realign. Maximums are untouched.
    pub fn resize<D: Dom<ModalMsg>>(
        &mut self,
        dom: &mut D,
        width: impl Into<Length>,
        height: impl Into<Length>,
    ) {
        let (width, height) = (width.into(), height.into());
        match self.parts {
            Some(parts) => {
                dom.css(parts.wrapper, &Style::new().width(width).height(height));
                self.align(dom);
            }
            None => {
                // Picked up when the wrapper is created.
                self.options.width = width;
                self.options.height = height;
            }
        }
    }

    pub fn hide<D: Dom<ModalMsg>>(&mut self, dom: &mut D) {
        self.hide_with(dom, |_| {});
    }

    /// Drop this modal's listeners and fade it out, then run `on_hide` and
    /// `callback`.
    pub fn hide_with<D, F>(&mut self, dom: &mut D, callback: F)
    where
        D: Dom<ModalMsg>,
        F: FnOnce(&Self),
    {
        dom.off(&self.namespace());

        if let Some(parts) = self.parts {
            for node in parts.faded() {
                dom.stop(node);
                dom.fade_out(node);
            }
        }

        self.is_open = false;
        debug!(node = %self.target, "modal hidden");

        if let Some(hook) = self.hooks.on_hide.clone() {
            hook(self);
        }
        callback(self);
    }

    /// React to a fired listener.
    pub fn handle<D: Dom<ModalMsg>>(&mut self, dom: &mut D, trigger: Trigger) {
        match trigger {
            Trigger::Realign => self.align(dom),
            Trigger::Dismiss => self.hide(dom),
        }
    }

    /// Remove listeners and generated nodes. Hooks do not run.
    pub(crate) fn teardown<D: Dom<ModalMsg>>(&mut self, dom: &mut D) {
        dom.off(&self.namespace());
        if let Some(parts) = self.parts.take() {
            for node in parts.faded() {
                dom.stop(node);
                dom.remove(node);
            }
        }
        self.is_open = false;
        self.pending = None;
        debug!(node = %self.target, "modal torn down");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::dom::memory::MemoryDom;
    use crate::dom::{DomEvent, Size};

    type Page = MemoryDom<ModalMsg>;

    fn page() -> Page {
        MemoryDom::new(Size::new(1000.0, 800.0))
    }

    fn body_modal(dom: &Page, options: ModalOptions) -> Modal {
        Modal::new(dom.body(), options, ModalHooks::default())
    }

    fn deliver(dom: &mut Page, modal: &mut Modal, event: &DomEvent) {
        for msg in dom.dispatch(event).messages {
            if msg.target == modal.target() {
                modal.handle(dom, msg.trigger);
            }
        }
    }

    #[test]
    fn test_construction_is_lazy() {
        let dom = page();
        let modal = body_modal(&dom, ModalOptions::default());

        assert!(!modal.is_initialized());
        assert!(!modal.is_open());
        assert!(dom.children(dom.body()).is_empty());
        assert!(dom.bindings().is_empty());
    }

    #[test]
    fn test_open_builds_structure_once() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());

        modal.open(&mut dom, None);
        let wrapper = modal.wrapper().unwrap();
        let overlay = modal.overlay().unwrap();
        modal.hide(&mut dom);
        modal.open(&mut dom, Some("<p>again</p>"));

        assert_eq!(modal.wrapper(), Some(wrapper));
        assert_eq!(modal.overlay(), Some(overlay));
        assert_eq!(dom.find_by_class(WRAPPER_CLASS).len(), 1);
        assert_eq!(dom.find_by_class(OVERLAY_CLASS).len(), 1);
        assert_eq!(dom.children(dom.body()), &[wrapper, overlay]);
    }

    #[test]
    fn test_structure_contents() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());
        modal.open(&mut dom, None);

        let wrapper = modal.wrapper().unwrap();
        let close = modal.close_button().unwrap();
        let content = modal.content().unwrap();
        assert_eq!(dom.children(wrapper), &[close, content]);
        assert!(dom.has_class(close, CLOSE_CLASS));
        assert_eq!(dom.attribute(close, DISMISS_ATTRIBUTE), Some(DISMISS_VALUE));
        assert_eq!(dom.text(close), "Close");
        assert!(dom.has_class(content, CONTENT_CLASS));

        let style = dom.inline_style(wrapper).unwrap();
        assert_eq!(style.position, Some(Position::Absolute));
        assert_eq!(style.width, Some(Length::Px(640.0)));
        assert_eq!(style.max_width, Some(Length::Percent(95.0)));
        assert_eq!(style.height, Some(Length::Px(480.0)));
        assert_eq!(style.max_height, Some(Length::Percent(95.0)));
    }

    #[test]
    fn test_fixed_option_sets_fixed_position() {
        let mut dom = page();
        let options = ModalOptions {
            fixed: true,
            ..ModalOptions::default()
        };
        let mut modal = body_modal(&dom, options);
        modal.open(&mut dom, None);

        let style = dom.inline_style(modal.wrapper().unwrap()).unwrap();
        assert_eq!(style.position, Some(Position::Fixed));
    }

    #[test]
    fn test_open_then_hide_flags() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());

        modal.open(&mut dom, None);
        assert!(modal.is_open());

        modal.hide(&mut dom);
        assert!(!modal.is_open());
    }

    #[test]
    fn test_hide_twice_is_safe() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());
        modal.open(&mut dom, None);

        modal.hide(&mut dom);
        modal.hide(&mut dom);

        assert!(!modal.is_open());
        assert!(dom.bindings().is_empty());
    }

    #[test]
    fn test_hide_before_open_is_safe() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());

        modal.hide(&mut dom);

        assert!(!modal.is_open());
        assert!(!modal.is_initialized());
    }

    #[test]
    fn test_open_fades_in_and_hide_fades_out() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());
        modal.open(&mut dom, None);
        let wrapper = modal.wrapper().unwrap();
        let overlay = modal.overlay().unwrap();

        assert!(dom.is_visible(wrapper));
        assert!(dom.is_animating(wrapper));
        assert!(dom.is_animating(overlay));

        modal.hide(&mut dom);
        dom.finish_animations();
        assert!(!dom.is_visible(wrapper));
        assert!(!dom.is_visible(overlay));
    }

    #[test]
    fn test_callbacks_fire_before_fade_completes() {
        let mut dom = page();
        let fired = Rc::new(Cell::new(false));
        let seen = Rc::clone(&fired);
        let hooks = ModalHooks::default().on_open(move |_| seen.set(true));
        let mut modal = Modal::new(dom.body(), ModalOptions::default(), hooks);

        modal.open_with(&mut dom, None, |m| assert!(m.is_open()));

        assert!(fired.get());
        assert!(dom.is_animating(modal.wrapper().unwrap()));
    }

    #[test]
    fn test_hook_order() {
        let mut dom = page();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b, c) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));
        let hooks = ModalHooks::default()
            .on_open(move |_| a.borrow_mut().push("on_open"))
            .on_update(move |_| b.borrow_mut().push("on_update"))
            .on_hide(move |m| c.borrow_mut().push(if m.is_open() { "open?" } else { "on_hide" }));
        let mut modal = Modal::new(dom.body(), ModalOptions::default(), hooks);

        let cb = Rc::clone(&log);
        modal.open_with(&mut dom, Some("<p>x</p>"), move |_| cb.borrow_mut().push("open callback"));
        let cb = Rc::clone(&log);
        modal.hide_with(&mut dom, move |_| cb.borrow_mut().push("hide callback"));

        assert_eq!(
            *log.borrow(),
            vec!["on_update", "on_open", "open callback", "on_hide", "hide callback"]
        );
    }

    #[test]
    fn test_empty_content_is_not_written() {
        let mut dom = page();
        let updates = Rc::new(Cell::new(0));
        let counter = Rc::clone(&updates);
        let hooks = ModalHooks::default().on_update(move |_| counter.set(counter.get() + 1));
        let mut modal = Modal::new(dom.body(), ModalOptions::default(), hooks);

        modal.open(&mut dom, Some(""));

        assert_eq!(updates.get(), 0);
    }

    #[test]
    fn test_update_on_closed_modal_does_not_align() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());
        modal.open(&mut dom, None);
        modal.hide(&mut dom);
        let wrapper = modal.wrapper().unwrap();
        dom.css(wrapper, &Style::new().top(-1.0).left(-1.0));

        modal.update(&mut dom, "<p>hello</p>");

        assert_eq!(dom.text(modal.content().unwrap()), "hello");
        let style = dom.inline_style(wrapper).unwrap();
        assert_eq!(style.top, Some(Length::Px(-1.0)));
        assert_eq!(style.left, Some(Length::Px(-1.0)));
    }

    #[test]
    fn test_update_on_open_modal_aligns() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());
        modal.open(&mut dom, None);
        let wrapper = modal.wrapper().unwrap();
        dom.css(wrapper, &Style::new().top(-1.0).left(-1.0));

        modal.update(&mut dom, "<p>hello</p>");

        assert_eq!(dom.text(modal.content().unwrap()), "hello");
        let style = dom.inline_style(wrapper).unwrap();
        assert_eq!(style.top, Some(Length::Px(160.0)));
        assert_eq!(style.left, Some(Length::Px(180.0)));
    }

    #[test]
    fn test_update_before_open_is_kept() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());

        modal.update(&mut dom, "<p>early</p>");
        assert!(!modal.is_initialized());
        assert!(dom.children(dom.body()).is_empty());

        modal.open(&mut dom, None);
        assert_eq!(dom.text(modal.content().unwrap()), "early");
    }

    #[test]
    fn test_align_body_not_fixed_uses_scroll() {
        let mut dom = page();
        let body = dom.body();
        dom.set_intrinsic_size(body, Size::new(1000.0, 3000.0));
        dom.scroll_window_to(500.0);
        let mut modal = body_modal(&dom, ModalOptions::default());

        modal.open(&mut dom, None);
        modal.align(&mut dom);

        let style = dom.inline_style(modal.wrapper().unwrap()).unwrap();
        assert_eq!(style.top, Some(Length::Px(500.0 + (800.0 - 480.0) / 2.0)));
        let overlay = dom.inline_style(modal.overlay().unwrap()).unwrap();
        assert_eq!(overlay.height, Some(Length::Px(3000.0)));
    }

    #[test]
    fn test_align_pins_tall_wrapper_to_scroll() {
        let mut dom = page();
        let body = dom.body();
        dom.set_intrinsic_size(body, Size::new(1000.0, 3000.0));
        dom.scroll_window_to(250.0);
        let options = ModalOptions {
            height: Length::Px(2000.0),
            max_height: Length::Auto,
            ..ModalOptions::default()
        };
        let mut modal = body_modal(&dom, options);

        modal.open(&mut dom, None);
        modal.align(&mut dom);

        let style = dom.inline_style(modal.wrapper().unwrap()).unwrap();
        assert_eq!(style.top, Some(Length::Px(250.0)));
    }

    #[test]
    fn test_align_fixed_ignores_scroll() {
        let mut dom = page();
        let body = dom.body();
        dom.set_intrinsic_size(body, Size::new(1000.0, 3000.0));
        dom.scroll_window_to(500.0);
        let options = ModalOptions {
            fixed: true,
            ..ModalOptions::default()
        };
        let mut modal = body_modal(&dom, options);

        modal.open(&mut dom, None);
        modal.align(&mut dom);

        let style = dom.inline_style(modal.wrapper().unwrap()).unwrap();
        assert_eq!(style.top, Some(Length::Px(160.0)));
    }

    #[test]
    fn test_open_without_content_does_not_align() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());

        modal.open(&mut dom, None);
        let wrapper = modal.wrapper().unwrap();
        assert_eq!(dom.inline_style(wrapper).unwrap().top, None);

        modal.align(&mut dom);
        assert_eq!(dom.inline_style(wrapper).unwrap().top, Some(Length::Px(160.0)));
    }

    #[test]
    fn test_open_with_multibyte_content() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());

        modal.open(&mut dom, Some("<p>élan</p>"));
        assert_eq!(dom.text(modal.content().unwrap()), "élan");

        modal.update(&mut dom, "€100");
        assert_eq!(dom.text(modal.content().unwrap()), "€100");
    }

    #[test]
    fn test_align_before_open_is_noop() {
        let mut dom = page();
        let modal = body_modal(&dom, ModalOptions::default());

        modal.align(&mut dom);

        assert!(dom.children(dom.body()).is_empty());
    }

    #[test]
    fn test_resize_changes_size_and_realigns() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());
        modal.open(&mut dom, None);

        modal.resize(&mut dom, 200u32, 100u32);

        let style = dom.inline_style(modal.wrapper().unwrap()).unwrap();
        assert_eq!(style.width, Some(Length::Px(200.0)));
        assert_eq!(style.height, Some(Length::Px(100.0)));
        assert_eq!(style.max_width, Some(Length::Percent(95.0)));
        assert_eq!(style.top, Some(Length::Px(350.0)));
        assert_eq!(style.left, Some(Length::Px(400.0)));
        assert_eq!(modal.options().width, Length::Px(640.0));
        assert_eq!(modal.options().height, Length::Px(480.0));
    }

    #[test]
    fn test_resize_before_open_applies_on_init() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());

        modal.resize(&mut dom, Length::Percent(50.0), Length::Auto);
        assert!(!modal.is_initialized());

        modal.open(&mut dom, None);
        let style = dom.inline_style(modal.wrapper().unwrap()).unwrap();
        assert_eq!(style.width, Some(Length::Percent(50.0)));
        assert_eq!(style.height, Some(Length::Auto));
    }

    #[test]
    fn test_without_overlay() {
        let mut dom = page();
        let options = ModalOptions {
            overlay: false,
            ..ModalOptions::default()
        };
        let mut modal = body_modal(&dom, options);

        modal.open(&mut dom, Some("<p>bare</p>"));
        modal.align(&mut dom);
        modal.hide(&mut dom);

        assert_eq!(modal.overlay(), None);
        assert!(dom.find_by_class(OVERLAY_CLASS).is_empty());
    }

    #[test]
    fn test_overlay_tag_depends_on_blur() {
        let mut dom = page();
        let options = ModalOptions {
            blur: false,
            ..ModalOptions::default()
        };
        let mut modal = body_modal(&dom, options);
        modal.open(&mut dom, None);

        assert_eq!(dom.attribute(modal.overlay().unwrap(), DISMISS_ATTRIBUTE), None);
    }

    #[test]
    fn test_body_modal_binds_resize_and_escape() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());
        modal.open(&mut dom, None);

        assert_eq!(dom.binding_count(EventTarget::Window, EventKind::Resize), 1);
        assert_eq!(dom.binding_count(EventTarget::Document, EventKind::KeyUp), 1);
        assert_eq!(dom.binding_count(EventTarget::Document, EventKind::Click), 1);
    }

    #[test]
    fn test_escape_disabled_skips_key_binding() {
        let mut dom = page();
        let options = ModalOptions {
            escape: false,
            ..ModalOptions::default()
        };
        let mut modal = body_modal(&dom, options);
        modal.open(&mut dom, None);

        deliver(&mut dom, &mut modal, &DomEvent::KeyUp(Key::Escape));

        assert!(modal.is_open());
        assert_eq!(dom.binding_count(EventTarget::Document, EventKind::KeyUp), 0);
    }

    #[test]
    fn test_repeated_open_does_not_stack_listeners() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());

        modal.open(&mut dom, None);
        modal.open(&mut dom, None);
        modal.open(&mut dom, None);

        assert_eq!(dom.bindings().len(), 3);
    }

    #[test]
    fn test_hide_removes_every_listener() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());
        modal.open(&mut dom, None);

        modal.hide(&mut dom);

        assert!(dom.bindings().is_empty());
    }

    #[test]
    fn test_window_resize_realigns() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());
        modal.open(&mut dom, None);

        deliver(&mut dom, &mut modal, &DomEvent::Resize(Size::new(800.0, 600.0)));

        let style = dom.inline_style(modal.wrapper().unwrap()).unwrap();
        assert_eq!(style.top, Some(Length::Px(60.0)));
        assert_eq!(style.left, Some(Length::Px(80.0)));
    }

    #[test]
    fn test_close_affordance_dismisses() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());
        modal.open(&mut dom, None);

        let close = modal.close_button().unwrap();
        deliver(&mut dom, &mut modal, &DomEvent::Click(close));

        assert!(!modal.is_open());
    }

    #[test]
    fn test_backdrop_click_with_blur_dismisses() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());
        modal.open(&mut dom, None);

        let overlay = modal.overlay().unwrap();
        deliver(&mut dom, &mut modal, &DomEvent::Click(overlay));

        assert!(!modal.is_open());
    }

    #[test]
    fn test_backdrop_click_without_blur_keeps_open() {
        let mut dom = page();
        let options = ModalOptions {
            blur: false,
            ..ModalOptions::default()
        };
        let mut modal = body_modal(&dom, options);
        modal.open(&mut dom, None);

        let overlay = modal.overlay().unwrap();
        deliver(&mut dom, &mut modal, &DomEvent::Click(overlay));

        assert!(modal.is_open());
    }

    #[test]
    fn test_content_click_keeps_open() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());
        modal.open(&mut dom, Some("<p id=\"para\">text</p>"));

        let para = dom.find_by_id("para").unwrap();
        deliver(&mut dom, &mut modal, &DomEvent::Click(para));

        assert!(modal.is_open());
    }

    #[test]
    fn test_custom_close_button_in_content() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());
        modal.open(
            &mut dom,
            Some(r#"<p>Sure?</p><button id="ok" data-toggle="modal"><b id="label">OK</b></button>"#),
        );

        let label = dom.find_by_id("label").unwrap();
        let fired = dom.dispatch(&DomEvent::Click(label));
        assert!(fired.default_prevented);
        for msg in fired.messages {
            modal.handle(&mut dom, msg.trigger);
        }

        assert!(!modal.is_open());
    }

    #[test]
    fn test_body_scenario_escape() {
        let mut dom = page();
        let options = ModalOptions {
            overlay: true,
            blur: true,
            escape: true,
            ..ModalOptions::default()
        };
        let mut modal = body_modal(&dom, options);

        modal.open(&mut dom, Some("<p>hi</p>"));
        assert!(modal.is_open());
        assert_eq!(dom.text(modal.content().unwrap()), "hi");
        let overlay = modal.overlay().unwrap();
        assert!(dom.is_visible(overlay));

        deliver(&mut dom, &mut modal, &DomEvent::KeyUp(Key::Escape));
        assert!(!modal.is_open());
    }

    #[test]
    fn test_container_scenario() {
        let mut dom = page();
        let body = dom.body();
        dom.set_html(body, "<div id=\"box\"></div>");
        let container = dom.find_by_id("box").unwrap();
        let mut modal = Modal::new(container, ModalOptions::default(), ModalHooks::default());

        modal.open(&mut dom, None);

        let wrapper = modal.wrapper().unwrap();
        assert_eq!(dom.parent(wrapper), Some(container));
        assert_eq!(modal.context(), Some(Context::Element(container)));
        assert_eq!(
            dom.inline_style(container).unwrap().position,
            Some(Position::Relative)
        );
    }

    #[test]
    fn test_container_never_binds_resize_or_escape() {
        let mut dom = page();
        let body = dom.body();
        dom.set_html(body, "<div id=\"box\"></div>");
        let container = dom.find_by_id("box").unwrap();
        let options = ModalOptions {
            escape: true,
            ..ModalOptions::default()
        };
        let mut modal = Modal::new(container, options, ModalHooks::default());

        modal.open(&mut dom, None);
        deliver(&mut dom, &mut modal, &DomEvent::KeyUp(Key::Escape));

        assert!(modal.is_open());
        assert_eq!(dom.binding_count(EventTarget::Window, EventKind::Resize), 0);
        assert_eq!(dom.binding_count(EventTarget::Document, EventKind::KeyUp), 0);
    }

    #[test]
    fn test_container_align_uses_container_box() {
        let mut dom = page();
        let body = dom.body();
        dom.set_html(body, "<div id=\"box\"></div>");
        let container = dom.find_by_id("box").unwrap();
        dom.css(container, &Style::new().width(400u32).height(300u32));
        dom.set_scroll_top(container, 40.0);
        let mut modal = Modal::new(container, ModalOptions::default(), ModalHooks::default());

        modal.open(&mut dom, None);
        modal.align(&mut dom);

        let style = dom.inline_style(modal.wrapper().unwrap()).unwrap();
        // 95% of 400x300 caps the wrapper at 380x285.
        assert_eq!(style.top, Some(Length::Px(40.0 + 7.5)));
        assert_eq!(style.left, Some(Length::Px(10.0)));
        let overlay = dom.inline_style(modal.overlay().unwrap()).unwrap();
        assert_eq!(overlay.height, Some(Length::Px(300.0)));
    }

    #[test]
    fn test_teardown_removes_everything() {
        let mut dom = page();
        let mut modal = body_modal(&dom, ModalOptions::default());
        modal.open(&mut dom, None);

        modal.teardown(&mut dom);

        assert!(!modal.is_initialized());
        assert!(!modal.is_open());
        assert!(dom.children(dom.body()).is_empty());
        assert!(dom.bindings().is_empty());
    }
}
