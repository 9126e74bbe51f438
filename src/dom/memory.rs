//! In-memory host document.
//!
//! [`MemoryDom`] keeps a retained element tree with a small block layout
//! model, namespaced listeners with attribute delegation, and fades that are
//! advanced explicitly with [`MemoryDom::tick`]. The terminal front-end
//! renders it and the tests use it as a fixture page.

mod layout;
mod markup;

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::Serialize;
use tracing::{trace, warn};

pub use layout::LayoutBox;
use markup::Markup;

use super::{
    Binding, Dispatched, Display, Dom, DomEvent, EventKind, EventTarget, Key, NodeId, Selector,
    Size, Style,
};

/// Default fade length, the usual "normal" speed for page animations.
pub const DEFAULT_FADE: Duration = Duration::from_millis(400);
pub const DEFAULT_LINE_HEIGHT: f64 = 16.0;
pub const DEFAULT_CHAR_WIDTH: f64 = 8.0;

const TEXT_TAG: &str = "#text";

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    style: Style,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    opacity: f64,
    scroll_top: f64,
    intrinsic: Option<Size>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            style: Style::default(),
            parent: None,
            children: Vec::new(),
            opacity: 1.0,
            scroll_top: 0.0,
            intrinsic: None,
        }
    }

    fn text(text: &str) -> Self {
        let mut node = Self::new(TEXT_TAG);
        node.text = text.to_string();
        node
    }

    fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
    hide_when_done: bool,
}

impl Fade {
    fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    fn opacity(&self) -> f64 {
        (self.to - self.from).mul_add(self.progress(), self.from)
    }

    fn is_done(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Serializable view of a subtree, used for dumps and debugging.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub style: Style,
    pub visible: bool,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutBox>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

/// A page held entirely in memory.
///
/// `M` is the message type carried by listener bindings.
#[derive(Debug)]
pub struct MemoryDom<M> {
    nodes: Vec<Option<Node>>,
    body: NodeId,
    viewport: Size,
    window_scroll: f64,
    bindings: Vec<Binding<M>>,
    fades: HashMap<NodeId, Fade>,
    rules: Vec<(String, Style)>,
    fade_duration: Duration,
    line_height: f64,
    char_width: f64,
}

impl<M> MemoryDom<M> {
    /// Create an empty page with the given viewport.
    pub fn new(viewport: Size) -> Self {
        Self {
            nodes: vec![Some(Node::new("body"))],
            body: NodeId(0),
            viewport,
            window_scroll: 0.0,
            bindings: Vec::new(),
            fades: HashMap::new(),
            rules: Vec::new(),
            fade_duration: DEFAULT_FADE,
            line_height: DEFAULT_LINE_HEIGHT,
            char_width: DEFAULT_CHAR_WIDTH,
        }
    }

    #[must_use]
    pub const fn with_fade_duration(mut self, duration: Duration) -> Self {
        self.fade_duration = duration;
        self
    }

    /// Set the metrics used to size text runs.
    #[must_use]
    pub const fn with_text_metrics(mut self, char_width: f64, line_height: f64) -> Self {
        self.char_width = char_width;
        self.line_height = line_height;
        self
    }

    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    pub const fn window_scroll(&self) -> f64 {
        self.window_scroll
    }

    /// Scroll the window, clamped to the scrollable range.
    pub fn scroll_window_to(&mut self, top: f64) {
        let max = (self.document_height() - self.viewport.height).max(0.0);
        self.window_scroll = top.clamp(0.0, max);
    }

    pub fn set_scroll_top(&mut self, node: NodeId, top: f64) {
        if let Some(node) = self.node_mut(node) {
            node.scroll_top = top.max(0.0);
        }
    }

    /// Fix the content size of an element, as replaced content would.
    pub fn set_intrinsic_size(&mut self, node: NodeId, size: Size) {
        if let Some(node) = self.node_mut(node) {
            node.intrinsic = Some(size);
        }
    }

    /// Add a class rule to the page stylesheet. Inline styles win over rules.
    pub fn add_class_rule(&mut self, class: impl Into<String>, style: Style) {
        self.rules.push((class.into(), style));
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.tag.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[], |n| n.children.as_slice())
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.node(node).map_or(&[], |n| n.classes.as_slice())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    pub fn inline_style(&self, node: NodeId) -> Option<&Style> {
        self.node(node).map(|n| &n.style)
    }

    /// Stylesheet rules for the element's classes, overridden by its inline style.
    pub fn computed_style(&self, node: NodeId) -> Style {
        let Some(element) = self.node(node) else {
            return Style::default();
        };
        let mut style = Style::default();
        for (class, rule) in &self.rules {
            if element.classes.iter().any(|c| c == class) {
                style.merge(rule);
            }
        }
        style.merge(&element.style);
        style
    }

    /// Text content of the subtree, markup stripped.
    pub fn text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(element) = self.node(node) else {
            return;
        };
        if element.is_text() {
            out.push_str(&element.text);
            return;
        }
        for &child in &element.children {
            self.collect_text(child, out);
        }
    }

    /// Whether the text run node is a text node rather than an element.
    pub fn is_text(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(Node::is_text)
    }

    pub fn opacity(&self, node: NodeId) -> f64 {
        self.node(node).map_or(0.0, |n| n.opacity)
    }

    /// Attached to the page and neither the element nor an ancestor has `display: none`.
    pub fn is_visible(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(element) = self.node(id) else {
                return false;
            };
            if self.computed_style(id).display == Some(Display::None) {
                return false;
            }
            if id == self.body {
                return true;
            }
            current = element.parent;
        }
        false
    }

    pub fn is_animating(&self, node: NodeId) -> bool {
        self.fades.contains_key(&node)
    }

    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|&node| self.attribute(node, "id") == Some(id))
    }

    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|&node| self.has_class(node, class))
            .collect()
    }

    pub fn query(&self, selector: &Selector) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|&node| selector.matches(self.attribute(node, &selector.attribute)))
            .collect()
    }

    /// Elements below `root` in document order, `root` excluded.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub fn bindings(&self) -> &[Binding<M>] {
        &self.bindings
    }

    /// Number of bindings of `kind` attached to `target`.
    pub fn binding_count(&self, target: EventTarget, kind: EventKind) -> usize {
        self.bindings
            .iter()
            .filter(|b| b.target == target && b.kind == kind)
            .count()
    }

    /// Advance every running fade by `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) {
        let mut finished = Vec::new();
        for (&node, fade) in &mut self.fades {
            fade.elapsed += elapsed;
            if let Some(element) = self.nodes.get_mut(node.0).and_then(Option::as_mut) {
                element.opacity = fade.opacity();
                if fade.is_done() && fade.hide_when_done {
                    element.style.display = Some(Display::None);
                }
            }
            if fade.is_done() {
                finished.push(node);
            }
        }
        for node in finished {
            trace!(%node, "fade finished");
            self.fades.remove(&node);
        }
    }

    /// Jump every running fade to its end state.
    pub fn finish_animations(&mut self) {
        let longest = self
            .fades
            .values()
            .map(|fade| fade.duration.saturating_sub(fade.elapsed))
            .max()
            .unwrap_or_default();
        self.tick(longest);
        self.fades.retain(|_, fade| !fade.is_done());
    }

    /// Top-most visible element under the point, in document coordinates.
    pub fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
        self.paint_order()
            .into_iter()
            .rev()
            .filter(|&node| !self.is_text(node))
            .find(|&node| self.layout_box(node).is_some_and(|b| b.contains(x, y)))
    }

    /// Visible elements from bottom to top.
    ///
    /// Document order, stably sorted by the nearest `z-index` up the ancestor
    /// chain. Hidden subtrees are skipped.
    pub fn paint_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_paint(self.body, 0, &mut out);
        out.sort_by_key(|&(_, z)| z);
        out.into_iter().map(|(node, _)| node).collect()
    }

    fn collect_paint(&self, node: NodeId, inherited: i32, out: &mut Vec<(NodeId, i32)>) {
        for &child in self.children(node) {
            let style = self.computed_style(child);
            if style.display == Some(Display::None) {
                continue;
            }
            let z = style.z_index.unwrap_or(inherited);
            out.push((child, z));
            self.collect_paint(child, z, out);
        }
    }

    /// Fire the bindings an event reaches and report their messages.
    ///
    /// Clicks bubble from the clicked element up to the body, then reach the
    /// document and the window. Delegated bindings only fire when an element
    /// on the path below the listener matches their selector.
    pub fn dispatch(&mut self, event: &DomEvent) -> Dispatched<M>
    where
        M: Clone,
    {
        let mut dispatched = Dispatched::default();
        match *event {
            DomEvent::Click(node) => {
                if !self.contains(node) {
                    warn!(%node, "click on unknown node");
                    return dispatched;
                }
                let path = self.path(node);
                for (index, &current) in path.iter().enumerate() {
                    self.fire(
                        EventTarget::Node(current),
                        EventKind::Click,
                        None,
                        &path[..index],
                        &mut dispatched,
                    );
                }
                self.fire(EventTarget::Document, EventKind::Click, None, &path, &mut dispatched);
                self.fire(EventTarget::Window, EventKind::Click, None, &path, &mut dispatched);
            }
            DomEvent::KeyUp(key) => {
                self.fire(EventTarget::Document, EventKind::KeyUp, Some(key), &[], &mut dispatched);
                self.fire(EventTarget::Window, EventKind::KeyUp, Some(key), &[], &mut dispatched);
            }
            DomEvent::Resize(size) => {
                self.viewport = size;
                self.scroll_window_to(self.window_scroll);
                self.fire(EventTarget::Window, EventKind::Resize, None, &[], &mut dispatched);
            }
        }
        trace!(?event, fired = dispatched.messages.len(), "dispatched");
        dispatched
    }

    fn fire(
        &self,
        target: EventTarget,
        kind: EventKind,
        key: Option<Key>,
        below: &[NodeId],
        dispatched: &mut Dispatched<M>,
    ) where
        M: Clone,
    {
        for binding in &self.bindings {
            if binding.target != target || binding.kind != kind {
                continue;
            }
            if binding.key.is_some() && binding.key != key {
                continue;
            }
            if let Some(selector) = &binding.delegate {
                let matched = below
                    .iter()
                    .any(|&node| selector.matches(self.attribute(node, &selector.attribute)));
                if !matched {
                    continue;
                }
            }
            dispatched.messages.push(binding.message.clone());
            dispatched.default_prevented |= binding.prevent_default;
        }
    }

    /// The element followed by its ancestors, up to and including the body.
    fn path(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            path.push(id);
            current = self.parent(id);
        }
        path
    }

    pub fn snapshot(&self, node: NodeId) -> Option<NodeSnapshot> {
        let element = self.node(node)?;
        Some(NodeSnapshot {
            id: node,
            tag: element.tag.clone(),
            classes: element.classes.clone(),
            attributes: element.attributes.clone(),
            text: element.is_text().then(|| element.text.clone()),
            style: element.style.clone(),
            visible: self.is_visible(node),
            opacity: element.opacity,
            layout: self.layout_box(node),
            children: element
                .children
                .iter()
                .filter_map(|&child| self.snapshot(child))
                .collect(),
        })
    }

    fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut Node> {
        let found = self.nodes.get_mut(node.0).and_then(Option::as_mut);
        if found.is_none() {
            warn!(%node, "operation on unknown node ignored");
        }
        found
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(node));
        id
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent.0).and_then(Option::as_mut) {
            parent.children.retain(|&child| child != node);
        }
        if let Some(element) = self.nodes.get_mut(node.0).and_then(Option::as_mut) {
            element.parent = None;
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(element) = self.nodes.get_mut(child.0).and_then(Option::as_mut) {
            element.parent = Some(parent);
        }
        if let Some(element) = self.nodes.get_mut(parent.0).and_then(Option::as_mut) {
            element.children.push(child);
        }
    }

    fn drop_subtree(&mut self, node: NodeId) {
        let mut doomed = self.descendants(node);
        doomed.push(node);
        for id in doomed {
            if let Some(slot) = self.nodes.get_mut(id.0) {
                *slot = None;
            }
            self.fades.remove(&id);
            self.bindings.retain(|b| b.target != EventTarget::Node(id));
        }
    }

    fn clear_children(&mut self, node: NodeId) {
        let children = self.children(node).to_vec();
        for child in children {
            self.detach(child);
            self.drop_subtree(child);
        }
    }

    fn build(&mut self, parent: NodeId, markup: Vec<Markup>) {
        for item in markup {
            match item {
                Markup::Text(text) => {
                    let child = self.insert(Node::text(&text));
                    self.attach(parent, child);
                }
                Markup::Element {
                    tag,
                    attributes,
                    children,
                } => {
                    let child = self.insert(Node::new(&tag));
                    for (name, value) in attributes {
                        if name == "class" {
                            for class in value.split_whitespace() {
                                self.add_class(child, class);
                            }
                        } else {
                            self.set_attribute(child, &name, &value);
                        }
                    }
                    self.attach(parent, child);
                    self.build(child, children);
                }
            }
        }
    }

    fn would_cycle(&self, parent: NodeId, child: NodeId) -> bool {
        self.path(parent).contains(&child)
    }
}

impl<M> Dom<M> for MemoryDom<M> {
    fn body(&self) -> NodeId {
        self.body
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.insert(Node::new(tag))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.node_mut(node) {
            if !element.classes.iter().any(|c| c == class) {
                element.classes.push(class.to_string());
            }
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.node_mut(node) {
            element.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if self.node_mut(node).is_none() {
            return;
        }
        self.clear_children(node);
        let child = self.insert(Node::text(text));
        self.attach(node, child);
    }

    fn set_html(&mut self, node: NodeId, html: &str) {
        if self.node_mut(node).is_none() {
            return;
        }
        self.clear_children(node);
        self.build(node, markup::parse(html));
    }

    fn css(&mut self, node: NodeId, style: &Style) {
        if let Some(element) = self.node_mut(node) {
            element.style.merge(style);
        }
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            warn!(%parent, %child, "append with unknown node ignored");
            return;
        }
        if self.would_cycle(parent, child) {
            warn!(%parent, %child, "append would create a cycle");
            return;
        }
        self.detach(child);
        self.attach(parent, child);
    }

    fn remove(&mut self, node: NodeId) {
        if node == self.body {
            warn!("refusing to remove the body");
            return;
        }
        self.detach(node);
        self.drop_subtree(node);
    }

    fn outer_size(&self, target: EventTarget) -> Size {
        match target {
            EventTarget::Window => self.viewport,
            EventTarget::Document => Size::new(self.viewport.width, self.document_height()),
            EventTarget::Node(node) if node == self.body => {
                Size::new(self.viewport.width, self.document_height())
            }
            EventTarget::Node(node) => Size::new(self.used_width(node), self.used_height(node)),
        }
    }

    fn scroll_top(&self, target: EventTarget) -> f64 {
        match target {
            EventTarget::Window | EventTarget::Document => self.window_scroll,
            EventTarget::Node(node) if node == self.body => self.window_scroll,
            EventTarget::Node(node) => self.node(node).map_or(0.0, |n| n.scroll_top),
        }
    }

    fn on(&mut self, binding: Binding<M>) {
        trace!(namespace = %binding.namespace, kind = ?binding.kind, "bind");
        self.bindings.push(binding);
    }

    fn off(&mut self, namespace: &str) {
        self.bindings.retain(|b| b.namespace != namespace);
    }

    fn stop(&mut self, node: NodeId) {
        self.fades.remove(&node);
    }

    fn fade_in(&mut self, node: NodeId) {
        let hidden = self.computed_style(node).display == Some(Display::None);
        let duration = self.fade_duration;
        let Some(element) = self.node_mut(node) else {
            return;
        };
        if hidden {
            element.style.display = Some(Display::Block);
            element.opacity = 0.0;
        } else if element.opacity >= 1.0 {
            return;
        }
        let fade = Fade {
            from: element.opacity,
            to: 1.0,
            elapsed: Duration::ZERO,
            duration,
            hide_when_done: false,
        };
        self.fades.insert(node, fade);
    }

    fn fade_out(&mut self, node: NodeId) {
        if self.computed_style(node).display == Some(Display::None) {
            return;
        }
        let duration = self.fade_duration;
        let Some(element) = self.node_mut(node) else {
            return;
        };
        let fade = Fade {
            from: element.opacity,
            to: 0.0,
            elapsed: Duration::ZERO,
            duration,
            hide_when_done: true,
        };
        self.fades.insert(node, fade);
    }
}
