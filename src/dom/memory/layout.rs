//! Block layout for [`MemoryDom`].
//!
//! Widths flow down from the containing block, heights flow up from content.
//! Keeping the two passes separate means an auto-height parent never has to
//! know its own width to size a child, so there are no cycles.

use serde::Serialize;

use super::MemoryDom;
use crate::dom::{Display, Length, NodeId, Position, Style};

/// Border box of an element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LayoutBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutBox {
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

impl<M> MemoryDom<M> {
    /// Height of the scrollable page: the viewport or the body content, whichever is taller.
    pub fn document_height(&self) -> f64 {
        let content = self
            .node(self.body)
            .and_then(|body| body.intrinsic)
            .map_or_else(|| self.flow_height(self.body), |size| size.height);
        content.max(self.viewport.height)
    }

    /// Border box of an attached element, `None` when detached or unknown.
    pub fn layout_box(&self, node: NodeId) -> Option<LayoutBox> {
        if node == self.body {
            return Some(LayoutBox {
                x: 0.0,
                y: 0.0,
                width: self.viewport.width,
                height: self.document_height(),
            });
        }
        let parent = self.node(node)?.parent?;
        let style = self.computed_style(node);
        let position = style.position.unwrap_or_default();

        let (x, y) = if position.is_out_of_flow() {
            let block = self.containing_block(node, position);
            (
                block.x + offset(style.left.as_ref(), block.width),
                block.y + offset(style.top.as_ref(), block.height),
            )
        } else {
            let content = self.content_box(parent);
            let mut y = content.y;
            for &sibling in self.children(parent) {
                if sibling == node {
                    break;
                }
                if self.in_flow(sibling) {
                    y += self.used_height(sibling);
                }
            }
            if position == Position::Relative {
                (
                    content.x + offset(style.left.as_ref(), content.width),
                    y + offset(style.top.as_ref(), content.height),
                )
            } else {
                (content.x, y)
            }
        };

        Some(LayoutBox {
            x,
            y,
            width: self.used_width(node),
            height: self.used_height(node),
        })
    }

    /// Outer width: content plus padding and border.
    pub(super) fn used_width(&self, node: NodeId) -> f64 {
        if node == self.body {
            return self.viewport.width;
        }
        let Some(element) = self.node(node) else {
            return 0.0;
        };
        if element.is_text() {
            return self.text_width(&element.text);
        }
        let style = self.computed_style(node);
        let edge = style.edge() * 2.0;
        let position = style.position.unwrap_or_default();
        let basis = self.basis_width(node, position);

        let width = style
            .width
            .as_ref()
            .and_then(|w| w.resolve(basis))
            .or_else(|| element.intrinsic.map(|size| size.width))
            .unwrap_or_else(|| {
                if position.is_out_of_flow() {
                    self.shrink_to_fit(node)
                } else {
                    (basis - edge).max(0.0)
                }
            });
        let width = clamp_max(width, &style, basis, true);
        width + edge
    }

    /// Outer height: content plus padding and border.
    pub(super) fn used_height(&self, node: NodeId) -> f64 {
        if node == self.body {
            return self.document_height();
        }
        let Some(element) = self.node(node) else {
            return 0.0;
        };
        if element.is_text() {
            return self.text_height(&element.text);
        }
        let style = self.computed_style(node);
        let edge = style.edge() * 2.0;
        let position = style.position.unwrap_or_default();
        let basis = self.basis_height(node, position);

        let height = style
            .height
            .as_ref()
            .and_then(|h| basis.and_then(|basis| h.resolve(basis)))
            .or_else(|| element.intrinsic.map(|size| size.height))
            .unwrap_or_else(|| self.flow_height(node));
        let height = clamp_max(height, &style, basis.unwrap_or(f64::INFINITY), false);
        height + edge
    }

    /// Sum of the outer heights of in-flow children.
    fn flow_height(&self, node: NodeId) -> f64 {
        self.children(node)
            .iter()
            .filter(|&&child| self.in_flow(child))
            .map(|&child| self.used_height(child))
            .sum()
    }

    fn in_flow(&self, node: NodeId) -> bool {
        let style = self.computed_style(node);
        style.display != Some(Display::None) && !style.position.unwrap_or_default().is_out_of_flow()
    }

    fn basis_width(&self, node: NodeId, position: Position) -> f64 {
        match (position, self.parent(node)) {
            (Position::Fixed, _) | (_, None) => self.viewport.width,
            (Position::Absolute, _) => self
                .positioned_ancestor(node)
                .map_or(self.viewport.width, |ancestor| self.inner_width(ancestor, true)),
            (_, Some(parent)) => self.inner_width(parent, false),
        }
    }

    /// Height percentages resolve only against a definite height.
    fn basis_height(&self, node: NodeId, position: Position) -> Option<f64> {
        match (position, self.parent(node)) {
            (Position::Fixed, _) | (_, None) => Some(self.viewport.height),
            (Position::Absolute, _) => Some(self.positioned_ancestor(node).map_or(
                self.viewport.height,
                |ancestor| {
                    let border = self.computed_style(ancestor).border.unwrap_or(0.0);
                    (self.used_height(ancestor) - border * 2.0).max(0.0)
                },
            )),
            (_, Some(parent)) if parent == self.body => Some(self.viewport.height),
            (_, Some(parent)) => {
                let style = self.computed_style(parent);
                let grand = self.basis_height(parent, style.position.unwrap_or_default());
                style
                    .height
                    .as_ref()
                    .and_then(|h| grand.and_then(|basis| h.resolve(basis)))
            }
        }
    }

    /// Width available to children: inside the border, and inside the padding
    /// too unless measuring a containing block for absolute children.
    fn inner_width(&self, node: NodeId, padding_box: bool) -> f64 {
        let style = self.computed_style(node);
        let inset = if padding_box {
            style.border.unwrap_or(0.0)
        } else {
            style.edge()
        };
        (self.used_width(node) - inset * 2.0).max(0.0)
    }

    /// Nearest positioned ancestor below the body.
    fn positioned_ancestor(&self, node: NodeId) -> Option<NodeId> {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == self.body {
                return None;
            }
            if self
                .computed_style(id)
                .position
                .unwrap_or_default()
                .is_positioned()
            {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    fn containing_block(&self, node: NodeId, position: Position) -> LayoutBox {
        let viewport = LayoutBox {
            x: 0.0,
            y: 0.0,
            width: self.viewport.width,
            height: self.viewport.height,
        };
        if position == Position::Fixed {
            return LayoutBox {
                y: self.window_scroll,
                ..viewport
            };
        }
        let Some(ancestor) = self.positioned_ancestor(node) else {
            return viewport;
        };
        let Some(outer) = self.layout_box(ancestor) else {
            return viewport;
        };
        let border = self.computed_style(ancestor).border.unwrap_or(0.0);
        let scroll = self.node(ancestor).map_or(0.0, |n| n.scroll_top);
        LayoutBox {
            x: outer.x + border,
            y: outer.y + border - scroll,
            width: (outer.width - border * 2.0).max(0.0),
            height: (outer.height - border * 2.0).max(0.0),
        }
    }

    /// Where in-flow children start, shifted by the element's scroll offset.
    fn content_box(&self, node: NodeId) -> LayoutBox {
        let Some(outer) = self.layout_box(node) else {
            return LayoutBox::default();
        };
        if node == self.body {
            return outer;
        }
        let edge = self.computed_style(node).edge();
        let scroll = self.node(node).map_or(0.0, |n| n.scroll_top);
        LayoutBox {
            x: outer.x + edge,
            y: outer.y + edge - scroll,
            width: (outer.width - edge * 2.0).max(0.0),
            height: (outer.height - edge * 2.0).max(0.0),
        }
    }

    /// Widest child measured without a containing width.
    fn shrink_to_fit(&self, node: NodeId) -> f64 {
        self.children(node)
            .iter()
            .map(|&child| self.intrinsic_width(child))
            .fold(0.0, f64::max)
    }

    fn intrinsic_width(&self, node: NodeId) -> f64 {
        let Some(element) = self.node(node) else {
            return 0.0;
        };
        if element.is_text() {
            return self.text_width(&element.text);
        }
        let style = self.computed_style(node);
        let content = match &style.width {
            Some(Length::Px(px)) => *px,
            _ => element
                .intrinsic
                .map_or_else(|| self.shrink_to_fit(node), |size| size.width),
        };
        content + style.edge() * 2.0
    }

    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str) -> f64 {
        let longest = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
        longest as f64 * self.char_width
    }

    #[allow(clippy::cast_precision_loss)]
    fn text_height(&self, text: &str) -> f64 {
        text.lines().count().max(1) as f64 * self.line_height
    }
}

fn offset(length: Option<&Length>, basis: f64) -> f64 {
    length.and_then(|l| l.resolve(basis)).unwrap_or(0.0)
}

fn clamp_max(value: f64, style: &Style, basis: f64, horizontal: bool) -> f64 {
    let max = if horizontal {
        style.max_width.as_ref()
    } else {
        style.max_height.as_ref()
    };
    max.and_then(|m| m.resolve(basis))
        .map_or(value, |max| value.min(max))
}
