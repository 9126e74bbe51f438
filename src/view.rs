//! Paints a [`Page`] into a ratatui buffer.
//!
//! Every page pixel box is snapped to terminal cells using the configured
//! cell size. Elements are drawn in paint order so the wrapper lands on top
//! of the backdrop, which lands on top of the page. Opacity is emulated by
//! blending colors toward the page background.

use lazymodal::dom::NodeId;
use lazymodal::dom::memory::LayoutBox;
use lazymodal::modal::{CLOSE_CLASS, OVERLAY_CLASS, WRAPPER_CLASS};
use ratatui::buffer::Buffer;
use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Clear, Widget};

use crate::page::{CARD_CLASS, Page};
use crate::theme::{Theme, blend};

/// How much of the backdrop color covers the page at full opacity.
const BACKDROP_STRENGTH: f64 = 0.75;

pub struct PageView<'a> {
    page: &'a Page,
    theme: &'a Theme,
}

impl<'a> PageView<'a> {
    pub const fn new(page: &'a Page, theme: &'a Theme) -> Self {
        Self { page, theme }
    }

    /// Snap a page box to the cells it touches, clipped to `area`.
    #[allow(clippy::cast_possible_truncation)]
    fn cells(&self, layout: LayoutBox, area: Rect) -> Option<Rect> {
        let cell = self.page.cell();
        let scroll = self.page.dom().window_scroll();
        let left = (layout.x / cell.width).floor() as i64;
        let top = ((layout.y - scroll) / cell.height).floor() as i64;
        let right = (layout.right() / cell.width).ceil() as i64;
        let bottom = ((layout.bottom() - scroll) / cell.height).ceil() as i64;

        let left = left.clamp(0, i64::from(area.width));
        let right = right.clamp(0, i64::from(area.width));
        let top = top.clamp(0, i64::from(area.height));
        let bottom = bottom.clamp(0, i64::from(area.height));
        if right <= left || bottom <= top {
            return None;
        }
        let to_u16 = |v: i64| u16::try_from(v).unwrap_or(u16::MAX);
        Some(Rect::new(
            area.x + to_u16(left),
            area.y + to_u16(top),
            to_u16(right - left),
            to_u16(bottom - top),
        ))
    }

    /// Opacity of the element combined with every ancestor's.
    fn opacity(&self, node: NodeId) -> f64 {
        let dom = self.page.dom();
        let mut opacity = 1.0;
        let mut current = Some(node);
        while let Some(id) = current {
            opacity *= dom.opacity(id);
            current = dom.parent(id);
        }
        opacity
    }

    /// Nearest ancestor drawn as a box, whose border clips its content.
    fn frame(&self, node: NodeId) -> Option<NodeId> {
        let dom = self.page.dom();
        let mut current = dom.parent(node);
        while let Some(id) = current {
            if dom.has_class(id, WRAPPER_CLASS) || dom.has_class(id, CARD_CLASS) {
                return Some(id);
            }
            current = dom.parent(id);
        }
        None
    }

    fn render_element(&self, node: NodeId, area: Rect, buf: &mut Buffer) {
        let dom = self.page.dom();
        let Some(rect) = dom.layout_box(node).and_then(|b| self.cells(b, area)) else {
            return;
        };
        let theme = self.theme;
        let opacity = self.opacity(node);

        if dom.has_class(node, OVERLAY_CLASS) {
            let amount = BACKDROP_STRENGTH * opacity;
            for y in rect.top()..rect.bottom() {
                for x in rect.left()..rect.right() {
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.bg = blend(cell.bg, theme.crust, amount);
                        cell.fg = blend(cell.fg, theme.crust, amount);
                    }
                }
            }
        } else if dom.has_class(node, WRAPPER_CLASS) {
            Clear.render(rect, buf);
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(blend(theme.base, theme.lavender, opacity)))
                .style(Style::default().bg(blend(theme.base, theme.surface0, opacity)))
                .render(rect, buf);
        } else if dom.has_class(node, CARD_CLASS) {
            Block::bordered()
                .border_type(BorderType::Plain)
                .border_style(Style::default().fg(theme.surface1))
                .title(" #box ")
                .title_style(Style::default().fg(theme.blue))
                .render(rect, buf);
        }
    }

    fn text_style(&self, node: NodeId) -> Style {
        let dom = self.page.dom();
        let theme = self.theme;
        let mut current = dom.parent(node);
        while let Some(id) = current {
            if dom.has_class(id, CLOSE_CLASS) {
                return Style::default().fg(theme.red);
            }
            match dom.tag(id) {
                Some("button") => {
                    return Style::default().fg(theme.peach).add_modifier(Modifier::BOLD);
                }
                Some("h1" | "h2") => {
                    return Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD);
                }
                _ => {}
            }
            current = dom.parent(id);
        }
        Style::default().fg(theme.text)
    }

    fn render_text(&self, node: NodeId, area: Rect, buf: &mut Buffer) {
        let dom = self.page.dom();
        let Some(layout) = dom.layout_box(node) else {
            return;
        };
        let clip = match self.frame(node) {
            Some(frame) => match dom.layout_box(frame).and_then(|b| self.cells(b, area)) {
                Some(rect) => rect.inner(Margin::new(1, 1)),
                None => return,
            },
            None => area,
        };

        let style = self.text_style(node);
        let opacity = self.opacity(node);
        let background = if self.frame(node).is_some_and(|f| dom.has_class(f, WRAPPER_CLASS)) {
            self.theme.surface0
        } else {
            self.theme.base
        };
        let style = style.fg(blend(background, style.fg.unwrap_or(Color::Reset), opacity));

        let cell = self.page.cell();
        let scroll = dom.window_scroll();
        #[allow(clippy::cast_possible_truncation)]
        let (column, row) = (
            (layout.x / cell.width).floor() as i64 + i64::from(area.x),
            ((layout.y - scroll) / cell.height).floor() as i64 + i64::from(area.y),
        );

        for (offset, line) in dom.text(node).lines().enumerate() {
            let y = row + i64::try_from(offset).unwrap_or(i64::MAX);
            if y < i64::from(clip.top()) || y >= i64::from(clip.bottom()) {
                continue;
            }
            let skip = (i64::from(clip.left()) - column).max(0);
            let x = column + skip;
            let room = i64::from(clip.right()) - x;
            if room <= 0 {
                continue;
            }
            let visible: String = line
                .chars()
                .skip(usize::try_from(skip).unwrap_or(usize::MAX))
                .collect();
            let (Ok(x), Ok(y), Ok(room)) = (u16::try_from(x), u16::try_from(y), usize::try_from(room))
            else {
                continue;
            };
            buf.set_stringn(x, y, visible, room, style);
        }
    }
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.theme.base).fg(self.theme.text));
        let dom = self.page.dom();
        for node in dom.paint_order() {
            if dom.is_text(node) {
                self.render_text(node, area, buf);
            } else {
                self.render_element(node, area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lazymodal::dom::{DomEvent, Key, Size};

    use super::*;
    use crate::config::AppConfig;

    fn render(page: &Page) -> Buffer {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 120, 39);
        let mut buf = Buffer::empty(area);
        PageView::new(page, &theme).render(area, &mut buf);
        buf
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).map_or(" ", |c| c.symbol()))
            .collect()
    }

    fn screen(buf: &Buffer) -> String {
        (0..buf.area.height).map(|y| row(buf, y)).collect::<Vec<_>>().join("\n")
    }

    fn page() -> Page {
        Page::new(Size::new(960.0, 624.0), &AppConfig::default())
    }

    #[test]
    fn test_renders_page_text() {
        let buf = render(&page());
        assert!(row(&buf, 0).starts_with("lazymodal"));
        assert!(screen(&buf).contains("#box"));
    }

    #[test]
    fn test_renders_open_modal() {
        let mut page = page();
        page.open_modal();
        page.tick(Duration::from_secs(1));

        let buf = render(&page);
        let screen = screen(&buf);
        assert!(screen.contains("Close"));
        assert!(screen.contains("Welcome"));
        assert!(screen.contains('╭'));
    }

    #[test]
    fn test_hidden_modal_is_not_drawn() {
        let mut page = page();
        page.open_modal();
        page.dispatch(&DomEvent::KeyUp(Key::Escape));
        page.tick(Duration::from_secs(1));

        let screen = screen(&render(&page));
        assert!(!screen.contains("Welcome"));
        assert!(!screen.contains('╭'));
    }

    #[test]
    fn test_scroll_moves_content() {
        let mut page = page();
        page.scroll(1);
        let buf = render(&page);
        assert!(!row(&buf, 0).starts_with("lazymodal"));
    }
}
