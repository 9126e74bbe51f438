//! The demo page: a document with a boxed container and two modals.

use std::time::Duration;

use lazymodal::dom::memory::{MemoryDom, NodeSnapshot};
use lazymodal::dom::{Dom, DomEvent, Length, NodeId, Size, Style};
use lazymodal::modal::{OVERLAY_CLASS, WRAPPER_CLASS};
use lazymodal::{Modal, ModalHooks, ModalMsg, ModalOptions, ModalRegistry};
use tracing::{debug, info};

use crate::config::AppConfig;

pub const CARD_CLASS: &str = "card";
const CONTAINER_ID: &str = "box";

const PAGE: &str = r#"
<h1>lazymodal</h1>
<p>A page with a modal that centers itself over whatever it is bound to.</p>
<p>o opens the page modal, u swaps its content, r resizes it.</p>
<p>c opens a second modal that lives inside the box below.</p>
<p>Esc, the Close label or a click on the backdrop dismiss.</p>
<div id="box" class="card">
  <p>This box hosts its own modal.</p>
  <p>It does not listen for Esc or window resizes.</p>
</div>
"#;

const SAMPLES: &[&str] = &[
    "<h2>Welcome</h2><p>This modal is centered over the page.</p><p>Scroll with j and k, then open it again.</p>",
    r#"<h2>Confirm</h2><p>Anything tagged data-toggle="modal" closes it.</p><button data-toggle="modal">OK</button>"#,
    "<h2>Changelog</h2><p>Content is replaced in place.</p><p>The wrapper keeps its size.</p><p>Alignment is recomputed while open.</p><p>Hidden modals keep their content.</p>",
];

const CONTAINER_CONTENT: &str = "<p>Bound to the box.</p><p>Click Close to dismiss.</p>";

/// Rows of filler after the box so the window has something to scroll.
const FILLER_ROWS: usize = 40;

pub struct Page {
    dom: MemoryDom<ModalMsg>,
    registry: ModalRegistry,
    container: NodeId,
    modal_options: ModalOptions,
    container_options: ModalOptions,
    sample: usize,
    compact: bool,
    cell: Size,
}

impl Page {
    pub fn new(viewport: Size, config: &AppConfig) -> Self {
        let cell = Size::new(config.display.cell_width, config.display.cell_height);
        let mut dom = MemoryDom::new(viewport)
            .with_fade_duration(Duration::from_millis(config.display.fade_ms))
            .with_text_metrics(cell.width, cell.height);

        dom.add_class_rule(WRAPPER_CLASS, Style::new().padding(cell.height).z_index(2));
        dom.add_class_rule(OVERLAY_CLASS, Style::new().z_index(1));
        dom.add_class_rule(
            CARD_CLASS,
            Style::new()
                .width(Length::Percent(60.0))
                .height(cell.height * 12.0)
                .padding(cell.height),
        );

        let body = dom.body();
        let filler: String = (1..=FILLER_ROWS).map(|n| format!("<p>Line {n}</p>")).collect();
        dom.set_html(body, &format!("{PAGE}{filler}"));
        let container = dom.find_by_id(CONTAINER_ID).unwrap_or(body);

        Self {
            dom,
            registry: ModalRegistry::new(),
            container,
            modal_options: config.modal.clone(),
            container_options: config.container.clone(),
            sample: 0,
            compact: false,
            cell,
        }
    }

    pub const fn dom(&self) -> &MemoryDom<ModalMsg> {
        &self.dom
    }

    pub const fn cell(&self) -> Size {
        self.cell
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.registry.get(self.dom.body())
    }

    pub fn container_modal(&self) -> Option<&Modal> {
        self.registry.get(self.container)
    }

    fn hooks(label: &'static str) -> ModalHooks {
        ModalHooks::default()
            .on_open(move |modal| info!(label, node = %modal.target(), "Modal opened"))
            .on_hide(move |modal| info!(label, node = %modal.target(), "Modal hidden"))
    }

    pub fn open_modal(&mut self) {
        let body = self.dom.body();
        let content = SAMPLES[self.sample];
        self.registry
            .bind(body, self.modal_options.clone(), Self::hooks("page"))
            .open(&mut self.dom, Some(content));
    }

    /// Advance to the next sample. An open page modal shows it right away.
    pub fn next_content(&mut self) {
        self.sample = (self.sample + 1) % SAMPLES.len();
        let body = self.dom.body();
        let sample = self.sample;
        if let Some(modal) = self.registry.get_mut(body) {
            modal.update_with(&mut self.dom, SAMPLES[sample], |modal| {
                debug!(sample, open = modal.is_open(), "Content swapped");
            });
        }
    }

    /// Switch the page modal between its configured size and a compact one.
    pub fn toggle_size(&mut self) {
        self.compact = !self.compact;
        let (width, height) = if self.compact {
            (Length::Px(self.cell.width * 40.0), Length::Px(self.cell.height * 8.0))
        } else {
            (self.modal_options.width.clone(), self.modal_options.height.clone())
        };
        let body = self.dom.body();
        if let Some(modal) = self.registry.get_mut(body) {
            modal.resize(&mut self.dom, width, height);
        }
    }

    pub fn open_container(&mut self) {
        if self.container == self.dom.body() {
            return;
        }
        self.registry
            .bind(self.container, self.container_options.clone(), Self::hooks("box"))
            .open(&mut self.dom, Some(CONTAINER_CONTENT));
    }

    pub fn dispatch(&mut self, event: &DomEvent) {
        let dispatched = self.registry.handle(&mut self.dom, event);
        if !dispatched.is_empty() {
            debug!(?event, fired = dispatched.messages.len(), "Page event handled");
        }
    }

    /// Click the top-most element under a terminal cell.
    pub fn click(&mut self, column: u16, row: u16) {
        let x = (f64::from(column) + 0.5) * self.cell.width;
        let y = (f64::from(row) + 0.5).mul_add(self.cell.height, self.dom.window_scroll());
        if let Some(node) = self.dom.node_at(x, y) {
            self.dispatch(&DomEvent::Click(node));
        }
    }

    /// The terminal area changed to `columns` by `rows` cells.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        let viewport = Size::new(
            f64::from(columns) * self.cell.width,
            f64::from(rows) * self.cell.height,
        );
        self.dispatch(&DomEvent::Resize(viewport));
    }

    pub fn scroll(&mut self, rows: i32) {
        let top = f64::from(rows).mul_add(self.cell.height, self.dom.window_scroll());
        self.dom.scroll_window_to(top);
    }

    pub fn tick(&mut self, elapsed: Duration) {
        self.dom.tick(elapsed);
    }

    /// The whole page, with the page modal opened and settled.
    pub fn dump(mut self) -> Option<NodeSnapshot> {
        self.open_modal();
        self.dom.finish_animations();
        self.dom.snapshot(self.dom.body())
    }
}
