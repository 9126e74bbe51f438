use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use lazymodal::dom::{DomEvent, Key};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

use crate::command::Command;
use crate::config::AppConfig;
use crate::page::Page;
use crate::theme::Theme;
use crate::tui::{Event, Tui};
use crate::view::PageView;

/// Rows scrolled per mouse wheel notch.
const WHEEL_ROWS: i32 = 3;

pub struct App {
    config: AppConfig,
    theme: Theme,
    page: Page,
    should_quit: bool,
    should_suspend: bool,
    last_tick: Instant,
    command_tx: UnboundedSender<Command>,
    command_rx: UnboundedReceiver<Command>,
}

impl App {
    pub fn new(config: AppConfig, theme: Theme, page: Page) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        Self {
            config,
            theme,
            page,
            should_quit: false,
            should_suspend: false,
            last_tick: Instant::now(),
            command_tx,
            command_rx,
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = Tui::new(self.config.display.frame_rate, self.config.display.tick_rate)?;
        tui.enter()?;

        let size = tui.size()?;
        self.page.resize(size.width, page_rows(size.height));

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_commands(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                self.command_tx.send(Command::Resume)?;
                self.command_tx.send(Command::ClearScreen)?;
                tui.enter()?;
            } else if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };

        match event {
            Event::Init => self.last_tick = Instant::now(),
            Event::Quit => self.command_tx.send(Command::Quit)?,
            Event::Tick => self.command_tx.send(Command::Tick)?,
            Event::Render => self.command_tx.send(Command::Render)?,
            Event::Resize(width, height) => self.command_tx.send(Command::Resize(width, height))?,
            Event::Key(key) => self.command_tx.send(self.handle_key_event(key))?,
            Event::Mouse(mouse) => {
                if let Some(command) = Self::handle_mouse_event(mouse) {
                    self.command_tx.send(command)?;
                }
            }
            Event::Error(message) => error!(%message, "Terminal event error"),
        }
        Ok(())
    }

    fn handle_key_event(&self, key: KeyEvent) -> Command {
        let bindings = &self.config.keybindings;
        if bindings.quit.matches(&key) {
            Command::Quit
        } else if bindings.suspend.matches(&key) {
            Command::Suspend
        } else if bindings.open.matches(&key) {
            Command::OpenModal
        } else if bindings.update.matches(&key) {
            Command::NextContent
        } else if bindings.resize.matches(&key) {
            Command::ToggleSize
        } else if bindings.container.matches(&key) {
            Command::OpenContainer
        } else if bindings.scroll_up.matches(&key) {
            Command::Scroll(-1)
        } else if bindings.scroll_down.matches(&key) {
            Command::Scroll(1)
        } else {
            // Everything else is typed into the page.
            let key = match key.code {
                KeyCode::Esc => Key::Escape,
                KeyCode::Enter => Key::Enter,
                KeyCode::Char(c) => Key::Char(c),
                _ => Key::Other,
            };
            Command::Dispatch(DomEvent::KeyUp(key))
        }
    }

    fn handle_mouse_event(mouse: MouseEvent) -> Option<Command> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Command::Click(mouse.column, mouse.row)),
            MouseEventKind::ScrollUp => Some(Command::Scroll(-WHEEL_ROWS)),
            MouseEventKind::ScrollDown => Some(Command::Scroll(WHEEL_ROWS)),
            _ => None,
        }
    }

    fn handle_commands(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        while let Ok(command) = self.command_rx.try_recv() {
            if command != Command::Tick && command != Command::Render {
                debug!(?command, "Handling command");
            }

            match command {
                Command::Tick => {
                    let now = Instant::now();
                    self.page.tick(now - self.last_tick);
                    self.last_tick = now;
                }
                Command::Render => self.render(tui)?,
                Command::Resize(width, height) => {
                    tui.resize(Rect::new(0, 0, width, height))?;
                    self.page.resize(width, page_rows(height));
                    self.render(tui)?;
                }
                Command::Suspend => self.should_suspend = true,
                Command::Resume => self.should_suspend = false,
                Command::Quit => self.should_quit = true,
                Command::ClearScreen => tui.clear()?,
                Command::OpenModal => self.page.open_modal(),
                Command::NextContent => self.page.next_content(),
                Command::ToggleSize => self.page.toggle_size(),
                Command::OpenContainer => self.page.open_container(),
                Command::Scroll(rows) => self.page.scroll(rows),
                Command::Click(column, row) => {
                    let size = tui.size()?;
                    if row < page_rows(size.height) {
                        self.page.click(column, row);
                    }
                }
                Command::Dispatch(event) => self.page.dispatch(&event),
            }
        }
        Ok(())
    }

    fn render(&self, tui: &mut Tui) -> color_eyre::Result<()> {
        tui.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let [page_area, status_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(PageView::new(&self.page, &self.theme), page_area);
        frame.render_widget(self.status_line(), status_area);
    }

    fn status_line(&self) -> Line<'static> {
        let theme = &self.theme;
        let bindings = &self.config.keybindings;
        let hint = |key: String, label: &str| {
            vec![
                Span::styled(key, Style::default().fg(theme.lavender)),
                Span::styled(format!(" {label}  "), Style::default().fg(theme.subtext0)),
            ]
        };
        let state = |label: &str, open: bool| {
            let color = if open { theme.peach } else { theme.overlay0 };
            Span::styled(
                format!("{label}: {}  ", if open { "open" } else { "closed" }),
                Style::default().fg(color),
            )
        };

        let mut spans = vec![
            state("page", self.page.modal().is_some_and(lazymodal::Modal::is_open)),
            state("box", self.page.container_modal().is_some_and(lazymodal::Modal::is_open)),
        ];
        spans.extend(hint(bindings.open.to_string(), "open"));
        spans.extend(hint(bindings.update.to_string(), "update"));
        spans.extend(hint(bindings.resize.to_string(), "resize"));
        spans.extend(hint(bindings.container.to_string(), "box"));
        spans.extend(hint("Esc".to_string(), "close"));
        spans.extend(hint(bindings.quit.to_string(), "quit"));
        Line::from(spans).style(Style::default().bg(theme.mantle))
    }
}

/// Rows left for the page once the status line is drawn.
const fn page_rows(height: u16) -> u16 {
    height.saturating_sub(1)
}
