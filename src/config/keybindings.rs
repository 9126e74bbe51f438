use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

/// Demo key map. Keys left out of the config file keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub quit: KeyBinding,
    pub suspend: KeyBinding,
    /// Open the page-level modal.
    pub open: KeyBinding,
    /// Swap in the next sample content.
    pub update: KeyBinding,
    /// Toggle between the configured and the compact modal size.
    pub resize: KeyBinding,
    /// Open the modal bound to the boxed container.
    pub container: KeyBinding,
    pub scroll_up: KeyBinding,
    pub scroll_down: KeyBinding,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            quit: Key::new(KeyCode::Char('q')).into(),
            suspend: Key::with_ctrl(KeyCode::Char('z')).into(),
            open: Key::new(KeyCode::Char('o')).into(),
            update: Key::new(KeyCode::Char('u')).into(),
            resize: Key::new(KeyCode::Char('r')).into(),
            container: Key::new(KeyCode::Char('c')).into(),
            scroll_up: vec![Key::new(KeyCode::Char('k')), Key::new(KeyCode::Up)].into(),
            scroll_down: vec![Key::new(KeyCode::Char('j')), Key::new(KeyCode::Down)].into(),
        }
    }
}
