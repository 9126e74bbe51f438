pub mod key;
pub mod keybindings;
pub mod loader;

use keybindings::KeybindingsConfig;
use lazymodal::ModalOptions;
use lazymodal::dom::Length;
pub use loader::load;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

/// How the page maps onto the terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Page pixels per terminal column.
    pub cell_width: f64,
    /// Page pixels per terminal row.
    pub cell_height: f64,
    pub fade_ms: u64,
    pub frame_rate: f64,
    pub tick_rate: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            cell_height: 16.0,
            fade_ms: 400,
            frame_rate: 30.0,
            tick_rate: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Options for the page-level modal.
    #[serde(default)]
    pub modal: ModalOptions,
    /// Options for the modal bound to the boxed container.
    #[serde(default = "default_container")]
    pub container: ModalOptions,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            modal: ModalOptions::default(),
            container: default_container(),
            display: DisplayConfig::default(),
            theme: ThemeConfig::default(),
            keybindings: KeybindingsConfig::default(),
        }
    }
}

fn default_container() -> ModalOptions {
    ModalOptions {
        width: Length::Px(320.0),
        height: Length::Px(160.0),
        ..ModalOptions::default()
    }
}
