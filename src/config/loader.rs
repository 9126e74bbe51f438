use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "lazymodal";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Load the config from `path`, or from the default location when `None`.
///
/// A missing file yields the defaults. A file that exists but does not parse
/// is an error.
pub fn load(path: Option<&Path>) -> color_eyre::Result<AppConfig> {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_path) else {
        debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        debug!(?path, "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(&path)?;
    let config = parse(&content).wrap_err_with(|| format!("Invalid config at {}", path.display()))?;
    debug!(?path, "Loaded config");
    Ok(config)
}

pub fn parse(content: &str) -> color_eyre::Result<AppConfig> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use lazymodal::dom::Length;

    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = parse("").unwrap();
        assert!(config.modal.overlay);
        assert_eq!(config.modal.width, Length::Px(640.0));
        assert_eq!(config.theme.name, "Catppuccin Mocha");
    }

    #[test]
    fn test_partial_config() {
        let config = parse(
            r#"
            [modal]
            fixed = true
            maxWidth = "80%"

            [container]
            escape = false
            width = 200

            [display]
            fade_ms = 150

            [keybindings]
            open = "enter"
            "#,
        )
        .unwrap();

        assert!(config.modal.fixed);
        assert_eq!(config.modal.max_width, Length::Percent(80.0));
        assert!(!config.container.escape);
        assert_eq!(config.container.width, Length::Px(200.0));
        assert_eq!(config.display.fade_ms, 150);
        assert!((config.display.cell_width - 8.0).abs() < f64::EPSILON);
        assert!(config.keybindings.open.matches(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(config.keybindings.quit.matches(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(parse("[modal]\nfixed = \"sometimes\"").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load(Some(Path::new("/nonexistent/lazymodal/config.toml"))).unwrap();
        assert!((config.display.frame_rate - 30.0).abs() < f64::EPSILON);
    }
}
