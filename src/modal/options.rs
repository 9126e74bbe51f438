use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::Modal;
use crate::dom::Length;

/// Configuration snapshot for one modal.
///
/// Deserializes from the `[modal]` style tables of the config file. Keys are
/// snake_case; the camelCase spellings (`maxWidth`, `maxHeight`) are accepted
/// as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalOptions {
    /// Position against the viewport instead of the scrolled page.
    pub fixed: bool,
    /// Create a dimming backdrop.
    pub overlay: bool,
    /// Clicking the backdrop dismisses the modal.
    pub blur: bool,
    /// The escape key dismisses the modal. Only page-level modals listen for keys.
    pub escape: bool,
    pub width: Length,
    #[serde(alias = "maxWidth")]
    pub max_width: Length,
    pub height: Length,
    #[serde(alias = "maxHeight")]
    pub max_height: Length,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            fixed: false,
            overlay: true,
            blur: true,
            escape: true,
            width: Length::Px(640.0),
            max_width: Length::Percent(95.0),
            height: Length::Px(480.0),
            max_height: Length::Percent(95.0),
        }
    }
}

/// Lifecycle callback. Receives the controller it was registered on.
pub type Hook = Rc<dyn Fn(&Modal)>;

/// Optional callbacks run after the matching lifecycle step.
#[derive(Clone, Default)]
pub struct ModalHooks {
    pub on_open: Option<Hook>,
    pub on_hide: Option<Hook>,
    pub on_update: Option<Hook>,
}

impl ModalHooks {
    #[must_use]
    pub fn on_open(mut self, hook: impl Fn(&Modal) + 'static) -> Self {
        self.on_open = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_hide(mut self, hook: impl Fn(&Modal) + 'static) -> Self {
        self.on_hide = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_update(mut self, hook: impl Fn(&Modal) + 'static) -> Self {
        self.on_update = Some(Rc::new(hook));
        self
    }
}

impl fmt::Debug for ModalHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalHooks")
            .field("on_open", &self.on_open.is_some())
            .field("on_hide", &self.on_hide.is_some())
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ModalOptions::default();
        assert!(!options.fixed);
        assert!(options.overlay);
        assert!(options.blur);
        assert!(options.escape);
        assert_eq!(options.width, Length::Px(640.0));
        assert_eq!(options.max_width, Length::Percent(95.0));
        assert_eq!(options.height, Length::Px(480.0));
        assert_eq!(options.max_height, Length::Percent(95.0));
    }

    #[test]
    fn test_partial_table_overrides_field_by_field() {
        let options: ModalOptions = toml::from_str(
            r#"
            fixed = true
            blur = false
            width = "50%"
            maxHeight = 300
            "#,
        )
        .unwrap();

        assert!(options.fixed);
        assert!(!options.blur);
        assert!(options.overlay);
        assert_eq!(options.width, Length::Percent(50.0));
        assert_eq!(options.max_height, Length::Px(300.0));
        assert_eq!(options.height, Length::Px(480.0));
    }

    #[test]
    fn test_hooks_debug_shows_presence() {
        let hooks = ModalHooks::default().on_open(|_| {});
        let debug = format!("{hooks:?}");
        assert!(debug.contains("on_open: true"));
        assert!(debug.contains("on_hide: false"));
    }
}
