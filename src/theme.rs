use catppuccin::PALETTE;
use ratatui::style::Color;

/// Convert a catppuccin color to a ratatui color.
const fn catppuccin_to_color(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Colors used to paint the page and its modals.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub base: Color,
    pub mantle: Color,
    pub crust: Color,
    pub surface0: Color,
    pub surface1: Color,
    pub overlay0: Color,
    pub text: Color,
    pub subtext0: Color,
    pub red: Color,
    pub peach: Color,
    pub mauve: Color,
    pub blue: Color,
    pub lavender: Color,
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: catppuccin_to_color(&c.base),
            mantle: catppuccin_to_color(&c.mantle),
            crust: catppuccin_to_color(&c.crust),
            surface0: catppuccin_to_color(&c.surface0),
            surface1: catppuccin_to_color(&c.surface1),
            overlay0: catppuccin_to_color(&c.overlay0),
            text: catppuccin_to_color(&c.text),
            subtext0: catppuccin_to_color(&c.subtext0),
            red: catppuccin_to_color(&c.red),
            peach: catppuccin_to_color(&c.peach),
            mauve: catppuccin_to_color(&c.mauve),
            blue: catppuccin_to_color(&c.blue),
            lavender: catppuccin_to_color(&c.lavender),
        }
    }

    #[must_use]
    pub fn catppuccin_mocha() -> Self {
        Self::from_catppuccin(&PALETTE.mocha)
    }

    #[must_use]
    pub fn catppuccin_macchiato() -> Self {
        Self::from_catppuccin(&PALETTE.macchiato)
    }

    #[must_use]
    pub fn catppuccin_frappe() -> Self {
        Self::from_catppuccin(&PALETTE.frappe)
    }

    #[must_use]
    pub fn catppuccin_latte() -> Self {
        Self::from_catppuccin(&PALETTE.latte)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

/// Look up a theme by name. Returns the default theme if not found.
///
/// Accepts the full name (`"Catppuccin Latte"`) or just the flavor (`"latte"`).
pub fn theme_from_name(name: &str) -> Theme {
    let flavor = name.trim().to_lowercase();
    let flavor = flavor.strip_prefix("catppuccin").unwrap_or(&flavor).trim();
    match flavor {
        "mocha" => Theme::catppuccin_mocha(),
        "macchiato" => Theme::catppuccin_macchiato(),
        "frappe" | "frappé" => Theme::catppuccin_frappe(),
        "latte" => Theme::catppuccin_latte(),
        _ => {
            tracing::warn!(name, "Unknown theme, using default");
            Theme::default()
        }
    }
}

/// Mix `over` onto `under`. `amount` 0 keeps `under`, 1 gives `over`.
///
/// Only RGB colors blend; anything else switches at the halfway point.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn blend(under: Color, over: Color, amount: f64) -> Color {
    let amount = amount.clamp(0.0, 1.0);
    match (under, over) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| (f64::from(b) - f64::from(a)).mul_add(amount, f64::from(a)).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if amount >= 0.5 => over,
        _ => under,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_lookup() {
        let latte = Theme::catppuccin_latte();
        let found = theme_from_name("Catppuccin Latte");
        assert_eq!(found.base, latte.base);
        assert_eq!(theme_from_name("latte").base, latte.base);
        assert_eq!(theme_from_name("unknown").base, Theme::default().base);
    }

    #[test]
    fn test_blend() {
        let black = Color::Rgb(0, 0, 0);
        let white = Color::Rgb(255, 255, 255);
        assert_eq!(blend(black, white, 0.0), black);
        assert_eq!(blend(black, white, 1.0), white);
        assert_eq!(blend(black, white, 0.5), Color::Rgb(128, 128, 128));
        assert_eq!(blend(Color::Reset, Color::Red, 0.2), Color::Reset);
    }
}
