use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A CSS length as handed to the layout engine.
///
/// Anything that is not pixels, a percentage or `auto` is carried verbatim in
/// `Raw` and left for the host to interpret.
#[derive(Debug, Clone, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
    Auto,
    Raw(String),
}

impl Length {
    /// Resolve against the containing block dimension.
    ///
    /// Returns `None` for lengths that depend on content (`Auto`, `Raw`).
    #[must_use]
    pub fn resolve(&self, basis: f64) -> Option<f64> {
        match self {
            Self::Px(px) => Some(*px),
            Self::Percent(percent) => Some(basis * percent / 100.0),
            Self::Auto | Self::Raw(_) => None,
        }
    }
}

impl From<f64> for Length {
    fn from(px: f64) -> Self {
        Self::Px(px)
    }
}

impl From<u32> for Length {
    fn from(px: u32) -> Self {
        Self::Px(f64::from(px))
    }
}

impl FromStr for Length {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty length".to_string());
        }
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        if let Some(percent) = s.strip_suffix('%') {
            if let Ok(value) = percent.trim().parse::<f64>() {
                return Ok(Self::Percent(value));
            }
        }
        let px = s.strip_suffix("px").unwrap_or(s);
        Ok(px
            .trim()
            .parse::<f64>()
            .map_or_else(|_| Self::Raw(s.to_string()), Self::Px))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Percent(percent) => write!(f, "{percent}%"),
            Self::Auto => write!(f, "auto"),
            Self::Raw(raw) => write!(f, "{raw}"),
        }
    }
}

impl Serialize for Length {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Px(px) => serializer.serialize_f64(*px),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Length {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LengthVisitor;

        impl Visitor<'_> for LengthVisitor {
            type Value = Length;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number of pixels or a CSS length string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Length, E> {
                Ok(Length::Px(v))
            }

            #[allow(clippy::cast_precision_loss)]
            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Length, E> {
                Ok(Length::Px(v as f64))
            }

            #[allow(clippy::cast_precision_loss)]
            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Length, E> {
                Ok(Length::Px(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Length, E> {
                Length::from_str(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(LengthVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
}

impl Position {
    /// Whether the element establishes a containing block for absolute children.
    #[must_use]
    pub const fn is_positioned(self) -> bool {
        !matches!(self, Self::Static)
    }

    /// Whether the element is taken out of normal flow.
    #[must_use]
    pub const fn is_out_of_flow(self) -> bool {
        matches!(self, Self::Absolute | Self::Fixed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    #[default]
    Block,
    None,
}

/// A partial set of style properties.
///
/// Unset properties leave whatever is already applied untouched when merged,
/// which is how [`super::Dom::css`] behaves.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

impl Style {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub const fn display(mut self, display: Display) -> Self {
        self.display = Some(display);
        self
    }

    #[must_use]
    pub fn top(mut self, top: impl Into<Length>) -> Self {
        self.top = Some(top.into());
        self
    }

    #[must_use]
    pub fn left(mut self, left: impl Into<Length>) -> Self {
        self.left = Some(left.into());
        self
    }

    #[must_use]
    pub fn width(mut self, width: impl Into<Length>) -> Self {
        self.width = Some(width.into());
        self
    }

    #[must_use]
    pub fn max_width(mut self, max_width: impl Into<Length>) -> Self {
        self.max_width = Some(max_width.into());
        self
    }

    #[must_use]
    pub fn height(mut self, height: impl Into<Length>) -> Self {
        self.height = Some(height.into());
        self
    }

    #[must_use]
    pub fn max_height(mut self, max_height: impl Into<Length>) -> Self {
        self.max_height = Some(max_height.into());
        self
    }

    #[must_use]
    pub const fn padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    #[must_use]
    pub const fn border(mut self, border: f64) -> Self {
        self.border = Some(border);
        self
    }

    #[must_use]
    pub const fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    /// Overwrite every property that `other` sets.
    pub fn merge(&mut self, other: &Self) {
        fn pick<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(value) = value {
                *slot = Some(value.clone());
            }
        }

        pick(&mut self.position, &other.position);
        pick(&mut self.display, &other.display);
        pick(&mut self.top, &other.top);
        pick(&mut self.left, &other.left);
        pick(&mut self.width, &other.width);
        pick(&mut self.max_width, &other.max_width);
        pick(&mut self.height, &other.height);
        pick(&mut self.max_height, &other.max_height);
        pick(&mut self.padding, &other.padding);
        pick(&mut self.border, &other.border);
        pick(&mut self.z_index, &other.z_index);
    }

    /// Padding plus border on one side.
    #[must_use]
    pub fn edge(&self) -> f64 {
        self.padding.unwrap_or(0.0) + self.border.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lengths() {
        assert_eq!("640".parse::<Length>(), Ok(Length::Px(640.0)));
        assert_eq!("640px".parse::<Length>(), Ok(Length::Px(640.0)));
        assert_eq!("95%".parse::<Length>(), Ok(Length::Percent(95.0)));
        assert_eq!("AUTO".parse::<Length>(), Ok(Length::Auto));
        assert_eq!("40em".parse::<Length>(), Ok(Length::Raw("40em".to_string())));
        assert!("".parse::<Length>().is_err());
    }

    #[test]
    fn test_negative_lengths_pass_through() {
        assert_eq!("-10".parse::<Length>(), Ok(Length::Px(-10.0)));
        assert_eq!(Length::Px(-10.0).resolve(100.0), Some(-10.0));
    }

    #[test]
    fn test_resolve_percent_against_basis() {
        assert_eq!(Length::Percent(50.0).resolve(800.0), Some(400.0));
        assert_eq!(Length::Auto.resolve(800.0), None);
    }

    #[test]
    fn test_deserialize_number_or_string() {
        #[derive(Deserialize)]
        struct Sizes {
            a: Length,
            b: Length,
            c: Length,
        }

        let sizes: Sizes = toml::from_str("a = 640\nb = \"95%\"\nc = 12.5").unwrap();
        assert_eq!(sizes.a, Length::Px(640.0));
        assert_eq!(sizes.b, Length::Percent(95.0));
        assert_eq!(sizes.c, Length::Px(12.5));
    }

    #[test]
    fn test_merge_only_overrides_set_properties() {
        let mut style = Style::new().width(640u32).position(Position::Absolute);
        style.merge(&Style::new().top(10.0).width(Length::Auto));

        assert_eq!(style.width, Some(Length::Auto));
        assert_eq!(style.position, Some(Position::Absolute));
        assert_eq!(style.top, Some(Length::Px(10.0)));
    }
}
