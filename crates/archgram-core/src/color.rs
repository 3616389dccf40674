//! Color handling for Archgram diagrams.
//!
//! [`Color`] wraps `DynamicColor` from the `color` crate so any CSS color
//! string (`"#ff9900"`, `"rgb(0, 0, 0)"`, `"steelblue"`) can be used for
//! icons, cluster fills and edges.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};

/// A parsed CSS color.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Parses a CSS color string.
    ///
    /// # Examples
    ///
    /// ```
    /// use archgram_core::color::Color;
    ///
    /// let aws_orange = Color::new("#ff9900").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// # let _ = aws_orange;
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))
    }

    /// Returns a string usable inside an SVG `id` attribute.
    ///
    /// Arrow markers are defined once per color and referenced by id, so the
    /// color must be turned into `[A-Za-z0-9_]` characters starting with a letter.
    pub fn to_id_safe_string(self) -> String {
        let sanitized: String = self
            .to_string()
            .replace('#', "hex")
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();

        if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
            format!("c_{sanitized}")
        } else {
            sanitized
        }
    }

    /// Returns a copy of this color with the given alpha in `0.0..=1.0`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns `#rrggbb`, or `#rrggbbaa` for translucent colors.
    ///
    /// Graphviz only understands hexadecimal and X11 color names, not the
    /// CSS notations [`Display`](fmt::Display) may produce.
    pub fn to_hex_string(self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        if rgba.a == u8::MAX {
            format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
        }
    }

    /// Returns the alpha component.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self {
            color: DynamicColor::from_alpha_color(::color::palette::css::BLACK),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_and_invalid() {
        assert!(Color::new("#ff9900").is_ok());
        assert!(Color::new("rgb(140, 79, 255)").is_ok());
        assert!(Color::new("steelblue").is_ok());
        assert!(Color::new("orange-ish").is_err());
    }

    #[test]
    fn test_default_is_black() {
        assert_eq!(Color::default().to_hex_string(), "#000000");
    }

    #[test]
    fn test_hex_string() {
        assert_eq!(Color::new("#ff9900").unwrap().to_hex_string(), "#ff9900");
        assert_eq!(Color::new("red").unwrap().to_hex_string(), "#ff0000");
        assert_eq!(
            Color::new("red").unwrap().with_alpha(0.0).to_hex_string(),
            "#ff000000"
        );
    }

    #[test]
    fn test_with_alpha() {
        let color = Color::new("#8c4fff").unwrap().with_alpha(0.25);
        assert!((color.alpha() - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_id_safe_string() {
        let id = Color::new("#ed7100").unwrap().to_id_safe_string();
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        assert!(id.starts_with(|c: char| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_from_str_matches_new() {
        let parsed: Color = "navy".parse().unwrap();
        assert_eq!(parsed, Color::new("navy").unwrap());
    }

    #[test]
    fn test_hash_follows_eq() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(Color::new("red").unwrap());
        assert!(set.contains(&Color::new("red").unwrap()));
        assert!(!set.contains(&Color::new("blue").unwrap()));
    }
}
