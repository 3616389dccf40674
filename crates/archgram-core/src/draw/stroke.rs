//! Stroke and line-style definitions.
//!
//! - [`StrokeDefinition`]: color, width and dash style of a line
//! - [`StrokeStyle`]: line patterns (solid, dashed, dotted)
//! - [`apply_stroke!`](crate::apply_stroke!): applies stroke attributes to SVG elements
//!
//! ```
//! use archgram_core::color::Color;
//! use archgram_core::draw::StrokeDefinition;
//! use svg::node::element as svg_element;
//!
//! let stroke = StrokeDefinition::dashed(Color::new("#7b8894").unwrap(), 1.5);
//! let rect = svg_element::Rectangle::new().set("x", 0).set("y", 0);
//! let rect = archgram_core::apply_stroke!(rect, &stroke);
//! ```

use std::str::FromStr;

use crate::color::Color;

/// Visual pattern of a stroke.
///
/// | Variant | `stroke-dasharray` |
/// |---------|--------------------|
/// | `Solid` | not set |
/// | `Dashed` | `"6,4"` |
/// | `Dotted` | `"2,3"` |
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            _ => Err(format!(
                "invalid stroke style `{s}`, valid values: solid, dashed, dotted"
            )),
        }
    }
}

impl StrokeStyle {
    /// Returns the SVG dasharray value for this style, or `None` for solid lines.
    pub fn to_svg_value(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("6,4"),
            Self::Dotted => Some("2,3"),
        }
    }
}

/// Complete stroke definition for lines and borders.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a solid stroke.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    pub fn solid(color: Color, width: f32) -> Self {
        Self::new(color, width)
    }

    pub fn dashed(color: Color, width: f32) -> Self {
        Self::new(color, width).with_style(StrokeStyle::Dashed)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Returns a copy with a different color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Returns a copy with a different width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Returns a copy with a different dash style.
    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Applies every stroke attribute of a [`StrokeDefinition`] to an SVG element.
///
/// Sets `stroke`, `stroke-opacity`, `stroke-width` and, for patterned
/// styles, `stroke-dasharray`.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}
