//! Text rendering and measurement.
//!
//! Labels are measured with `cosmic-text` so node, cluster and edge labels
//! get real widths instead of per-character guesses. The font system is
//! loaded once and shared behind a [`OnceLock`].
//!
//! ```
//! # use archgram_core::draw::{Drawable, Text, TextDefinition};
//! let definition = TextDefinition::new();
//! let label = Text::new(&definition, "Internet Gateway");
//! assert!(label.size().height() > 0.0);
//! ```

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;
use svg::{node::Text as SvgText, node::element as svg_element};

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::{Insets, Point, Size},
};

/// Styling of a piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    color: Option<Color>,
    background_color: Option<Color>,
    padding: Insets,
}

impl TextDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    /// Sets a backdrop drawn behind the text, used for edge labels.
    pub fn set_background_color(&mut self, color: Option<Color>) {
        self.background_color = color;
    }

    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 13,
            color: None,
            background_color: None,
            padding: Insets::default(),
        }
    }
}

/// A text element that can be measured and rendered.
///
/// Multi-line content is split on `\n` and rendered as one `<tspan>` per line,
/// centered on the drawing position.
#[derive(Debug, Clone)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
}

impl<'a> Text<'a> {
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
        }
    }

    pub fn content(&self) -> &str {
        self.content
    }

    fn size_without_padding(&self) -> Size {
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .calculate_text_size(self.content, self.definition)
    }
}

impl Drawable for Text<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let lines: Vec<&str> = self.content.lines().collect();
        if lines.is_empty() {
            return output;
        }

        let content_size = self.size_without_padding();
        let line_height = content_size.height() / lines.len() as f32;
        let y_offset = -(content_size.height() + line_height) / 2.0;

        let mut rendered_text = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y() + y_offset)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.definition.font_family())
            .set("font-size", self.definition.font_size());

        if let Some(color) = self.definition.color() {
            rendered_text = rendered_text
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha());
        }

        for line in lines {
            let tspan = svg_element::TSpan::new("")
                .set("x", position.x())
                .set("dy", line_height)
                .add(SvgText::new(line));
            rendered_text = rendered_text.add(tspan);
        }

        if let Some(bg_color) = self.definition.background_color() {
            let bounds = position.to_bounds(self.size());
            let min_point = bounds.min_point();

            let backdrop = svg_element::Rectangle::new()
                .set("x", min_point.x())
                .set("y", min_point.y())
                .set("width", bounds.width())
                .set("height", bounds.height())
                .set("fill", bg_color.to_string())
                .set("fill-opacity", bg_color.alpha())
                .set("rx", 3.0);

            output.add_to_layer(RenderLayer::Text, Box::new(backdrop));
        }

        output.add_to_layer(RenderLayer::Text, Box::new(rendered_text));
        output
    }

    fn size(&self) -> Size {
        self.size_without_padding()
            .add_padding(self.definition.padding())
    }
}

struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Measures `text` with real font metrics and shaping.
    ///
    /// Falls back to an estimate when no glyphs could be laid out, which
    /// happens on hosts without any installed fonts.
    fn calculate_text_size(&self, text: &str, text_def: &TextDefinition) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Points to pixels at standard DPI
        let font_size_px = text_def.font_size() as f32 * 1.33;
        let line_height = font_size_px * 1.15;
        let metrics = Metrics::new(font_size_px, line_height);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(text_def.font_family()));
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
        }

        let line_count = text.lines().count().max(1) as f32;
        if max_width <= 0.0 {
            let longest = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
            max_width = longest as f32 * font_size_px * 0.55;
        }
        if total_height <= 0.0 {
            total_height = line_count * metrics.line_height;
        }

        Size::new(max_width, total_height)
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();
