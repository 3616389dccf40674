//! Configuration types for diagram rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file. Every field is optional and falls back to the renderer default.
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Layout engine, spacing and edge routing.
//! - [`StyleConfig`] - Colors and fonts.
//!
//! # Example
//!
//! ```
//! # use archgram::config::AppConfig;
//! # use archgram::LayoutEngine;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().engine(), LayoutEngine::Sugiyama);
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use archgram_core::{
    color::Color,
    draw::{ArrowRouting, FrameDefinition, IconDefinition, TextDefinition},
};

use crate::layout::LayoutEngine;

/// Largest accepted `[style] font_size`, in points.
pub const MAX_FONT_SIZE: u16 = 512;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Checks value ranges that TOML parsing alone cannot.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending key.
    pub fn validate(&self) -> Result<(), String> {
        self.layout.validate()?;
        self.style.validate()
    }
}

/// The `[layout]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Ranking algorithm.
    #[serde(default)]
    engine: LayoutEngine,

    /// Gap between neighbouring members of one rank.
    #[serde(default = "default_node_spacing")]
    node_spacing: f32,

    /// Gap between consecutive ranks.
    #[serde(default = "default_rank_spacing")]
    rank_spacing: f32,

    /// How edges are routed between icons.
    #[serde(default)]
    edge_style: ArrowRouting,
}

fn default_node_spacing() -> f32 {
    40.0
}

fn default_rank_spacing() -> f32 {
    90.0
}

impl LayoutConfig {
    pub fn new(engine: LayoutEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    pub fn engine(&self) -> LayoutEngine {
        self.engine
    }

    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    pub fn rank_spacing(&self) -> f32 {
        self.rank_spacing
    }

    pub fn edge_style(&self) -> ArrowRouting {
        self.edge_style
    }

    pub fn with_edge_style(mut self, edge_style: ArrowRouting) -> Self {
        self.edge_style = edge_style;
        self
    }

    /// Spacings must be finite and positive.
    pub fn validate(&self) -> Result<(), String> {
        check_spacing(self.node_spacing, "node_spacing")?;
        check_spacing(self.rank_spacing, "rank_spacing")
    }
}

fn check_spacing(value: f32, key: &str) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("Invalid {key} in config: {value}, expected a positive number"))
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            engine: LayoutEngine::default(),
            node_spacing: default_node_spacing(),
            rank_spacing: default_rank_spacing(),
            edge_style: ArrowRouting::default(),
        }
    }
}

/// The `[style]` section.
///
/// Colors are kept as strings and parsed on access so a bad value is
/// reported with the key it came from.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    background_color: Option<String>,

    #[serde(default)]
    edge_color: Option<String>,

    #[serde(default)]
    font_family: Option<String>,

    #[serde(default)]
    font_size: Option<u16>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid CSS color.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.background_color.as_deref(), "background_color")
    }

    /// Returns the parsed default edge [`Color`], or `None` if none is configured.
    pub fn edge_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.edge_color.as_deref(), "edge_color")
    }

    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    pub fn font_size(&self) -> Option<u16> {
        self.font_size
    }

    /// Colors must parse and the font size must lie in `1..=MAX_FONT_SIZE`.
    pub fn validate(&self) -> Result<(), String> {
        self.background_color()?;
        self.edge_color()?;
        match self.font_size {
            Some(size) if size == 0 || size > MAX_FONT_SIZE => Err(format!(
                "Invalid font_size in config: {size}, expected 1 to {MAX_FONT_SIZE}"
            )),
            _ => Ok(()),
        }
    }

    /// Text styling for node labels, edge labels and the title.
    pub fn text_definition(&self) -> TextDefinition {
        let mut text = TextDefinition::new();
        self.apply_font(&mut text);
        text
    }

    pub fn icon_definition(&self) -> IconDefinition {
        IconDefinition::new(self.text_definition())
    }

    /// Frame styling; cluster labels keep the frame's own font size unless
    /// one is configured.
    pub fn frame_definition(&self) -> FrameDefinition {
        let mut frame = FrameDefinition::default();
        let mut text = frame.text().clone();
        self.apply_font(&mut text);
        frame.set_text(text);
        frame
    }

    fn apply_font(&self, text: &mut TextDefinition) {
        if let Some(family) = self.font_family() {
            text.set_font_family(family);
        }
        if let Some(size) = self.font_size() {
            text.set_font_size(size);
        }
    }
}

fn parse_color(value: Option<&str>, key: &str) -> Result<Option<Color>, String> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {key} in config: {err}"))
}
