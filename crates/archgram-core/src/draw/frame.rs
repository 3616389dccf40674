//! Cluster frames.
//!
//! A [`Frame`] is the rounded boundary drawn around the members of a cluster,
//! with the cluster label in a band along its top-left edge. Nested frames
//! cycle through a small palette of pale fills so neighbouring levels stay
//! distinguishable.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text, TextDefinition},
    geometry::{Insets, Point, Size},
};

/// Fills used for clusters at depth 0, 1, 2 and 3, then repeating.
const DEPTH_FILLS: [&str; 4] = ["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"];

/// Shared styling of every cluster frame in a diagram.
#[derive(Debug, Clone)]
pub struct FrameDefinition {
    border: StrokeDefinition,
    text: TextDefinition,
    padding: Insets,
    label_padding: f32,
    corner_radius: f32,
}

impl FrameDefinition {
    pub fn new(text: TextDefinition) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
    }

    pub fn text(&self) -> &TextDefinition {
        &self.text
    }

    pub fn set_text(&mut self, text: TextDefinition) {
        self.text = text;
    }

    /// Height of the band holding the cluster label.
    pub fn label_band_height(&self, label: &str) -> f32 {
        Text::new(&self.text, label).size().height() + 2.0 * self.label_padding
    }

    /// Space between the frame border and its content, label band included.
    pub fn content_insets(&self, label: &str) -> Insets {
        self.padding
            .with_top(self.padding.top() + self.label_band_height(label))
    }

    /// Outer size of a frame around `content` that still fits its label.
    pub fn frame_size(&self, label: &str, content: Size) -> Size {
        let label_width =
            Text::new(&self.text, label).size().width() + 2.0 * self.label_padding;
        content
            .add_padding(self.content_insets(label))
            .max(Size::new(label_width, 0.0))
    }
}

impl Default for FrameDefinition {
    fn default() -> Self {
        let mut text = TextDefinition::default();
        text.set_font_size(12);

        let border = match Color::new("#AEB6BE") {
            Ok(color) => StrokeDefinition::solid(color, 1.0),
            Err(_) => StrokeDefinition::default(),
        };

        Self {
            border,
            text,
            padding: Insets::uniform(16.0),
            label_padding: 6.0,
            corner_radius: 6.0,
        }
    }
}

/// A cluster frame of a fixed size.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    definition: &'a FrameDefinition,
    label: &'a str,
    size: Size,
    depth: usize,
}

impl<'a> Frame<'a> {
    /// Creates a frame; `depth` is the cluster's nesting level, 0 at the root.
    pub fn new(definition: &'a FrameDefinition, label: &'a str, size: Size, depth: usize) -> Self {
        Self {
            definition,
            label,
            size,
            depth,
        }
    }

    fn fill(&self) -> &'static str {
        DEPTH_FILLS[self.depth % DEPTH_FILLS.len()]
    }
}

impl Drawable for Frame<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let bounds = position.to_bounds(self.size);

        let frame = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", self.definition.corner_radius)
            .set("fill", self.fill());
        let frame = apply_stroke!(frame, &self.definition.border);
        output.add_to_layer(RenderLayer::Cluster, Box::new(frame));

        let label = Text::new(&self.definition.text, self.label);
        let label_size = label.size();
        let label_padding = self.definition.label_padding;
        let label_center = Point::new(
            bounds.min_x() + label_padding + label_size.width() / 2.0,
            bounds.min_y() + label_padding + label_size.height() / 2.0,
        );
        output.merge(label.render_to_layers(label_center));

        output
    }

    fn size(&self) -> Size {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_content_insets_reserve_label_band() {
        let definition = FrameDefinition::default();
        let insets = definition.content_insets("Public Subnet");

        assert_approx_eq!(
            f32,
            insets.top(),
            16.0 + definition.label_band_height("Public Subnet"),
            epsilon = 0.001
        );
        assert_approx_eq!(f32, insets.left(), 16.0);
        assert!(insets.top() > insets.bottom());
    }

    #[test]
    fn test_frame_size_fits_long_label() {
        let definition = FrameDefinition::default();
        let label = "Security Group: SGBastion";
        let size = definition.frame_size(label, Size::new(1.0, 1.0));
        let label_width = Text::new(definition.text(), label).size().width();

        assert!(size.width() >= label_width);
        assert!(size.height() > definition.label_band_height(label));
    }

    #[test]
    fn test_fill_cycles_with_depth() {
        let definition = FrameDefinition::default();
        let size = Size::new(100.0, 100.0);

        assert_eq!(Frame::new(&definition, "AWS VPC", size, 0).fill(), "#E5F5FD");
        assert_eq!(Frame::new(&definition, "Subnet", size, 1).fill(), "#EBF3E7");
        assert_eq!(Frame::new(&definition, "Deep", size, 4).fill(), "#E5F5FD");
    }

    #[test]
    fn test_render_places_frame_on_cluster_layer() {
        let definition = FrameDefinition::default();
        let frame = Frame::new(&definition, "Private Subnet", Size::new(200.0, 120.0), 1);

        let rendered: Vec<String> = frame
            .render_to_layers(Point::new(100.0, 60.0))
            .render()
            .into_iter()
            .map(|node| node.to_string())
            .collect();

        assert_eq!(rendered.len(), 2);
        assert!(rendered[0].contains("data-layer=\"cluster\""));
        assert!(rendered[0].contains("width=\"200\""));
        assert!(rendered[1].contains("Private Subnet"));
    }
}
