//! Node icons.
//!
//! An [`Icon`] is a square glyph tinted by the icon's provider and category,
//! with the node label centered below it. Users are drawn as a pair of
//! figures; every other kind gets a rounded tile carrying its short name.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text, TextDefinition},
    geometry::{Bounds, Point, Size},
    topology::{NodeKind, Provider},
};

/// Shared styling of every node icon in a diagram.
#[derive(Debug, Clone)]
pub struct IconDefinition {
    box_size: f32,
    label_gap: f32,
    text: TextDefinition,
    border: StrokeDefinition,
}

impl IconDefinition {
    pub fn new(text: TextDefinition) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    /// Side length of the square glyph.
    pub fn box_size(&self) -> f32 {
        self.box_size
    }

    pub fn set_box_size(&mut self, size: f32) {
        self.box_size = size;
    }

    pub fn text(&self) -> &TextDefinition {
        &self.text
    }
}

impl Default for IconDefinition {
    fn default() -> Self {
        Self {
            box_size: 64.0,
            label_gap: 6.0,
            text: TextDefinition::default(),
            border: StrokeDefinition::new(Color::default().with_alpha(0.15), 1.0),
        }
    }
}

/// A node icon with its label.
#[derive(Debug, Clone)]
pub struct Icon<'a> {
    definition: &'a IconDefinition,
    kind: NodeKind,
    label: &'a str,
}

impl<'a> Icon<'a> {
    pub fn new(definition: &'a IconDefinition, kind: NodeKind, label: &'a str) -> Self {
        Self {
            definition,
            kind,
            label,
        }
    }

    /// Bounds of the glyph alone when the whole icon is centered at `position`.
    ///
    /// Edges attach to these bounds so arrows stop at the glyph and never
    /// cross the label.
    pub fn glyph_bounds(&self, position: Point) -> Bounds {
        let box_size = self.definition.box_size;
        let top = position.y() - self.size().height() / 2.0;
        Bounds::new_from_top_left(
            Point::new(position.x() - box_size / 2.0, top),
            Size::new(box_size, box_size),
        )
    }

    fn label_text(&self) -> Text<'_> {
        Text::new(&self.definition.text, self.label)
    }

    fn render_tile(&self, bounds: Bounds) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let corner = bounds.width() * 0.12;

        let tile = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", corner)
            .set("fill", fill_color(self.kind));
        let tile = apply_stroke!(tile, &self.definition.border);
        output.add_to_layer(RenderLayer::Content, Box::new(tile));

        let center = bounds.center();
        let badge = svg_element::Text::new(badge(self.kind))
            .set("x", center.x())
            .set("y", center.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.definition.text.font_family())
            .set("font-size", (bounds.width() * 0.25).round())
            .set("font-weight", "bold")
            .set("fill", "white");
        output.add_to_layer(RenderLayer::Content, Box::new(badge));
        output
    }

    fn render_users(&self, bounds: Bounds) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let unit = bounds.width() / 8.0;
        let fill = fill_color(self.kind);

        // Back figure sits up and to the right of the front one
        for (dx, dy) in [(1.2 * unit, -0.8 * unit), (-0.6 * unit, 0.4 * unit)] {
            let head = Point::new(bounds.center().x() + dx, bounds.min_y() + 2.6 * unit + dy);
            let shoulders_y = head.y() + 1.6 * unit;

            let circle = svg_element::Circle::new()
                .set("cx", head.x())
                .set("cy", head.y())
                .set("r", 1.3 * unit)
                .set("fill", fill)
                .set("stroke", "white")
                .set("stroke-width", 1.0);

            let body = svg_element::Path::new()
                .set(
                    "d",
                    format!(
                        "M {} {} A {} {} 0 0 1 {} {} Z",
                        head.x() - 2.4 * unit,
                        shoulders_y + 2.8 * unit,
                        2.4 * unit,
                        2.8 * unit,
                        head.x() + 2.4 * unit,
                        shoulders_y + 2.8 * unit,
                    ),
                )
                .set("fill", fill)
                .set("stroke", "white")
                .set("stroke-width", 1.0);

            output.add_to_layer(RenderLayer::Content, Box::new(body));
            output.add_to_layer(RenderLayer::Content, Box::new(circle));
        }
        output
    }
}

impl Drawable for Icon<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let glyph = self.glyph_bounds(position);
        let mut output = match self.kind {
            NodeKind::Users => self.render_users(glyph),
            _ => self.render_tile(glyph),
        };

        let label = self.label_text();
        let label_center = Point::new(
            position.x(),
            glyph.max_y() + self.definition.label_gap + label.size().height() / 2.0,
        );
        output.merge(label.render_to_layers(label_center));
        output
    }

    fn size(&self) -> Size {
        let box_size = self.definition.box_size;
        let label_size = self.label_text().size();
        Size::new(box_size, box_size + self.definition.label_gap).merge_vertical(label_size)
    }
}

/// Fill of the glyph, following the AWS architecture icon palette.
fn fill_color(kind: NodeKind) -> &'static str {
    match (kind.provider(), kind.category()) {
        (Provider::Aws, "compute") => "#ED7100",
        (Provider::Aws, "database") => "#3B48CC",
        (Provider::Aws, _) => "#8C4FFF",
        (Provider::Generic, _) => "#5A6B86",
        (Provider::OnPrem, _) => "#2D3436",
        (Provider::Saas, _) => "#4A154B",
    }
}

fn badge(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Users => "",
        NodeKind::Firewall => "FW",
        NodeKind::Vpc => "VPC",
        NodeKind::InternetGateway => "IGW",
        NodeKind::NatGateway => "NAT",
        NodeKind::LoadBalancer => "ELB",
        NodeKind::Kubernetes => "EKS",
        NodeKind::Database => "RDS",
        NodeKind::Chat => "CHAT",
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_size_stacks_glyph_and_label() {
        let definition = IconDefinition::default();
        let icon = Icon::new(&definition, NodeKind::Database, "RDS Database");
        let label = Text::new(definition.text(), "RDS Database").size();

        let size = icon.size();
        assert_approx_eq!(f32, size.height(), 64.0 + 6.0 + label.height(), epsilon = 0.001);
        assert!(size.width() >= 64.0);
        assert!(size.width() >= label.width());
    }

    #[test]
    fn test_glyph_bounds_at_top_of_icon() {
        let definition = IconDefinition::default();
        let icon = Icon::new(&definition, NodeKind::Kubernetes, "Kubernetes Cluster");
        let position = Point::new(100.0, 100.0);

        let glyph = icon.glyph_bounds(position);
        let whole = position.to_bounds(icon.size());

        assert_approx_eq!(f32, glyph.width(), 64.0);
        assert_approx_eq!(f32, glyph.min_y(), whole.min_y(), epsilon = 0.001);
        assert_approx_eq!(f32, glyph.center().x(), 100.0);
    }

    #[test]
    fn test_tile_carries_badge_and_label() {
        let definition = IconDefinition::default();
        let icon = Icon::new(&definition, NodeKind::NatGateway, "NAT Gateway");

        let svg: String = icon
            .render_to_layers(Point::new(50.0, 50.0))
            .render()
            .into_iter()
            .map(|node| node.to_string())
            .collect();

        assert!(svg.contains("NAT Gateway"));
        assert_eq!(svg.matches("NAT").count(), 2);
        assert!(svg.contains("#8C4FFF"));
    }

    #[test]
    fn test_users_drawn_as_figures() {
        let definition = IconDefinition::default();
        let icon = Icon::new(&definition, NodeKind::Users, "End Users");

        let svg: String = icon
            .render_to_layers(Point::default())
            .render()
            .into_iter()
            .map(|node| node.to_string())
            .collect();

        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn test_fill_color_by_category() {
        assert_eq!(fill_color(NodeKind::Kubernetes), "#ED7100");
        assert_eq!(fill_color(NodeKind::Database), "#3B48CC");
        assert_eq!(fill_color(NodeKind::LoadBalancer), "#8C4FFF");
        assert_eq!(fill_color(NodeKind::Firewall), "#5A6B86");
        assert_eq!(fill_color(NodeKind::Chat), "#4A154B");
    }
}
