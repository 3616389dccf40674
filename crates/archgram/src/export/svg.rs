//! SVG export.
//!
//! The SVG backend draws a [`DiagramLayout`] entirely in memory: cluster
//! frames from the outermost inwards, then edges with their arrow markers,
//! node icons, labels and finally the diagram title. Z-order is handled by
//! [`LayeredOutput`], so elements can be emitted in any order.

use log::{debug, info};
use svg::{Document, node::element as svg_element};

use archgram_core::{
    color::Color,
    draw::{
        Arrow, ArrowDrawer, Drawable, Frame, FrameDefinition, Icon, IconDefinition, LayeredOutput,
        RenderLayer, StrokeDefinition, Text, TextDefinition,
    },
    geometry::Insets,
};

use crate::{
    config::StyleConfig,
    export::{self, Exporter},
    layout::DiagramLayout,
};

const DEFAULT_BACKGROUND: &str = "white";
const DEFAULT_EDGE_COLOR: &str = "#545B64";
const EDGE_WIDTH: f32 = 1.2;

/// Builder for [`Svg`] exporters.
#[derive(Debug, Default)]
pub struct SvgBuilder<'a> {
    style: Option<&'a StyleConfig>,
}

impl<'a> SvgBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: &'a StyleConfig) -> Self {
        self.style = Some(style);
        self
    }

    /// Resolves colors and fonts into an exporter.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if a configured color is invalid.
    pub fn build(self) -> Result<Svg, export::Error> {
        let default_style = StyleConfig::default();
        let style = self.style.unwrap_or(&default_style);
        style.validate().map_err(export::Error::Render)?;

        let background_color = match style.background_color().map_err(export::Error::Render)? {
            Some(color) => color,
            None => Color::new(DEFAULT_BACKGROUND).map_err(export::Error::Render)?,
        };
        let edge_color = match style.edge_color().map_err(export::Error::Render)? {
            Some(color) => color,
            None => Color::new(DEFAULT_EDGE_COLOR).map_err(export::Error::Render)?,
        };

        let mut edge_label = style.text_definition();
        edge_label.set_font_size(edge_label.font_size().saturating_sub(2).max(1));
        edge_label.set_background_color(Some(background_color));
        edge_label.set_padding(Insets::new(1.0, 3.0, 1.0, 3.0));

        let mut title = style.text_definition();
        title.set_font_size(title.font_size().saturating_add(5));

        Ok(Svg {
            icon: style.icon_definition(),
            frame: style.frame_definition(),
            edge_label,
            title,
            background_color,
            edge_color,
            arrow_drawer: ArrowDrawer::new(),
        })
    }
}

/// In-memory SVG exporter.
#[derive(Debug)]
pub struct Svg {
    icon: IconDefinition,
    frame: FrameDefinition,
    edge_label: TextDefinition,
    title: TextDefinition,
    background_color: Color,
    edge_color: Color,
    arrow_drawer: ArrowDrawer,
}

impl Svg {
    /// Styling of node icons, shared with placement.
    pub fn icon_definition(&self) -> &IconDefinition {
        &self.icon
    }

    /// Styling of cluster frames, shared with placement.
    pub fn frame_definition(&self) -> &FrameDefinition {
        &self.frame
    }

    /// Styling of the diagram title, shared with placement.
    pub fn title_definition(&self) -> &TextDefinition {
        &self.title
    }

    /// Renders `layout` to an SVG document.
    pub fn render_layout(&mut self, layout: &DiagramLayout) -> Document {
        let canvas = layout.bounds();
        let mut output = LayeredOutput::new();

        let background = svg_element::Rectangle::new()
            .set("x", canvas.min_x())
            .set("y", canvas.min_y())
            .set("width", canvas.width())
            .set("height", canvas.height())
            .set("fill", &self.background_color);
        output.add_to_layer(RenderLayer::Background, Box::new(background));

        for cluster in layout.clusters() {
            let bounds = cluster.bounds();
            let frame = Frame::new(&self.frame, cluster.label(), bounds.to_size(), cluster.depth());
            output.merge(frame.render_to_layers(bounds.center()));
        }

        for edge in layout.edges() {
            let stroke = StrokeDefinition::new(
                edge.color().unwrap_or(self.edge_color),
                EDGE_WIDTH * edge.style().width_factor(),
            )
            .with_style(edge.style().stroke_style());
            let arrow = Arrow::new(stroke);
            output.add_to_layer(
                RenderLayer::Edge,
                self.arrow_drawer.draw_arrow(&arrow, edge.points()),
            );

            if let Some(label) = edge.label() {
                let text = Text::new(&self.edge_label, label);
                output.merge(text.render_to_layers(edge.label_position()));
            }
        }

        for node in layout.nodes() {
            let icon = Icon::new(&self.icon, node.kind(), node.label());
            output.merge(icon.render_to_layers(node.center()));
        }

        let title = Text::new(&self.title, layout.title());
        output.merge(title.render_to_layers(layout.title_position()));

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", canvas.width(), canvas.height()),
            )
            .set("width", canvas.width())
            .set("height", canvas.height());

        doc = doc.add(self.arrow_drawer.draw_marker_definitions());
        for node in output.render() {
            doc = doc.add(node);
        }

        debug!(markers = self.arrow_drawer.marker_count(); "SVG document rendered");
        doc
    }
}

impl Exporter for Svg {
    fn export(&mut self, layout: &DiagramLayout) -> Result<Vec<u8>, export::Error> {
        info!(title = layout.title(); "Exporting SVG");
        let doc = self.render_layout(layout);
        Ok(doc.to_string().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use archgram_core::topology::{EdgeAttributes, EdgeStyle, NodeKind, Topology};

    use super::*;
    use crate::{config::LayoutConfig, layout::Placement, structure::ScopeGraph};

    fn render(topology: &Topology, style: &StyleConfig) -> String {
        let mut svg = SvgBuilder::new().with_style(style).build().unwrap();
        let scopes = ScopeGraph::from_topology(topology).unwrap();
        let config = LayoutConfig::default();
        let layout = Placement::new(
            &config,
            svg.icon_definition(),
            svg.frame_definition(),
            svg.title_definition(),
        )
        .place(topology, &scopes)
        .unwrap();
        String::from_utf8(svg.export(&layout).unwrap()).unwrap()
    }

    fn topology() -> Topology {
        let mut topology = Topology::new("Svg Export");
        let vpc = topology.add_cluster("AWS VPC", None).unwrap();
        let k8s = topology
            .add_node("Kubernetes", NodeKind::Kubernetes, Some(vpc))
            .unwrap();
        let db = topology
            .add_node("Database", NodeKind::Database, Some(vpc))
            .unwrap();
        topology
            .add_edge(
                k8s,
                db,
                EdgeAttributes::new()
                    .with_label("Postgres port")
                    .with_style(EdgeStyle::Dashed),
            )
            .unwrap();
        topology
            .add_edge(db, k8s, EdgeAttributes::new().with_color(Color::new("red").unwrap()))
            .unwrap();
        topology
    }

    #[test]
    fn test_svg_contains_all_elements() {
        let svg = render(&topology(), &StyleConfig::default());

        assert!(svg.contains("<svg"));
        assert!(svg.contains("AWS VPC"));
        assert!(svg.contains("Kubernetes"));
        assert!(svg.contains("Postgres port"));
        assert!(svg.contains("Svg Export"));
        assert!(svg.contains("stroke-dasharray"));
        assert_eq!(svg.matches("marker-end").count(), 2);
    }

    #[test]
    fn test_marker_per_edge_color() {
        let svg = render(&topology(), &StyleConfig::default());
        assert_eq!(svg.matches("<marker").count(), 2);
    }

    #[test]
    fn test_layers_in_order() {
        let svg = render(&topology(), &StyleConfig::default());
        let position = |layer: &str| svg.find(&format!("data-layer=\"{layer}\"")).unwrap();

        assert!(position("background") < position("cluster"));
        assert!(position("cluster") < position("edge"));
        assert!(position("edge") < position("content"));
        assert!(position("content") < position("text"));
    }

    #[test]
    fn test_out_of_range_font_size_fails_build() {
        for size in [0, u16::MAX] {
            let style: StyleConfig = toml::from_str(&format!("font_size = {size}")).unwrap();
            assert!(matches!(
                SvgBuilder::new().with_style(&style).build(),
                Err(export::Error::Render(_))
            ));
        }
    }

    #[test]
    fn test_largest_font_size_renders() {
        let style: StyleConfig =
            toml::from_str(&format!("font_size = {}", crate::config::MAX_FONT_SIZE)).unwrap();
        let svg = render(&topology(), &style);
        assert!(svg.contains("Svg Export"));
    }

    #[test]
    fn test_invalid_style_color_fails_build() {
        let style: StyleConfig = toml::from_str("edge_color = \"nope\"").unwrap();
        assert!(matches!(
            SvgBuilder::new().with_style(&style).build(),
            Err(export::Error::Render(_))
        ));
    }
}
