//! Layer-based rendering for SVG output.
//!
//! - [`RenderLayer`]: the available z-order layers, bottom to top
//! - [`LayeredOutput`]: SVG nodes collected per layer
//!
//! # Example
//!
//! ```
//! # use archgram_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::Rectangle;
//! let mut output = LayeredOutput::new();
//!
//! output.add_to_layer(RenderLayer::Text, Box::new(svg::node::element::Text::new("EKS")));
//! output.add_to_layer(RenderLayer::Background, Box::new(Rectangle::new()));
//!
//! // Background is emitted first even though it was added last.
//! let svg_nodes = output.render();
//! assert_eq!(svg_nodes.len(), 2);
//! ```

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers for SVG output.
///
/// The `Ord` derive follows declaration order: the first variant renders
/// first (bottom) and the last variant renders last (top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Diagram background
    Background,
    /// Cluster frames, outermost first
    Cluster,
    /// Edges between nodes
    Edge,
    /// Node icons
    Content,
    /// Node, cluster and edge labels
    Text,
}

impl RenderLayer {
    /// Returns the value used for the `data-layer` attribute.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Cluster => "cluster",
            Self::Edge => "edge",
            Self::Content => "content",
            Self::Text => "text",
        }
    }
}

/// SVG nodes grouped by rendering layer.
///
/// When rendered, nodes are emitted in layer order, and within one layer in
/// insertion order.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node to `layer`.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Appends every node of `other`, keeping its layer assignments.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each non-empty layer becomes one `<g data-layer="...">` element.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.is_empty() {
            return Vec::new();
        }

        // Stable sort keeps insertion order inside a layer
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group = svg_element::Group::new().set("data-layer", current_layer.name());

        for (layer, node) in self.items {
            if layer != current_layer {
                result.push(Box::new(current_group) as SvgNode);

                current_layer = layer;
                current_group = svg_element::Group::new().set("data-layer", layer.name());
            }

            current_group = current_group.add(node);
        }

        result.push(Box::new(current_group) as SvgNode);

        result
    }
}
