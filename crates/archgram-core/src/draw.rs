//! Drawable components for diagram rendering.
//!
//! Every visual element of an architecture diagram implements [`Drawable`]:
//! node icons with their labels, cluster frames and text. Edges are drawn
//! through an [`ArrowDrawer`] so arrow markers can be shared per color.
//!
//! # Layer-Based Rendering
//!
//! Drawables render to one or more [`RenderLayer`]s, which are ordered during
//! final SVG generation. Cluster frames therefore always sit below edges, and
//! edges below icons, regardless of the order elements are emitted in.
mod arrow;
mod frame;
mod icon;
mod layer;
mod stroke;
mod text;

pub use arrow::{Arrow, ArrowDrawer, ArrowRouting, loop_route};
pub use frame::{Frame, FrameDefinition};
pub use icon::{Icon, IconDefinition};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::{Text, TextDefinition};

use crate::geometry::{Point, Size};

/// Trait for drawable diagram elements that can be rendered to SVG layers.
pub trait Drawable: std::fmt::Debug {
    /// Renders this drawable centered at `position`.
    ///
    /// Simple drawables typically emit to a single layer, while composite
    /// drawables such as icons emit their shapes and labels to different
    /// layers for proper z-ordering.
    fn render_to_layers(&self, position: Point) -> LayeredOutput;

    /// Returns the size of this drawable.
    fn size(&self) -> Size;
}
