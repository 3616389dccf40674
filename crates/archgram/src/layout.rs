//! Layout: from a scope graph to absolute coordinates.
//!
//! Layout runs in two steps:
//!
//! 1. A ranking engine ([`LayoutEngine`]) splits the members of every
//!    containment scope into ranks and orders each rank.
//! 2. Placement turns ranks into coordinates. Scopes are processed innermost
//!    first so a cluster's size is known before its parent is arranged, then
//!    absolute positions are assigned top-down from the root.
//!
//! The result is a [`DiagramLayout`]: positioned icons, cluster frames and
//! routed edges, ready for export.

mod engines;
mod placement;

use std::str::FromStr;

use serde::Deserialize;

use archgram_core::{
    color::Color,
    geometry::{Bounds, Point},
    identifier::Id,
    topology::{Direction, EdgeStyle, NodeKind},
};

pub(crate) use placement::Placement;

/// Ranking algorithm used for every containment scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    /// Depth-first cycle breaking, longest-path ranks, barycenter ordering.
    Basic,
    /// Layered drawing through `rust-sugiyama`.
    #[default]
    Sugiyama,
}

impl FromStr for LayoutEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "sugiyama" => Ok(Self::Sugiyama),
            _ => Err(format!(
                "invalid layout engine `{s}`, valid values: basic, sugiyama"
            )),
        }
    }
}

/// A node icon at its final position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    id: Id,
    label: String,
    kind: NodeKind,
    parent: Option<Id>,
    center: Point,
    glyph: Bounds,
}

impl PlacedNode {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    /// Center of the icon including its label.
    pub fn center(&self) -> Point {
        self.center
    }

    /// Bounds of the glyph alone, where edges attach.
    pub fn glyph(&self) -> Bounds {
        self.glyph
    }
}

/// A cluster frame at its final position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCluster {
    id: Id,
    label: String,
    parent: Option<Id>,
    depth: usize,
    bounds: Bounds,
}

impl PlacedCluster {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    /// Nesting level, 0 for clusters at the diagram root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// A routed edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEdge {
    source: Id,
    target: Id,
    label: Option<String>,
    style: EdgeStyle,
    color: Option<Color>,
    points: Vec<Point>,
    label_position: Point,
}

impl PlacedEdge {
    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn style(&self) -> EdgeStyle {
        self.style
    }

    /// Color set on the edge itself; the exporter falls back to the style default.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Path from the source glyph border to the target glyph border.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Center of the label box.
    pub fn label_position(&self) -> Point {
        self.label_position
    }
}

/// A fully positioned diagram.
///
/// Nodes and clusters are listed in declaration order, which puts every
/// cluster before the clusters nested in it. Edges keep the order they were
/// declared in.
#[derive(Debug, Clone)]
pub struct DiagramLayout {
    title: String,
    direction: Direction,
    bounds: Bounds,
    title_position: Point,
    nodes: Vec<PlacedNode>,
    clusters: Vec<PlacedCluster>,
    edges: Vec<PlacedEdge>,
}

impl DiagramLayout {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Canvas bounds; the top-left corner is the origin.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Center of the diagram title, below the content.
    pub fn title_position(&self) -> Point {
        self.title_position
    }

    pub fn nodes(&self) -> &[PlacedNode] {
        &self.nodes
    }

    pub fn clusters(&self) -> &[PlacedCluster] {
        &self.clusters
    }

    pub fn edges(&self) -> &[PlacedEdge] {
        &self.edges
    }

    pub fn node(&self, id: Id) -> Option<&PlacedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn cluster(&self, id: Id) -> Option<&PlacedCluster> {
        self.clusters.iter().find(|cluster| cluster.id == id)
    }
}
