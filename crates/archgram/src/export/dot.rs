//! Graphviz export.
//!
//! Builds a `dot_structures` graph mirroring the diagram: one `cluster_*`
//! subgraph per cluster, nested like the topology, and one DOT edge per
//! declared edge. Graphviz lays the graph out itself, so only the hierarchy,
//! labels and edge decorations of the [`DiagramLayout`] are used.
//!
//! PNG output runs the `dot` executable through `graphviz-rust`; it must be
//! installed and on `PATH`.

use std::collections::HashMap;

use dot_structures as dot;
use graphviz_rust::{
    cmd::Format,
    exec,
    printer::{DotPrinter, PrinterContext},
};
use log::{debug, info};

use archgram_core::{identifier::Id, topology::EdgeStyle};

use crate::{
    export::{self, Exporter},
    layout::{DiagramLayout, PlacedCluster, PlacedNode},
};

/// Output produced by a [`Dot`] exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotOutput {
    /// DOT source text
    Text,
    /// PNG image rendered by Graphviz
    Png,
}

/// Graphviz exporter.
#[derive(Debug)]
pub struct Dot {
    output: DotOutput,
}

impl Dot {
    pub fn new(output: DotOutput) -> Self {
        Self { output }
    }

    /// Builds the Graphviz graph for `layout`.
    pub fn to_graph(layout: &DiagramLayout) -> dot::Graph {
        let mut stmts = vec![
            graph_attribute("rankdir", plain(layout.direction().as_str())),
            graph_attribute("label", quoted(layout.title())),
            graph_attribute("labelloc", plain("b")),
            graph_attribute("fontsize", plain("15")),
            graph_attribute("pad", quoted("0.5")),
            graph_attribute("nodesep", quoted("0.60")),
            graph_attribute("ranksep", quoted("0.75")),
            graph_attribute("splines", plain("ortho")),
        ];

        let tree = Tree::new(layout);
        stmts.extend(tree.members(None));

        for edge in layout.edges() {
            let mut attributes = Vec::new();
            if let Some(label) = edge.label() {
                attributes.push(attribute("label", quoted(label)));
            }
            if edge.style() != EdgeStyle::Solid {
                attributes.push(attribute("style", plain(edge.style().as_str())));
            }
            if let Some(color) = edge.color() {
                attributes.push(attribute("color", quoted(&color.to_hex_string())));
            }
            stmts.push(dot::Stmt::Edge(dot::Edge {
                ty: dot::EdgeTy::Pair(vertex(edge.source()), vertex(edge.target())),
                attributes,
            }));
        }

        dot::Graph::DiGraph {
            id: quoted(layout.title()),
            strict: false,
            stmts,
        }
    }
}

impl Exporter for Dot {
    fn export(&mut self, layout: &DiagramLayout) -> Result<Vec<u8>, export::Error> {
        let graph = Self::to_graph(layout);
        let mut ctx = PrinterContext::default();

        match self.output {
            DotOutput::Text => {
                info!(title = layout.title(); "Exporting DOT");
                Ok(graph.print(&mut ctx).into_bytes())
            }
            DotOutput::Png => {
                info!(title = layout.title(); "Rendering PNG with Graphviz");
                let bytes = exec(graph, &mut ctx, vec![Format::Png.into()])
                    .map(Vec::<u8>::from)
                    .map_err(export::Error::Io)?;
                debug!(bytes = bytes.len(); "Graphviz finished");
                Ok(bytes)
            }
        }
    }
}

/// Members of each cluster, and of the root under `None`, in declaration order.
struct Tree<'a> {
    nodes: HashMap<Option<Id>, Vec<&'a PlacedNode>>,
    clusters: HashMap<Option<Id>, Vec<&'a PlacedCluster>>,
}

impl<'a> Tree<'a> {
    fn new(layout: &'a DiagramLayout) -> Self {
        let mut nodes: HashMap<Option<Id>, Vec<&PlacedNode>> = HashMap::new();
        for node in layout.nodes() {
            nodes.entry(node.parent()).or_default().push(node);
        }
        let mut clusters: HashMap<Option<Id>, Vec<&PlacedCluster>> = HashMap::new();
        for cluster in layout.clusters() {
            clusters.entry(cluster.parent()).or_default().push(cluster);
        }
        Self { nodes, clusters }
    }

    fn members(&self, container: Option<Id>) -> Vec<dot::Stmt> {
        let mut stmts = Vec::new();

        for node in self.nodes.get(&container).into_iter().flatten() {
            stmts.push(dot::Stmt::Node(dot::Node::new(
                node_id(node.id()),
                vec![
                    attribute("label", quoted(node.label())),
                    attribute("tooltip", quoted(&node.kind().to_string())),
                    attribute("shape", plain("box")),
                    attribute("style", plain("rounded")),
                ],
            )));
        }

        for cluster in self.clusters.get(&container).into_iter().flatten() {
            let mut inner = vec![
                graph_attribute("label", quoted(cluster.label())),
                graph_attribute("labeljust", plain("l")),
                graph_attribute("style", plain("rounded")),
            ];
            inner.extend(self.members(Some(cluster.id())));
            stmts.push(dot::Stmt::Subgraph(dot::Subgraph {
                id: plain(&cluster.id().to_string()),
                stmts: inner,
            }));
        }

        stmts
    }
}

fn plain(value: &str) -> dot::Id {
    dot::Id::Plain(value.to_string())
}

/// A double-quoted DOT string with quotes and backslashes escaped.
fn quoted(value: &str) -> dot::Id {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    dot::Id::Escaped(format!("\"{escaped}\""))
}

fn attribute(key: &str, value: dot::Id) -> dot::Attribute {
    dot::Attribute(plain(key), value)
}

fn graph_attribute(key: &str, value: dot::Id) -> dot::Stmt {
    dot::Stmt::Attribute(attribute(key, value))
}

fn node_id(id: Id) -> dot::NodeId {
    dot::NodeId(plain(&id.to_string()), None)
}

fn vertex(id: Id) -> dot::Vertex {
    dot::Vertex::N(node_id(id))
}
