//! Low-level directed graph keyed by [`Id`].
//!
//! [`GraphInternal`] stores node data by id and edges as a flat list, with
//! the incoming edges of each node. Both maps are insertion ordered,
//! so iterating a graph always yields nodes and edges in declaration order
//! and layouts come out the same on every run.

use indexmap::IndexMap;

use archgram_core::identifier::Id;

/// A directed edge with an associated value.
#[derive(Debug, Clone, Copy)]
struct Edge<E> {
    source: Id,
    target: Id,
    value: E,
}

/// Directed multigraph; self-loops and parallel edges are allowed.
#[derive(Debug, Clone)]
pub(super) struct GraphInternal<N, E>
where
    N: Copy + std::fmt::Debug,
    E: Copy + std::fmt::Debug,
{
    nodes: IndexMap<Id, N>,
    edges: Vec<Edge<E>>,
    incoming: IndexMap<Id, Vec<usize>>,
}

impl<N, E> GraphInternal<N, E>
where
    N: Copy + std::fmt::Debug,
    E: Copy + std::fmt::Debug,
{
    pub(super) fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            incoming: IndexMap::new(),
        }
    }

    pub(super) fn node(&self, id: Id) -> Option<N> {
        self.nodes.get(&id).copied()
    }

    /// Node data in insertion order.
    pub(super) fn nodes(&self) -> impl Iterator<Item = N> {
        self.nodes.values().copied()
    }

    pub(super) fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub(super) fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Edges as `(source, target, value)`, in insertion order.
    pub(super) fn edges(&self) -> impl Iterator<Item = (Id, Id, E)> {
        self.edges
            .iter()
            .map(|edge| (edge.source, edge.target, edge.value))
    }

    pub(super) fn edges_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes without incoming edges.
    pub(super) fn roots(&self) -> impl Iterator<Item = N> {
        self.nodes
            .iter()
            .filter(|(id, _)| !self.incoming.contains_key(*id))
            .map(|(_, node)| *node)
    }

    /// Adds a node, replacing any node with the same id.
    pub(super) fn add_node(&mut self, id: Id, node: N) {
        self.nodes.insert(id, node);
    }

    /// Adds an edge between two existing nodes.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if either endpoint is missing.
    pub(super) fn add_edge(&mut self, source: Id, target: Id, value: E) {
        debug_assert!(
            self.nodes.contains_key(&source),
            "Adding edge: source node {source} does not exist for {value:?}",
        );
        debug_assert!(
            self.nodes.contains_key(&target),
            "Adding edge: target node {target} does not exist for {value:?}",
        );

        let idx = self.edges.len();
        self.edges.push(Edge {
            source,
            target,
            value,
        });
        self.incoming.entry(target).or_default().push(idx);
    }
}
