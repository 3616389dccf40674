//! Containment scopes and edge lifting.
//!
//! Each cluster of a topology, and the diagram root, becomes one
//! [`ContainmentScope`] holding its direct members. A scope is a small graph
//! of its own: every topology edge is re-expressed between the two members
//! of one scope that contain its endpoints, in the scope of the endpoints'
//! lowest common ancestor cluster.
//!
//! ```text
//!  AWS VPC ─────────────────────────────┐
//!  │ Public Subnet ──┐  Private Subnet ─┐│
//!  │ │ lb ───────────┼──▶ k8s          ││     lb -> k8s is lifted into the
//!  │ └───────────────┘  └───────────────┘│     "AWS VPC" scope as
//!  └─────────────────────────────────────┘     Public Subnet -> Private Subnet
//! ```
//!
//! Scopes are stored innermost first, so a layout pass over them always sees
//! a cluster's content before the cluster itself.

use std::collections::HashMap;

use log::{debug, trace};

use archgram_core::{
    identifier::Id,
    topology::{Member, Topology},
};

use super::graph_base::GraphInternal;
use crate::error::ArchgramError;

/// The members directly inside one cluster, or at the diagram root.
#[derive(Debug, Clone)]
pub struct ContainmentScope {
    container: Option<Id>,
    graph: GraphInternal<Member, usize>,
}

impl ContainmentScope {
    fn new(container: Option<Id>) -> Self {
        Self {
            container,
            graph: GraphInternal::new(),
        }
    }

    /// Cluster owning this scope, `None` for the diagram root.
    pub fn container(&self) -> Option<Id> {
        self.container
    }

    /// Direct members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = Member> {
        self.graph.nodes()
    }

    pub fn member(&self, id: Id) -> Option<Member> {
        self.graph.node(id)
    }

    pub fn len(&self) -> usize {
        self.graph.nodes_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lifted edges as `(source member, target member, topology edge index)`.
    pub fn edges(&self) -> impl Iterator<Item = (Id, Id, usize)> {
        self.graph.edges()
    }

    pub fn edges_count(&self) -> usize {
        self.graph.edges_count()
    }

    /// Members no lifted edge points to.
    pub fn roots(&self) -> impl Iterator<Item = Member> {
        self.graph.roots()
    }

    fn add_member(&mut self, member: Member) {
        self.graph.add_node(member.id(), member);
    }

    fn add_edge(&mut self, source: Id, target: Id, edge_index: usize) -> Result<(), ArchgramError> {
        for id in [source, target] {
            if !self.graph.contains_node(id) {
                return Err(ArchgramError::Graph(format!(
                    "member `{id}` is not part of scope `{}`",
                    scope_name(self.container)
                )));
            }
        }
        self.graph.add_edge(source, target, edge_index);
        Ok(())
    }
}

/// All containment scopes of a topology, innermost first.
#[derive(Debug, Clone)]
pub struct ScopeGraph {
    scopes: Vec<ContainmentScope>,
    self_loops: Vec<usize>,
}

impl ScopeGraph {
    /// Builds the scopes of `topology` and lifts every edge into one of them.
    ///
    /// # Errors
    ///
    /// Returns [`ArchgramError::Graph`] if an edge references an element the
    /// cluster tree does not reach.
    pub fn from_topology(topology: &Topology) -> Result<Self, ArchgramError> {
        let mut scopes = Vec::with_capacity(topology.clusters().len() + 1);
        collect_scopes(topology, None, topology.root_members(), &mut scopes)?;

        let index: HashMap<Option<Id>, usize> = scopes
            .iter()
            .enumerate()
            .map(|(i, scope)| (scope.container(), i))
            .collect();

        let mut self_loops = Vec::new();
        for (edge_index, edge) in topology.edges().iter().enumerate() {
            let lifted = lift_edge(topology, edge.source(), edge.target());
            if lifted.source == lifted.target {
                trace!(edge_index = edge_index; "Edge collapses onto one member");
                self_loops.push(edge_index);
                continue;
            }

            let scope_index = index.get(&lifted.scope).copied().ok_or_else(|| {
                ArchgramError::Graph(format!(
                    "scope `{}` not found for edge {edge_index}",
                    scope_name(lifted.scope)
                ))
            })?;
            scopes[scope_index].add_edge(lifted.source.id(), lifted.target.id(), edge_index)?;
        }

        debug!(
            scopes = scopes.len(),
            self_loops = self_loops.len();
            "Scope graph built"
        );
        Ok(Self { scopes, self_loops })
    }

    /// Scopes, innermost first; the root scope is always last.
    pub fn scopes(&self) -> std::slice::Iter<'_, ContainmentScope> {
        self.scopes.iter()
    }

    /// Indices of topology edges that stay inside a single member.
    pub fn self_loops(&self) -> &[usize] {
        &self.self_loops
    }
}

/// Pushes the scope of `container` after the scopes of all its sub-clusters.
fn collect_scopes(
    topology: &Topology,
    container: Option<Id>,
    members: &[Member],
    scopes: &mut Vec<ContainmentScope>,
) -> Result<(), ArchgramError> {
    let mut scope = ContainmentScope::new(container);
    for &member in members {
        if let Member::Cluster(cluster_id) = member {
            let cluster = topology.cluster(cluster_id).ok_or_else(|| {
                ArchgramError::Graph(format!("cluster `{cluster_id}` is not declared"))
            })?;
            collect_scopes(topology, Some(cluster_id), cluster.members(), scopes)?;
        }
        scope.add_member(member);
    }
    trace!(scope = scope_name(container), members = scope.len(); "Collected scope");
    scopes.push(scope);
    Ok(())
}

/// An edge re-expressed inside the scope of its endpoints' common ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LiftedEdge {
    scope: Option<Id>,
    source: Member,
    target: Member,
}

fn lift_edge(topology: &Topology, source: Id, target: Id) -> LiftedEdge {
    // Outermost cluster first
    let source_path: Vec<Id> = topology
        .ancestors(Member::Node(source))
        .into_iter()
        .rev()
        .collect();
    let target_path: Vec<Id> = topology
        .ancestors(Member::Node(target))
        .into_iter()
        .rev()
        .collect();

    let common = source_path
        .iter()
        .zip(&target_path)
        .take_while(|(a, b)| a == b)
        .count();

    let scope = common.checked_sub(1).map(|i| source_path[i]);
    let member_at = |path: &[Id], node: Id| {
        path.get(common)
            .map_or(Member::Node(node), |&cluster| Member::Cluster(cluster))
    };

    LiftedEdge {
        scope,
        source: member_at(&source_path, source),
        target: member_at(&target_path, target),
    }
}

fn scope_name(container: Option<Id>) -> String {
    container.map_or_else(|| "root".to_string(), |id| id.to_string())
}
