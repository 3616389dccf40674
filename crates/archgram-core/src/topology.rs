//! Declarative model of an architecture diagram.
//!
//! A [`Topology`] owns every [`Node`], [`Cluster`] and [`Edge`] of one
//! diagram. It is built once in a fixed order, rendered and discarded:
//!
//! ```
//! use archgram_core::topology::{Direction, NodeKind, Topology};
//!
//! # fn main() -> Result<(), archgram_core::topology::TopologyError> {
//! let mut topology = Topology::new("Edge Stack").with_direction(Direction::LeftRight);
//! let users = topology.add_node("Users", NodeKind::Users, None)?;
//! let vpc = topology.add_cluster("VPC", None)?;
//! let lb = topology.add_node("Load Balancer", NodeKind::LoadBalancer, Some(vpc))?;
//! let app = topology.add_node("App", NodeKind::Kubernetes, Some(vpc))?;
//!
//! topology.flow(users).to(lb)?.labeled("HTTPS").to(app)?;
//!
//! assert_eq!(topology.edges().len(), 2);
//! assert_eq!(topology.edges()[1].label(), Some("HTTPS"));
//! assert_eq!(topology.file_stem(), "edge_stack");
//! # Ok(())
//! # }
//! ```
//!
//! References are checked when they are declared: a node can only be placed
//! in an existing cluster and an edge can only connect existing nodes. This
//! keeps the cluster tree acyclic and rules out dangling edges.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use crate::{color::Color, draw::StrokeStyle, identifier::Id};

/// Errors raised while declaring a topology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("node `{0}` is not declared")]
    UndeclaredNode(Id),

    #[error("cluster `{0}` is not declared")]
    UndeclaredCluster(Id),

    #[error("{0} label must not be empty")]
    EmptyLabel(&'static str),

    #[error("invalid icon name `{0}`")]
    UnknownIcon(String),

    #[error("invalid direction `{0}`, valid values: LR, RL, TB, BT")]
    InvalidDirection(String),

    #[error("invalid output format `{0}`, valid values: svg, dot, png")]
    InvalidFormat(String),
}

/// Vendor family an icon belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Aws,
    Generic,
    OnPrem,
    Saas,
}

impl Provider {
    /// Path segment used in dotted icon names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Generic => "generic",
            Self::OnPrem => "onprem",
            Self::Saas => "saas",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon category of a node.
///
/// Each kind is addressed by a dotted `provider.category.Name` path, the way
/// icon libraries organise their catalog:
///
/// | Kind | Path |
/// |------|------|
/// | `Users` | `onprem.client.Users` |
/// | `Firewall` | `generic.network.Firewall` |
/// | `Vpc` | `aws.network.VPC` |
/// | `InternetGateway` | `aws.network.InternetGateway` |
/// | `NatGateway` | `aws.network.NATGateway` |
/// | `LoadBalancer` | `aws.network.ELB` |
/// | `Kubernetes` | `aws.compute.EKS` |
/// | `Database` | `aws.database.RDS` |
/// | `Chat` | `saas.chat.Slack` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Users,
    Firewall,
    Vpc,
    InternetGateway,
    NatGateway,
    LoadBalancer,
    Kubernetes,
    Database,
    Chat,
}

impl NodeKind {
    pub const ALL: [NodeKind; 9] = [
        Self::Users,
        Self::Firewall,
        Self::Vpc,
        Self::InternetGateway,
        Self::NatGateway,
        Self::LoadBalancer,
        Self::Kubernetes,
        Self::Database,
        Self::Chat,
    ];

    pub fn provider(self) -> Provider {
        match self {
            Self::Users => Provider::OnPrem,
            Self::Firewall => Provider::Generic,
            Self::Vpc
            | Self::InternetGateway
            | Self::NatGateway
            | Self::LoadBalancer
            | Self::Kubernetes
            | Self::Database => Provider::Aws,
            Self::Chat => Provider::Saas,
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            Self::Users => "client",
            Self::Firewall
            | Self::Vpc
            | Self::InternetGateway
            | Self::NatGateway
            | Self::LoadBalancer => "network",
            Self::Kubernetes => "compute",
            Self::Database => "database",
            Self::Chat => "chat",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Firewall => "Firewall",
            Self::Vpc => "VPC",
            Self::InternetGateway => "InternetGateway",
            Self::NatGateway => "NATGateway",
            Self::LoadBalancer => "ELB",
            Self::Kubernetes => "EKS",
            Self::Database => "RDS",
            Self::Chat => "Slack",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.provider(), self.category(), self.name())
    }
}

impl FromStr for NodeKind {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| TopologyError::UnknownIcon(s.to_string()))
    }
}

/// Direction in which ranks of the diagram flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    LeftRight,
    RightLeft,
    #[default]
    TopBottom,
    BottomTop,
}

impl Direction {
    /// Whether ranks advance along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }

    /// Whether ranks advance towards decreasing coordinates.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::RightLeft | Self::BottomTop)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LR" => Ok(Self::LeftRight),
            "RL" => Ok(Self::RightLeft),
            "TB" => Ok(Self::TopBottom),
            "BT" => Ok(Self::BottomTop),
            _ => Err(TopologyError::InvalidDirection(s.to_string())),
        }
    }
}

/// File format a diagram is rendered to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    #[default]
    Svg,
    Dot,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Dot => "dot",
            Self::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "dot" | "gv" => Ok(Self::Dot),
            "png" => Ok(Self::Png),
            _ => Err(TopologyError::InvalidFormat(s.to_string())),
        }
    }
}

/// An entry of a containment scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Member {
    Node(Id),
    Cluster(Id),
}

impl Member {
    pub fn id(self) -> Id {
        match self {
            Self::Node(id) | Self::Cluster(id) => id,
        }
    }
}

/// A labeled icon representing an actor or resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    label: String,
    kind: NodeKind,
    parent: Option<Id>,
}

impl Node {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Cluster directly containing this node, `None` at the diagram root.
    pub fn parent(&self) -> Option<Id> {
        self.parent
    }
}

/// A named boundary grouping nodes and nested clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    id: Id,
    label: String,
    parent: Option<Id>,
    members: Vec<Member>,
}

impl Cluster {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    /// Direct members in declaration order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }
}

/// Line style of an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Bold,
}

impl EdgeStyle {
    /// Dash pattern used when drawing the edge.
    pub fn stroke_style(self) -> StrokeStyle {
        match self {
            Self::Solid | Self::Bold => StrokeStyle::Solid,
            Self::Dashed => StrokeStyle::Dashed,
            Self::Dotted => StrokeStyle::Dotted,
        }
    }

    /// Multiplier applied to the configured edge width.
    pub fn width_factor(self) -> f32 {
        match self {
            Self::Bold => 2.0,
            _ => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Bold => "bold",
        }
    }
}

/// Optional decoration of an edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeAttributes {
    label: Option<String>,
    style: EdgeStyle,
    color: Option<Color>,
}

impl EdgeAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: Id,
    target: Id,
    attributes: EdgeAttributes,
}

impl Edge {
    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.attributes.label.as_deref()
    }

    pub fn style(&self) -> EdgeStyle {
        self.attributes.style
    }

    pub fn color(&self) -> Option<Color> {
        self.attributes.color
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// The complete node / cluster / edge description of one diagram.
#[derive(Debug, Clone)]
pub struct Topology {
    title: String,
    direction: Direction,
    nodes: IndexMap<Id, Node>,
    clusters: IndexMap<Id, Cluster>,
    root_members: Vec<Member>,
    edges: Vec<Edge>,
}

impl Topology {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            direction: Direction::default(),
            nodes: IndexMap::new(),
            clusters: IndexMap::new(),
            root_members: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Declares a node inside `parent`, or at the root when `parent` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EmptyLabel`] for a blank label and
    /// [`TopologyError::UndeclaredCluster`] when `parent` is unknown.
    pub fn add_node(
        &mut self,
        label: impl Into<String>,
        kind: NodeKind,
        parent: Option<Id>,
    ) -> Result<Id, TopologyError> {
        let label = non_empty(label.into(), "node")?;
        self.check_parent(parent)?;

        let id = Id::indexed("node", self.nodes.len());
        debug!(id:%, label:%, kind:% = kind; "Declaring node");

        self.members_of(parent).push(Member::Node(id));
        self.nodes.insert(
            id,
            Node {
                id,
                label,
                kind,
                parent,
            },
        );
        Ok(id)
    }

    /// Declares a cluster inside `parent`, or at the root when `parent` is `None`.
    pub fn add_cluster(
        &mut self,
        label: impl Into<String>,
        parent: Option<Id>,
    ) -> Result<Id, TopologyError> {
        let label = non_empty(label.into(), "cluster")?;
        self.check_parent(parent)?;

        let id = Id::indexed("cluster", self.clusters.len());
        debug!(id:%, label:%; "Declaring cluster");

        self.members_of(parent).push(Member::Cluster(id));
        self.clusters.insert(
            id,
            Cluster {
                id,
                label,
                parent,
                members: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Appends a directed edge between two declared nodes.
    ///
    /// Duplicate edges and self-loops are accepted and kept as declared.
    pub fn add_edge(
        &mut self,
        source: Id,
        target: Id,
        attributes: EdgeAttributes,
    ) -> Result<(), TopologyError> {
        self.check_node(source)?;
        self.check_node(target)?;

        debug!(source:%, target:%, label:? = attributes.label; "Declaring edge");
        self.edges.push(Edge {
            source,
            target,
            attributes,
        });
        Ok(())
    }

    /// Starts a chain of edges at `start`.
    ///
    /// Every [`Flow::to`] call appends one edge from the current node and
    /// moves the chain to the target, so `flow(a).to(b)?.to(c)?` declares
    /// `a -> b` and `b -> c`.
    pub fn flow(&mut self, start: Id) -> Flow<'_> {
        Flow {
            topology: self,
            current: start,
            pending: EdgeAttributes::default(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Output file name without extension: the title's words joined with `_`
    /// and lowercased.
    pub fn file_stem(&self) -> String {
        self.title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase()
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> {
        self.nodes.values()
    }

    /// Clusters in declaration order.
    pub fn clusters(&self) -> impl ExactSizeIterator<Item = &Cluster> {
        self.clusters.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn cluster(&self, id: Id) -> Option<&Cluster> {
        self.clusters.get(&id)
    }

    /// Members declared outside any cluster, in declaration order.
    pub fn root_members(&self) -> &[Member] {
        &self.root_members
    }

    /// Clusters enclosing `member`, innermost first.
    pub fn ancestors(&self, member: Member) -> Vec<Id> {
        let mut ancestors = Vec::new();
        let mut current = self.parent_of(member);
        while let Some(cluster_id) = current {
            ancestors.push(cluster_id);
            current = self.clusters.get(&cluster_id).and_then(Cluster::parent);
        }
        ancestors
    }

    /// Nesting depth of a cluster: 0 for clusters at the diagram root.
    pub fn cluster_depth(&self, cluster_id: Id) -> usize {
        self.ancestors(Member::Cluster(cluster_id)).len()
    }

    /// Edges from `source` to `target`, in declaration order.
    pub fn edges_between(&self, source: Id, target: Id) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(move |edge| edge.source == source && edge.target == target)
    }

    /// Re-checks every parent and edge reference.
    pub fn validate(&self) -> Result<(), TopologyError> {
        for node in self.nodes.values() {
            self.check_parent(node.parent)?;
        }
        for cluster in self.clusters.values() {
            self.check_parent(cluster.parent)?;
        }
        for edge in &self.edges {
            self.check_node(edge.source)?;
            self.check_node(edge.target)?;
        }
        Ok(())
    }

    fn parent_of(&self, member: Member) -> Option<Id> {
        match member {
            Member::Node(id) => self.nodes.get(&id).and_then(Node::parent),
            Member::Cluster(id) => self.clusters.get(&id).and_then(Cluster::parent),
        }
    }

    fn check_parent(&self, parent: Option<Id>) -> Result<(), TopologyError> {
        match parent {
            Some(id) if !self.clusters.contains_key(&id) => {
                Err(TopologyError::UndeclaredCluster(id))
            }
            _ => Ok(()),
        }
    }

    fn check_node(&self, id: Id) -> Result<(), TopologyError> {
        if self.nodes.contains_key(&id) {
            Ok(())
        } else {
            Err(TopologyError::UndeclaredNode(id))
        }
    }

    /// Member list of `parent`; callers check the parent exists first.
    fn members_of(&mut self, parent: Option<Id>) -> &mut Vec<Member> {
        match parent.and_then(|id| self.clusters.get_mut(&id)) {
            Some(cluster) => &mut cluster.members,
            None => &mut self.root_members,
        }
    }
}

/// Chaining edge builder returned by [`Topology::flow`].
///
/// Decorations set with [`labeled`](Flow::labeled), [`styled`](Flow::styled)
/// and [`colored`](Flow::colored) apply to the next hop only.
#[derive(Debug)]
pub struct Flow<'a> {
    topology: &'a mut Topology,
    current: Id,
    pending: EdgeAttributes,
}

impl Flow<'_> {
    /// Adds an edge from the current node to `target` and moves to `target`.
    pub fn to(mut self, target: Id) -> Result<Self, TopologyError> {
        let attributes = std::mem::take(&mut self.pending);
        self.topology.add_edge(self.current, target, attributes)?;
        self.current = target;
        Ok(self)
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.pending.label = Some(label.into());
        self
    }

    pub fn styled(mut self, style: EdgeStyle) -> Self {
        self.pending.style = style;
        self
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.pending.color = Some(color);
        self
    }
}

fn non_empty(label: String, what: &'static str) -> Result<String, TopologyError> {
    if label.trim().is_empty() {
        Err(TopologyError::EmptyLabel(what))
    } else {
        Ok(label)
    }
}
