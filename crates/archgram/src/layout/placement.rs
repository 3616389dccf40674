//! Turns ranked scopes into absolute coordinates.
//!
//! Placement is two passes over the [`ScopeGraph`]:
//!
//! - **Bottom-up**: each scope, innermost first, is ranked and arranged in
//!   local coordinates. The arranged content gives the size of the cluster
//!   frame owning the scope, which the parent scope then treats like any
//!   other member.
//! - **Top-down**: starting from the root, each scope's local coordinates
//!   are shifted to the content area of its frame.
//!
//! Edges are routed last, between the glyph borders of their endpoints.

use std::collections::HashMap;

use log::{debug, trace};

use archgram_core::{
    draw::{Drawable, FrameDefinition, Icon, IconDefinition, Text, TextDefinition, loop_route},
    geometry::{Bounds, Point, Size},
    identifier::Id,
    topology::{Direction, Edge, Member, Topology},
};

use super::{
    DiagramLayout, PlacedCluster, PlacedEdge, PlacedNode,
    engines::{self, Ranks},
};
use crate::{
    config::LayoutConfig,
    error::ArchgramError,
    structure::{ContainmentScope, ScopeGraph},
};

/// Empty space around the diagram.
const MARGIN: f32 = 24.0;
/// Gap between the diagram content and the title below it.
const TITLE_GAP: f32 = 20.0;
/// Distance between parallel edges joining the same two nodes.
const PARALLEL_EDGE_GAP: f32 = 8.0;
/// Height of a self-loop above its node; stacked loops grow by this much.
const LOOP_HEIGHT: f32 = 14.0;

/// A scope arranged in local coordinates, origin at the top-left corner of
/// its content.
#[derive(Debug)]
struct ScopeArrangement {
    positions: Vec<(Member, Point)>,
    content_size: Size,
}

/// Places a topology with a fixed layout configuration and styling.
pub(crate) struct Placement<'a> {
    config: &'a LayoutConfig,
    icon: &'a IconDefinition,
    frame: &'a FrameDefinition,
    title: &'a TextDefinition,
}

impl<'a> Placement<'a> {
    pub(crate) fn new(
        config: &'a LayoutConfig,
        icon: &'a IconDefinition,
        frame: &'a FrameDefinition,
        title: &'a TextDefinition,
    ) -> Self {
        Self {
            config,
            icon,
            frame,
            title,
        }
    }

    pub(crate) fn place(
        &self,
        topology: &Topology,
        scopes: &ScopeGraph,
    ) -> Result<DiagramLayout, ArchgramError> {
        let engine = engines::build(self.config.engine());
        let direction = topology.direction();

        let mut sizes: HashMap<Id, Size> = topology
            .nodes()
            .map(|node| {
                let icon = Icon::new(self.icon, node.kind(), node.label());
                (node.id(), icon.size())
            })
            .collect();

        let mut arrangements: HashMap<Option<Id>, ScopeArrangement> = HashMap::new();
        for scope in scopes.scopes() {
            let ranks = engine.rank(scope)?;
            let arrangement = self.arrange(scope, &ranks, &sizes, direction)?;

            if let Some(cluster_id) = scope.container() {
                let cluster = topology.cluster(cluster_id).ok_or_else(|| {
                    ArchgramError::Layout(format!("cluster `{cluster_id}` has no declaration"))
                })?;
                let frame_size = self.frame.frame_size(cluster.label(), arrangement.content_size);
                sizes.insert(cluster_id, frame_size);
            }

            trace!(
                ranks = ranks.len(),
                width = arrangement.content_size.width(),
                height = arrangement.content_size.height();
                "Arranged scope"
            );
            arrangements.insert(scope.container(), arrangement);
        }

        let content_size = arrangements
            .get(&None)
            .map(|root| root.content_size)
            .ok_or_else(|| ArchgramError::Layout("root scope was not arranged".to_string()))?;
        let title_size = Text::new(self.title, topology.title()).size();
        let inner_width = content_size.width().max(title_size.width());
        let origin = Point::new(
            MARGIN + (inner_width - content_size.width()) / 2.0,
            MARGIN,
        );

        let (centers, frames) = self.absolute_positions(topology, &arrangements, &sizes, origin)?;

        let nodes = topology
            .nodes()
            .map(|node| {
                let center = lookup(&centers, node.id(), "node position")?;
                let icon = Icon::new(self.icon, node.kind(), node.label());
                Ok(PlacedNode {
                    id: node.id(),
                    label: node.label().to_string(),
                    kind: node.kind(),
                    parent: node.parent(),
                    center,
                    glyph: icon.glyph_bounds(center),
                })
            })
            .collect::<Result<Vec<_>, ArchgramError>>()?;

        let clusters = topology
            .clusters()
            .map(|cluster| {
                Ok(PlacedCluster {
                    id: cluster.id(),
                    label: cluster.label().to_string(),
                    parent: cluster.parent(),
                    depth: topology.cluster_depth(cluster.id()),
                    bounds: lookup(&frames, cluster.id(), "cluster bounds")?,
                })
            })
            .collect::<Result<Vec<_>, ArchgramError>>()?;

        let edges = self.route_edges(topology, &nodes)?;

        let title_y = MARGIN + content_size.height() + TITLE_GAP + title_size.height() / 2.0;
        let canvas = Size::new(
            inner_width + 2.0 * MARGIN,
            MARGIN + content_size.height() + TITLE_GAP + title_size.height() + MARGIN,
        );

        debug!(
            nodes = nodes.len(),
            clusters = clusters.len(),
            edges = edges.len(),
            width = canvas.width(),
            height = canvas.height();
            "Layout placed"
        );

        Ok(DiagramLayout {
            title: topology.title().to_string(),
            direction,
            bounds: Bounds::new_from_top_left(Point::default(), canvas),
            title_position: Point::new(canvas.width() / 2.0, title_y),
            nodes,
            clusters,
            edges,
        })
    }

    /// Lays out the ranks of one scope.
    ///
    /// Ranks advance along the main axis (x for horizontal directions, y
    /// otherwise). Each rank is as thick as its largest member, and members
    /// of a rank are centered against the longest rank on the cross axis.
    fn arrange(
        &self,
        scope: &ContainmentScope,
        ranks: &Ranks,
        sizes: &HashMap<Id, Size>,
        direction: Direction,
    ) -> Result<ScopeArrangement, ArchgramError> {
        let horizontal = direction.is_horizontal();
        let main = |size: Size| if horizontal { size.width() } else { size.height() };
        let cross = |size: Size| if horizontal { size.height() } else { size.width() };

        let ranked_sizes = ranks
            .iter()
            .map(|rank| {
                rank.iter()
                    .map(|&id| {
                        let member = scope.member(id).ok_or_else(|| {
                            ArchgramError::Layout(format!("ranked `{id}` is not a scope member"))
                        })?;
                        Ok((member, lookup(sizes, id, "member size")?))
                    })
                    .collect::<Result<Vec<(Member, Size)>, ArchgramError>>()
            })
            .collect::<Result<Vec<_>, ArchgramError>>()?;

        let node_spacing = self.config.node_spacing();
        let rank_spacing = self.config.rank_spacing();

        let thickness: Vec<f32> = ranked_sizes
            .iter()
            .map(|rank| rank.iter().map(|&(_, size)| main(size)).fold(0.0, f32::max))
            .collect();
        let lengths: Vec<f32> = ranked_sizes
            .iter()
            .map(|rank| {
                let gaps = rank.len().saturating_sub(1) as f32 * node_spacing;
                rank.iter().map(|&(_, size)| cross(size)).sum::<f32>() + gaps
            })
            .collect();

        let total_main = thickness.iter().sum::<f32>()
            + ranked_sizes.len().saturating_sub(1) as f32 * rank_spacing;
        let total_cross = lengths.iter().copied().fold(0.0, f32::max);

        let mut positions = Vec::with_capacity(scope.len());
        let mut main_offset = 0.0;
        for ((rank, rank_thickness), rank_length) in ranked_sizes.iter().zip(&thickness).zip(&lengths) {
            let mut main_center = main_offset + rank_thickness / 2.0;
            if direction.is_reversed() {
                main_center = total_main - main_center;
            }

            let mut cross_offset = (total_cross - rank_length) / 2.0;
            for &(member, size) in rank {
                let cross_center = cross_offset + cross(size) / 2.0;
                cross_offset += cross(size) + node_spacing;

                let position = if horizontal {
                    Point::new(main_center, cross_center)
                } else {
                    Point::new(cross_center, main_center)
                };
                positions.push((member, position));
            }
            main_offset += rank_thickness + rank_spacing;
        }

        let content_size = if horizontal {
            Size::new(total_main, total_cross)
        } else {
            Size::new(total_cross, total_main)
        };

        Ok(ScopeArrangement {
            positions,
            content_size,
        })
    }

    /// Node centers and cluster frames in canvas coordinates.
    fn absolute_positions(
        &self,
        topology: &Topology,
        arrangements: &HashMap<Option<Id>, ScopeArrangement>,
        sizes: &HashMap<Id, Size>,
        root_origin: Point,
    ) -> Result<(HashMap<Id, Point>, HashMap<Id, Bounds>), ArchgramError> {
        let mut centers = HashMap::new();
        let mut frames = HashMap::new();

        let mut pending = vec![(None, root_origin)];
        while let Some((container, origin)) = pending.pop() {
            let arrangement = arrangements.get(&container).ok_or_else(|| {
                ArchgramError::Layout("scope was not arranged before placement".to_string())
            })?;

            for &(member, offset) in &arrangement.positions {
                let center = origin.add_point(offset);
                match member {
                    Member::Node(id) => {
                        centers.insert(id, center);
                    }
                    Member::Cluster(id) => {
                        let bounds = center.to_bounds(lookup(sizes, id, "cluster size")?);
                        let cluster = topology.cluster(id).ok_or_else(|| {
                            ArchgramError::Layout(format!("cluster `{id}` has no declaration"))
                        })?;
                        let inner = arrangements.get(&Some(id)).ok_or_else(|| {
                            ArchgramError::Layout(format!("cluster `{id}` was not arranged"))
                        })?;

                        let insets = self.frame.content_insets(cluster.label());
                        let content_origin = Point::new(
                            bounds.min_x() + (bounds.width() - inner.content_size.width()) / 2.0,
                            bounds.min_y() + insets.top(),
                        );
                        frames.insert(id, bounds);
                        pending.push((Some(id), content_origin));
                    }
                }
            }
        }

        Ok((centers, frames))
    }

    /// Routes every topology edge in declaration order.
    ///
    /// Edges joining the same two nodes, in either direction, are spread
    /// apart so each stays visible. Self-loops stack above their node.
    fn route_edges(
        &self,
        topology: &Topology,
        nodes: &[PlacedNode],
    ) -> Result<Vec<PlacedEdge>, ArchgramError> {
        let order: HashMap<Id, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id, i))
            .collect();
        let canonical = |edge: &Edge| {
            let (source, target) = (edge.source(), edge.target());
            match (order.get(&source), order.get(&target)) {
                (Some(s), Some(t)) if t < s => (target, source),
                _ => (source, target),
            }
        };

        let routing = self.config.edge_style();
        let mut seen: HashMap<(Id, Id), usize> = HashMap::new();
        let mut edges = Vec::with_capacity(topology.edges().len());
        for edge in topology.edges() {
            let key = canonical(edge);
            let slot = seen.entry(key).or_default();
            let index = *slot;
            *slot += 1;

            let source = glyph_of(nodes, &order, edge.source())?;
            let points = if edge.is_self_loop() {
                loop_route(source, LOOP_HEIGHT * (index + 1) as f32)
            } else {
                let target = glyph_of(nodes, &order, edge.target())?;
                let count = topology.edges_between(key.0, key.1).count()
                    + topology.edges_between(key.1, key.0).count();
                let shift = parallel_shift(nodes, &order, key, index, count)?;

                let (source, target) = (source.translate(shift), target.translate(shift));
                let start = source.boundary_point_towards(target.center());
                let end = target.boundary_point_towards(source.center());
                routing.route(start, end)
            };

            edges.push(PlacedEdge {
                source: edge.source(),
                target: edge.target(),
                label: edge.label().map(str::to_string),
                style: edge.style(),
                color: edge.color(),
                label_position: label_position(&points),
                points,
            });
        }

        Ok(edges)
    }
}

fn lookup<T: Copy>(map: &HashMap<Id, T>, id: Id, what: &str) -> Result<T, ArchgramError> {
    map.get(&id)
        .copied()
        .ok_or_else(|| ArchgramError::Layout(format!("missing {what} for `{id}`")))
}

fn glyph_of(nodes: &[PlacedNode], order: &HashMap<Id, usize>, id: Id) -> Result<Bounds, ArchgramError> {
    order
        .get(&id)
        .and_then(|&i| nodes.get(i))
        .map(|node| node.glyph)
        .ok_or_else(|| ArchgramError::Layout(format!("edge endpoint `{id}` was not placed")))
}

/// Offset of the `index`-th of `count` parallel edges, perpendicular to the
/// line joining the pair's glyphs.
fn parallel_shift(
    nodes: &[PlacedNode],
    order: &HashMap<Id, usize>,
    (first, second): (Id, Id),
    index: usize,
    count: usize,
) -> Result<Point, ArchgramError> {
    if count < 2 {
        return Ok(Point::default());
    }

    let delta = glyph_of(nodes, order, second)?
        .center()
        .sub_point(glyph_of(nodes, order, first)?.center());
    let length = delta.hypot();
    if length < f32::EPSILON {
        return Ok(Point::default());
    }

    let distance = (index as f32 - (count - 1) as f32 / 2.0) * PARALLEL_EDGE_GAP;
    Ok(Point::new(
        -delta.y() / length * distance,
        delta.x() / length * distance,
    ))
}

/// Middle of the middle segment of a route.
fn label_position(points: &[Point]) -> Point {
    let mid = points.len() / 2;
    match (mid.checked_sub(1).and_then(|i| points.get(i)), points.get(mid)) {
        (Some(&a), Some(&b)) => a.midpoint(b),
        (None, Some(&only)) => only,
        _ => Point::default(),
    }
}
