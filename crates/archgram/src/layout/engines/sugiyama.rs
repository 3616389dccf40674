//! Sugiyama ranking engine
//!
//! Delegates rank assignment and crossing reduction to `rust-sugiyama`, then
//! reads ranks back from the returned coordinates: members sharing a `y`
//! share a rank, ordered by `x`. Each connected component comes back as its
//! own layout; components are merged rank by rank, side by side.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use log::{debug, trace};
use rust_sugiyama::configure::Config;

use archgram_core::identifier::Id;

use super::{RankingEngine, Ranks, complete_ranks};
use crate::{error::ArchgramError, structure::ContainmentScope};

/// Coordinates closer than this are the same rank.
const RANK_TOLERANCE: f32 = 0.5;

#[derive(Debug)]
pub struct Engine {
    vertex_spacing: f64,
}

impl Engine {
    pub fn new() -> Self {
        Self { vertex_spacing: 4.0 }
    }

    /// Runs `rust-sugiyama`, turning a panic inside it into a layout error.
    fn run(&self, edges: &[(u32, u32)]) -> Result<Vec<Vec<(u32, f32, f32)>>, ArchgramError> {
        let edges = edges.to_vec();
        let vertex_spacing = self.vertex_spacing;

        let layouts = std::panic::catch_unwind(move || {
            let config = Config {
                minimum_length: 1,
                vertex_spacing,
                ..Default::default()
            };
            rust_sugiyama::from_edges(&edges, &config)
        });

        match layouts {
            Ok(results) if results.is_empty() => Err(ArchgramError::Layout(
                "Rust-sugiyama returned empty layout results".to_string(),
            )),
            Ok(results) => Ok(results
                .iter()
                .map(|(coords, _, _)| {
                    coords
                        .iter()
                        .filter_map(|&(id, (x, y))| match u32::try_from(id) {
                            Ok(id) => Some((id, x as f32, y as f32)),
                            Err(_) => {
                                debug!("Node ID {id} from rust-sugiyama result is out of valid range");
                                None
                            }
                        })
                        .collect()
                })
                .collect()),
            Err(err) => {
                let message = if let Some(panic_msg) = err.downcast_ref::<String>() {
                    format!("Rust-sugiyama layout engine panicked: {panic_msg}")
                } else if let Some(panic_msg) = err.downcast_ref::<&str>() {
                    format!("Rust-sugiyama layout engine panicked: {panic_msg}")
                } else {
                    "Rust-sugiyama layout engine panicked with unknown error".to_string()
                };
                Err(ArchgramError::Layout(message))
            }
        }
    }
}

impl RankingEngine for Engine {
    fn rank(&self, scope: &ContainmentScope) -> Result<Ranks, ArchgramError> {
        let members: Vec<Id> = scope.members().map(|member| member.id()).collect();
        let index: HashMap<Id, u32> = members
            .iter()
            .enumerate()
            .filter_map(|(i, &id)| u32::try_from(i).ok().map(|i| (id, i)))
            .collect();

        // Parallel edges add nothing to the ranking
        let mut seen = HashSet::new();
        let edges: Vec<(u32, u32)> = scope
            .edges()
            .filter_map(|(source, target, _)| Some((*index.get(&source)?, *index.get(&target)?)))
            .filter(|&(source, target)| source != target && seen.insert((source, target)))
            .collect();

        if edges.is_empty() {
            trace!(members = members.len(); "No edges in scope, single rank");
            return Ok(complete_ranks(scope, Vec::new()));
        }

        debug!(
            "Applying Sugiyama algorithm to graph with {} nodes and {} edges",
            members.len(),
            edges.len()
        );
        let components = self.run(&edges)?;

        let mut merged: Ranks = Vec::new();
        for coords in components {
            let mut ranks = ranks_from_coordinates(coords);
            if points_backwards(&ranks, &edges) {
                ranks.reverse();
            }
            for (r, rank) in ranks.into_iter().enumerate() {
                if merged.len() <= r {
                    merged.push(Vec::new());
                }
                merged[r].extend(
                    rank.into_iter()
                        .filter_map(|i| members.get(i as usize).copied()),
                );
            }
        }

        Ok(complete_ranks(scope, merged))
    }
}

/// Groups vertices by `y` into ranks, each ordered by `x`.
///
/// Vertices within `RANK_TOLERANCE` of the first `y` of a rank join it.
fn ranks_from_coordinates(mut coords: Vec<(u32, f32, f32)>) -> Vec<Vec<u32>> {
    coords.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal));

    let mut ranks: Vec<Vec<(u32, f32)>> = Vec::new();
    let mut current_y: Option<f32> = None;
    for (id, x, y) in coords {
        match current_y {
            Some(rank_y) if (y - rank_y).abs() <= RANK_TOLERANCE => {}
            _ => {
                ranks.push(Vec::new());
                current_y = Some(y);
            }
        }
        if let Some(rank) = ranks.last_mut() {
            rank.push((id, x));
        }
    }

    ranks
        .into_iter()
        .map(|mut rank| {
            rank.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
            rank.into_iter().map(|(id, _)| id).collect()
        })
        .collect()
}

/// Whether most edges inside these ranks go from a higher to a lower rank.
fn points_backwards(ranks: &[Vec<u32>], edges: &[(u32, u32)]) -> bool {
    let rank_of: HashMap<u32, usize> = ranks
        .iter()
        .enumerate()
        .flat_map(|(r, rank)| rank.iter().map(move |&id| (id, r)))
        .collect();

    let (mut forward, mut backward) = (0usize, 0usize);
    for (source, target) in edges {
        if let (Some(s), Some(t)) = (rank_of.get(source), rank_of.get(target)) {
            match s.cmp(t) {
                Ordering::Less => forward += 1,
                Ordering::Greater => backward += 1,
                Ordering::Equal => {}
            }
        }
    }
    backward > forward
}
