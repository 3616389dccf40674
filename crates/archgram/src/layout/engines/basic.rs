//! Basic ranking engine
//!
//! A small deterministic layered layout built on `petgraph`:
//!
//! 1. Cycles are broken by reversing the back edges of a depth-first search
//!    started from the scope roots.
//! 2. Every member is ranked by the longest path reaching it.
//! 3. One downward sweep orders each rank by the barycenter of its
//!    predecessors, keeping declaration order on ties.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use log::debug;
use petgraph::{
    Direction,
    algo::toposort,
    graph::{DiGraph, NodeIndex},
    visit::{DfsEvent, depth_first_search},
};

use archgram_core::identifier::Id;

use super::{RankingEngine, Ranks, complete_ranks};
use crate::{error::ArchgramError, structure::ContainmentScope};

#[derive(Debug, Default)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }

    fn scope_to_graph(scope: &ContainmentScope) -> (DiGraph<Id, usize>, HashMap<Id, NodeIndex>) {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();

        for member in scope.members() {
            node_map.insert(member.id(), graph.add_node(member.id()));
        }

        for (source, target, edge_index) in scope.edges() {
            if let (Some(&src_idx), Some(&tgt_idx)) = (node_map.get(&source), node_map.get(&target)) {
                graph.add_edge(src_idx, tgt_idx, edge_index);
            }
        }

        (graph, node_map)
    }

    /// Same nodes as `graph`, with every depth-first back edge reversed.
    ///
    /// The search starts at `roots`, then at every other node for components
    /// that are one big cycle.
    fn break_cycles(graph: &DiGraph<Id, usize>, roots: Vec<NodeIndex>) -> DiGraph<Id, usize> {
        let starts: Vec<NodeIndex> = roots.into_iter().chain(graph.node_indices()).collect();

        let mut back_edges = HashSet::new();
        depth_first_search(graph, starts, |event| {
            if let DfsEvent::BackEdge(source, target) = event {
                back_edges.insert((source, target));
            }
        });

        let mut acyclic = graph.map(|_, &id| id, |_, &edge_index| edge_index);
        acyclic.clear_edges();
        for edge in graph.raw_edges() {
            let (source, target) = (edge.source(), edge.target());
            if back_edges.contains(&(source, target)) {
                acyclic.add_edge(target, source, edge.weight);
            } else {
                acyclic.add_edge(source, target, edge.weight);
            }
        }

        if !back_edges.is_empty() {
            debug!(reversed = back_edges.len(); "Broke cycles in scope graph");
        }
        acyclic
    }

    /// Longest-path rank of every node of an acyclic graph.
    fn assign_ranks(graph: &DiGraph<Id, usize>) -> Result<Vec<Vec<NodeIndex>>, ArchgramError> {
        let order = toposort(graph, None).map_err(|cycle| {
            ArchgramError::Layout(format!(
                "scope graph still has a cycle through `{}`",
                graph[cycle.node_id()]
            ))
        })?;

        let mut rank_of: HashMap<NodeIndex, usize> = HashMap::new();
        for &idx in &order {
            let rank = graph
                .neighbors_directed(idx, Direction::Incoming)
                .filter_map(|pred| rank_of.get(&pred))
                .map(|rank| rank + 1)
                .max()
                .unwrap_or(0);
            rank_of.insert(idx, rank);
        }

        let mut ranks: Vec<Vec<NodeIndex>> = Vec::new();
        // Node indices follow declaration order
        for idx in graph.node_indices() {
            let rank = rank_of.get(&idx).copied().unwrap_or(0);
            while ranks.len() <= rank {
                ranks.push(Vec::new());
            }
            ranks[rank].push(idx);
        }
        Ok(ranks)
    }

    /// Orders every rank by the mean position of its predecessors.
    fn order_ranks(graph: &DiGraph<Id, usize>, ranks: &mut [Vec<NodeIndex>]) {
        let mut position: HashMap<NodeIndex, f32> = HashMap::new();
        for rank in ranks.iter_mut() {
            let mut keyed: Vec<(f32, NodeIndex)> = rank
                .iter()
                .enumerate()
                .map(|(i, &idx)| {
                    let preds: Vec<f32> = graph
                        .neighbors_directed(idx, Direction::Incoming)
                        .filter_map(|pred| position.get(&pred).copied())
                        .collect();
                    let key = if preds.is_empty() {
                        i as f32
                    } else {
                        preds.iter().sum::<f32>() / preds.len() as f32
                    };
                    (key, idx)
                })
                .collect();
            keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

            *rank = keyed.into_iter().map(|(_, idx)| idx).collect();
            for (i, &idx) in rank.iter().enumerate() {
                position.insert(idx, i as f32);
            }
        }
    }
}

impl RankingEngine for Engine {
    fn rank(&self, scope: &ContainmentScope) -> Result<Ranks, ArchgramError> {
        let (graph, node_map) = Self::scope_to_graph(scope);
        let roots = scope
            .roots()
            .filter_map(|member| node_map.get(&member.id()).copied())
            .collect();
        let graph = Self::break_cycles(&graph, roots);
        let mut ranks = Self::assign_ranks(&graph)?;
        Self::order_ranks(&graph, &mut ranks);

        let ranks = ranks
            .into_iter()
            .map(|rank| rank.into_iter().map(|idx| graph[idx]).collect())
            .collect();
        Ok(complete_ranks(scope, ranks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::engines::test_support::{rank_of, root_scope};

    #[test]
    fn test_chain_gets_one_rank_per_member() {
        let (scope, ids) = root_scope(&["a", "b", "c"], &[(0, 1), (1, 2)]);
        let ranks = Engine::new().rank(&scope).unwrap();
        assert_eq!(ranks, vec![vec![ids[0]], vec![ids[1]], vec![ids[2]]]);
    }

    #[test]
    fn test_longest_path_wins() {
        // a -> b -> c and a -> c: c sits below b
        let (scope, ids) = root_scope(&["a", "b", "c"], &[(0, 1), (1, 2), (0, 2)]);
        let ranks = Engine::new().rank(&scope).unwrap();
        assert_eq!(rank_of(&ranks, ids[2]), 2);
    }

    #[test]
    fn test_cycle_is_broken() {
        let (scope, ids) = root_scope(&["a", "b", "c"], &[(0, 1), (1, 2), (2, 0)]);
        let ranks = Engine::new().rank(&scope).unwrap();
        assert_eq!(ranks.len(), 3);
        assert_eq!(rank_of(&ranks, ids[0]), 0);
    }

    #[test]
    fn test_cycle_broken_from_scope_root() {
        // Root declared last: c <-> b, a -> b
        let (scope, ids) = root_scope(&["c", "b", "a"], &[(2, 1), (1, 0), (0, 1)]);
        let ranks = Engine::new().rank(&scope).unwrap();
        assert_eq!(rank_of(&ranks, ids[2]), 0);
        assert_eq!(rank_of(&ranks, ids[1]), 1);
        assert_eq!(rank_of(&ranks, ids[0]), 2);
    }

    #[test]
    fn test_two_cycle_with_root() {
        // users -> fw, fw <-> igw
        let (scope, ids) = root_scope(&["users", "fw", "igw"], &[(0, 1), (1, 2), (2, 1)]);
        let ranks = Engine::new().rank(&scope).unwrap();
        assert_eq!(rank_of(&ranks, ids[0]), 0);
        assert_eq!(rank_of(&ranks, ids[1]), 1);
        assert_eq!(rank_of(&ranks, ids[2]), 2);
    }

    #[test]
    fn test_isolated_members_share_first_rank() {
        let (scope, ids) = root_scope(&["a", "b", "c"], &[]);
        let ranks = Engine::new().rank(&scope).unwrap();
        assert_eq!(ranks, vec![ids]);
    }

    #[test]
    fn test_barycenter_follows_parents() {
        // p0 -> c1, p1 -> c0: children swap to sit under their parents
        let (scope, ids) = root_scope(&["p0", "p1", "c0", "c1"], &[(0, 3), (1, 2)]);
        let ranks = Engine::new().rank(&scope).unwrap();
        assert_eq!(ranks[0], vec![ids[0], ids[1]]);
        assert_eq!(ranks[1], vec![ids[3], ids[2]]);
    }
}
