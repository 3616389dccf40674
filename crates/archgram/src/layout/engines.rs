//! Ranking engines.
//!
//! An engine only decides *which rank* each member of a scope lands on and
//! the order of members inside a rank. Turning ranks into coordinates is the
//! job of placement, so both engines share spacing and direction handling.

mod basic;
mod sugiyama;

use std::collections::HashSet;

use log::trace;

use archgram_core::identifier::Id;

use super::LayoutEngine;
use crate::{error::ArchgramError, structure::ContainmentScope};

/// Ranks of a scope, first rank first, each ordered along the cross axis.
pub(crate) type Ranks = Vec<Vec<Id>>;

/// Splits the members of one containment scope into ordered ranks.
pub(crate) trait RankingEngine {
    /// Ranks every member of `scope` exactly once.
    ///
    /// Lifted edges point from lower to higher ranks wherever the graph
    /// allows it; edges closing a cycle point backwards.
    fn rank(&self, scope: &ContainmentScope) -> Result<Ranks, ArchgramError>;
}

/// Creates the engine selected by `kind`.
pub(crate) fn build(kind: LayoutEngine) -> Box<dyn RankingEngine> {
    match kind {
        LayoutEngine::Basic => Box::new(basic::Engine::new()),
        LayoutEngine::Sugiyama => Box::new(sugiyama::Engine::new()),
    }
}

/// Drops ids foreign to `scope`, repeated ids and empty ranks, then appends
/// unranked members to the first rank.
fn complete_ranks(scope: &ContainmentScope, ranks: Ranks) -> Ranks {
    let mut seen = HashSet::new();
    let mut ranks: Ranks = ranks
        .into_iter()
        .map(|rank| {
            rank.into_iter()
                .filter(|&id| scope.member(id).is_some() && seen.insert(id))
                .collect()
        })
        .collect();
    ranks.retain(|rank| !rank.is_empty());

    let missing: Vec<Id> = scope
        .members()
        .map(|member| member.id())
        .filter(|id| !seen.contains(id))
        .collect();
    if !missing.is_empty() {
        trace!(count = missing.len(); "Appending unranked members to the first rank");
        match ranks.first_mut() {
            Some(first) => first.extend(missing),
            None => ranks.push(missing),
        }
    }
    ranks
}

#[cfg(test)]
pub(crate) mod test_support {
    use archgram_core::{
        identifier::Id,
        topology::{EdgeAttributes, NodeKind, Topology},
    };

    use crate::structure::{ContainmentScope, ScopeGraph};

    /// A root scope with one node per name and an edge per pair.
    pub(crate) fn root_scope(names: &[&str], edges: &[(usize, usize)]) -> (ContainmentScope, Vec<Id>) {
        let mut topology = Topology::new("Engine test");
        let ids: Vec<Id> = names
            .iter()
            .map(|name| topology.add_node(*name, NodeKind::Kubernetes, None).unwrap())
            .collect();
        for &(source, target) in edges {
            topology
                .add_edge(ids[source], ids[target], EdgeAttributes::new())
                .unwrap();
        }
        let graph = ScopeGraph::from_topology(&topology).unwrap();
        let scope = graph.scopes().last().unwrap().clone();
        (scope, ids)
    }

    pub(crate) fn rank_of(ranks: &[Vec<Id>], id: Id) -> usize {
        ranks
            .iter()
            .position(|rank| rank.contains(&id))
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::{test_support::root_scope, *};

    #[test]
    fn test_complete_ranks_appends_missing_and_drops_foreign() {
        let (scope, ids) = root_scope(&["a", "b", "c"], &[]);
        let ranks = complete_ranks(
            &scope,
            vec![vec![], vec![ids[1], Id::new("foreign"), ids[1]]],
        );
        assert_eq!(ranks, vec![vec![ids[1], ids[0], ids[2]]]);
    }

    #[test]
    fn test_complete_ranks_of_nothing() {
        let (scope, ids) = root_scope(&["a", "b"], &[]);
        assert_eq!(complete_ranks(&scope, Vec::new()), vec![vec![ids[0], ids[1]]]);
    }

    #[test]
    fn test_every_engine_ranks_each_member_once() {
        let (scope, ids) = root_scope(
            &["a", "b", "c", "d", "e"],
            &[(0, 1), (1, 2), (2, 0), (3, 4), (3, 4)],
        );
        for kind in [LayoutEngine::Basic, LayoutEngine::Sugiyama] {
            let ranks = build(kind).rank(&scope).unwrap();
            let mut flat: Vec<Id> = ranks.into_iter().flatten().collect();
            assert_eq!(flat.len(), ids.len(), "{kind:?}");
            flat.sort_by_key(|id| id.to_string());
            let mut expected = ids.clone();
            expected.sort_by_key(|id| id.to_string());
            assert_eq!(flat, expected, "{kind:?}");
        }
    }
}
