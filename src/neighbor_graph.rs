//! Neighbor graph: active nodes plus the pruned similarity edges

use crate::similarity::SimilarityEdge;
use crate::tokenizer::Term;
use crate::types::EntityId;
use serde::Serialize;
use std::collections::HashSet;

/// A neighbor of a node, as listed in a detail panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub id: EntityId,
    pub weight: f64,
    pub top_terms: Vec<Term>,
}

/// Nodes and top-K pruned edges for one view
///
/// Ephemeral: rebuilt on every view change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeighborGraph {
    nodes: Vec<EntityId>,
    edges: Vec<SimilarityEdge>,
}

impl NeighborGraph {
    /// Duplicate node ids are collapsed, keeping the first position
    pub fn new(nodes: Vec<EntityId>, edges: Vec<SimilarityEdge>) -> Self {
        let mut seen = HashSet::with_capacity(nodes.len());
        let nodes = nodes
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        NeighborGraph { nodes, edges }
    }

    pub fn nodes(&self) -> &[EntityId] {
        &self.nodes
    }

    pub fn edges(&self) -> &[SimilarityEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of surviving edges touching `id`
    pub fn degree(&self, id: &str) -> usize {
        self.edges.iter().filter(|e| e.key.contains(id)).count()
    }

    /// Neighbors of `id`, strongest first (ties by neighbor id)
    pub fn neighbors_of(&self, id: &str) -> Vec<Neighbor> {
        let mut out: Vec<Neighbor> = self
            .edges
            .iter()
            .filter_map(|e| {
                e.key.other(id).map(|other| Neighbor {
                    id: other.clone(),
                    weight: e.weight,
                    top_terms: e.top_terms.clone(),
                })
            })
            .collect();
        out.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.id.cmp(&b.id)));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PairKey;

    fn graph() -> NeighborGraph {
        let edge = |a: &str, b: &str, w: f64| {
            SimilarityEdge::new(PairKey::new(a.into(), b.into()), w, vec![format!("{a}{b}")])
        };
        NeighborGraph::new(
            vec!["a".into(), "b".into(), "c".into(), "d".into(), "a".into()],
            vec![edge("a", "b", 0.4), edge("c", "a", 0.7)],
        )
    }

    #[test]
    fn test_neighbors_sorted_by_weight() {
        let g = graph();
        let n = g.neighbors_of("a");
        assert_eq!(n.len(), 2);
        assert_eq!(n[0].id.as_str(), "c");
        assert_eq!(n[0].top_terms, vec!["ca"]);
        assert_eq!(n[1].id.as_str(), "b");
    }

    #[test]
    fn test_unknown_or_isolated_node() {
        let g = graph();
        assert!(g.neighbors_of("zzz").is_empty());
        assert!(g.neighbors_of("d").is_empty());
        assert_eq!(g.degree("d"), 0);
        assert_eq!(g.degree("a"), 2);
    }

    #[test]
    fn test_duplicate_nodes_collapsed() {
        assert_eq!(graph().node_count(), 4);
    }
}
