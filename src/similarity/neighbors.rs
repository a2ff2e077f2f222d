//! Top-K neighbor selection
//!
//! Every node ranks its incident edges by weight (descending, ties by pair
//! key) and keeps the first K. An edge survives when either endpoint kept
//! it, so a node can end up with more than K edges when it appears in other
//! nodes' top-K lists, but no node loses its own K strongest neighbors.
//!
//! The cutoff is inclusive: an edge whose weight equals the K-th weight at
//! both endpoints survives even if the pair-key order pushed it out of both
//! lists.

use super::edge::SimilarityEdge;
use crate::types::{EntityId, PairKey};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

fn rank_order(a: &SimilarityEdge, b: &SimilarityEdge) -> Ordering {
    b.weight.total_cmp(&a.weight).then_with(|| a.key.cmp(&b.key))
}

/// Per-node incident edges, strongest first, as indices into `edges`
///
/// Repeated pair keys only count once (first occurrence).
fn ranked_incidence(edges: &[SimilarityEdge], k: usize) -> BTreeMap<&EntityId, Vec<usize>> {
    let mut by_node: BTreeMap<&EntityId, Vec<usize>> = BTreeMap::new();
    if k == 0 {
        return by_node;
    }

    let mut seen: HashSet<&PairKey> = HashSet::with_capacity(edges.len());
    for (i, edge) in edges.iter().enumerate() {
        if !seen.insert(&edge.key) {
            continue;
        }
        by_node.entry(edge.source()).or_default().push(i);
        by_node.entry(edge.target()).or_default().push(i);
    }

    for incident in by_node.values_mut() {
        incident.sort_by(|&x, &y| rank_order(&edges[x], &edges[y]));
    }

    by_node
}

/// The edges each node keeps for itself, strongest first
pub fn rank_neighbors(edges: &[SimilarityEdge], k: usize) -> BTreeMap<EntityId, Vec<PairKey>> {
    ranked_incidence(edges, k)
        .into_iter()
        .map(|(node, ranked)| {
            let keys = ranked.into_iter().take(k).map(|i| edges[i].key.clone()).collect();
            (node.clone(), keys)
        })
        .collect()
}

/// Indices of the edges surviving the union and inclusive-cutoff rules
fn kept_indices(edges: &[SimilarityEdge], k: usize) -> HashSet<usize> {
    let ranked = ranked_incidence(edges, k);

    let mut keep: HashSet<usize> = HashSet::new();
    // Weight of the k-th edge, for nodes with more than k candidates
    let mut cutoff: BTreeMap<&EntityId, f64> = BTreeMap::new();
    let mut overflow: Vec<usize> = Vec::new();
    for (&node, incident) in &ranked {
        keep.extend(incident.iter().take(k));
        if incident.len() > k {
            cutoff.insert(node, edges[incident[k - 1]].weight);
            overflow.extend(&incident[k..]);
        }
    }

    for i in overflow {
        let edge = &edges[i];
        let ties = |node: &EntityId| cutoff.get(node) == Some(&edge.weight);
        if ties(edge.source()) && ties(edge.target()) {
            keep.insert(i);
        }
    }

    keep
}

/// Keep the union of every node's top-k edges
///
/// The result is a subset of `edges` in their original order, with at most
/// one edge per pair key. `k == 0` yields no edges.
pub fn select_top_k(edges: Vec<SimilarityEdge>, k: usize) -> Vec<SimilarityEdge> {
    let keep = kept_indices(&edges, k);

    edges
        .into_iter()
        .enumerate()
        .filter(|(i, _)| keep.contains(i))
        .map(|(_, edge)| edge)
        .collect()
}
