//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of an undirected weighted graph for algorithm execution.

use std::collections::HashMap;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of an undirected graph using Compressed Sparse Row (CSR) format.
///
/// Every undirected edge `{u, v}` is stored twice, once in the row of `u` and once in the
/// row of `v`, so `neighbors(i)` is the full neighborhood of `i`. Self-loops are not stored.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Offsets into `targets`. Size = node_count + 1
    pub offsets: Vec<usize>,
    /// Contiguous array of neighbor indices
    pub targets: Vec<usize>,
    /// Edge weights: aligned with `targets`
    pub weights: Vec<f64>,
}

impl GraphView {
    /// Number of neighbors of a node (by index)
    pub fn degree(&self, idx: usize) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Neighbors of a node
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.targets[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Weights aligned with `neighbors(idx)`
    pub fn weights(&self, idx: usize) -> &[f64] {
        &self.weights[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Sum of the weights of edges incident to a node
    pub fn weighted_degree(&self, idx: usize) -> f64 {
        self.weights(idx).iter().sum()
    }

    /// Total undirected edge weight `m` (each edge counted once)
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum::<f64>() / 2.0
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.targets.len() / 2
    }

    /// Build a view from a node list and undirected weighted edges.
    ///
    /// Edges touching unknown nodes and self-loops are ignored. Parallel edges are merged
    /// by summing their weights. Rows keep the node order of `nodes`; neighbors within a
    /// row are sorted by index.
    pub fn from_undirected_edges(nodes: &[NodeId], edges: &[(NodeId, NodeId, f64)]) -> Self {
        let node_count = nodes.len();
        let index_to_node = nodes.to_vec();
        let mut node_to_index = HashMap::with_capacity(node_count);
        for (i, &id) in index_to_node.iter().enumerate() {
            node_to_index.entry(id).or_insert(i);
        }

        let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); node_count];
        for &(u, v, w) in edges {
            let (Some(&ui), Some(&vi)) = (node_to_index.get(&u), node_to_index.get(&v)) else {
                continue;
            };
            if ui == vi {
                continue;
            }
            rows[ui].push((vi, w));
            rows[vi].push((ui, w));
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut targets = Vec::new();
        let mut weights = Vec::new();
        offsets.push(0);
        for mut row in rows {
            row.sort_by_key(|&(j, _)| j);
            let row_start = targets.len();
            for (j, w) in row {
                if targets.len() > row_start && targets.last() == Some(&j) {
                    if let Some(acc) = weights.last_mut() {
                        *acc += w;
                    }
                } else {
                    targets.push(j);
                    weights.push(w);
                }
            }
            offsets.push(targets.len());
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            offsets,
            targets,
            weights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_undirected_edges_symmetric() {
        let edges = [(10, 20, 0.5), (20, 30, 0.25)];
        let view = GraphView::from_undirected_edges(&[10, 20, 30], &edges);

        assert_eq!(view.node_count, 3);
        assert_eq!(view.edge_count(), 2);
        assert_eq!(view.neighbors(0), &[1]);
        assert_eq!(view.neighbors(1), &[0, 2]);
        assert_eq!(view.weights(1), &[0.5, 0.25]);
        assert!((view.total_weight() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_edges_merged_and_loops_dropped() {
        let view = GraphView::from_undirected_edges(
            &[1, 2],
            &[(1, 2, 0.5), (2, 1, 0.25), (1, 1, 9.0), (1, 99, 1.0)],
        );

        assert_eq!(view.edge_count(), 1);
        assert_eq!(view.degree(0), 1);
        assert!((view.weighted_degree(0) - 0.75).abs() < 1e-12);
        assert!((view.weighted_degree(1) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_empty_view() {
        let view = GraphView::from_undirected_edges(&[], &[]);
        assert_eq!(view.node_count, 0);
        assert_eq!(view.offsets, vec![0]);
        assert_eq!(view.total_weight(), 0.0);
    }
}
