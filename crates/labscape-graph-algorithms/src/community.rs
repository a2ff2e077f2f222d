//! Connected-component community detection
//!
//! Weakly connected components over the undirected view. Used as the cheap
//! alternative to Louvain when only "which nodes touch" matters.

use super::common::{GraphView, NodeId};
use std::collections::HashMap;

/// Result of WCC algorithm
pub struct WccResult {
    /// Map of Component ID -> List of NodeIds
    pub components: HashMap<usize, Vec<NodeId>>,
    /// Map of NodeId -> Component ID
    pub node_component: HashMap<NodeId, usize>,
}

/// Union-Find data structure
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }
}

/// Weakly Connected Components (WCC)
///
/// Component ids are dense (0..C) and numbered by the first node, in view order,
/// that belongs to each component. Isolated nodes get their own component.
pub fn weakly_connected_components(view: &GraphView) -> WccResult {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    for u_idx in 0..n {
        for &v_idx in view.neighbors(u_idx) {
            uf.union(u_idx, v_idx);
        }
    }

    let mut root_to_component: HashMap<usize, usize> = HashMap::new();
    let mut components = HashMap::new();
    let mut node_component = HashMap::with_capacity(n);

    for i in 0..n {
        let root = uf.find(i);
        let next_id = root_to_component.len();
        let component = *root_to_component.entry(root).or_insert(next_id);
        let node_id = view.index_to_node[i];

        components.entry(component).or_insert_with(Vec::new).push(node_id);
        node_component.insert(node_id, component);
    }

    WccResult {
        components,
        node_component,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wcc() {
        // Nodes: 1, 2, 3, 4, 5, 6
        // Edges: 1-2, 3-4-5, 6 (isolated)
        let view = GraphView::from_undirected_edges(
            &[1, 2, 3, 4, 5, 6],
            &[(1, 2, 1.0), (3, 4, 1.0), (4, 5, 1.0)],
        );

        let result = weakly_connected_components(&view);

        assert_eq!(result.components.len(), 3);

        let c1 = result.node_component[&1];
        let c2 = result.node_component[&2];
        assert_eq!(c1, c2);
        assert_eq!(c1, 0);

        let c3 = result.node_component[&3];
        let c4 = result.node_component[&4];
        let c5 = result.node_component[&5];
        assert_eq!(c3, c4);
        assert_eq!(c4, c5);
        assert_ne!(c1, c3);

        assert_eq!(result.node_component[&6], 2);
        assert_eq!(result.components[&2], vec![6]);
    }

    #[test]
    fn test_wcc_no_edges() {
        let view = GraphView::from_undirected_edges(&[7, 8], &[]);
        let result = weakly_connected_components(&view);
        assert_eq!(result.components.len(), 2);
        assert_ne!(result.node_component[&7], result.node_component[&8]);
    }
}
