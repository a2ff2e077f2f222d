//! Community detection over the neighbor graph
//!
//! Detection sits behind the [`CommunityDetector`] trait so the algorithm can
//! be swapped. Both implementations here delegate to
//! `labscape-graph-algorithms` through a dense [`GraphView`] whose node ids
//! are positions in the neighbor graph's node list.

use crate::neighbor_graph::NeighborGraph;
use crate::types::{ClusterLabel, EntityId};
use labscape_graph_algorithms::{
    louvain, weakly_connected_components, GraphView, LouvainConfig, NodeId as AlgoNodeId,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Mapping entity id -> cluster label for every node of a graph
///
/// Labels are dense (0..cluster_count) and numbered by first appearance in
/// the graph's node order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommunityAssignment {
    labels: BTreeMap<EntityId, ClusterLabel>,
}

impl CommunityAssignment {
    /// `membership[i]` is the raw community of `nodes[i]`
    pub fn from_membership(nodes: &[EntityId], membership: &[usize]) -> Self {
        let mut dense: HashMap<usize, usize> = HashMap::new();
        let labels = nodes
            .iter()
            .zip(membership)
            .map(|(id, &raw)| {
                let next = dense.len();
                let label = *dense.entry(raw).or_insert(next);
                (id.clone(), ClusterLabel(label))
            })
            .collect();
        CommunityAssignment { labels }
    }

    pub fn get(&self, id: &str) -> Option<ClusterLabel> {
        self.labels.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn cluster_count(&self) -> usize {
        self.labels.values().map(|l| l.0 + 1).max().unwrap_or(0)
    }

    /// Members of a cluster, sorted by id
    pub fn members(&self, label: ClusterLabel) -> Vec<&EntityId> {
        self.labels
            .iter()
            .filter(|(_, &l)| l == label)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, ClusterLabel)> {
        self.labels.iter().map(|(id, &l)| (id, l))
    }
}

/// Partitions a neighbor graph into clusters
pub trait CommunityDetector {
    /// Every node of `graph` appears exactly once in the result
    fn detect(&self, graph: &NeighborGraph) -> CommunityAssignment;
}

/// Dense algorithm view; node id = position in `graph.nodes()`
fn to_view(graph: &NeighborGraph) -> GraphView {
    let index: HashMap<&EntityId, AlgoNodeId> = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, id)| (id, i as AlgoNodeId))
        .collect();

    let nodes: Vec<AlgoNodeId> = (0..graph.node_count() as AlgoNodeId).collect();
    let edges: Vec<(AlgoNodeId, AlgoNodeId, f64)> = graph
        .edges()
        .iter()
        .filter_map(|e| {
            let u = *index.get(e.source())?;
            let v = *index.get(e.target())?;
            Some((u, v, e.weight))
        })
        .collect();

    GraphView::from_undirected_edges(&nodes, &edges)
}

fn membership_of(view: &GraphView, node_community: &HashMap<AlgoNodeId, usize>) -> Vec<usize> {
    view.index_to_node
        .iter()
        .enumerate()
        // Unassigned nodes stay singletons
        .map(|(i, node)| {
            node_community
                .get(node)
                .copied()
                .unwrap_or(node_community.len() + i)
        })
        .collect()
}

/// Louvain modularity optimisation weighted by cosine similarity
#[derive(Debug, Clone, Default)]
pub struct LouvainDetector {
    pub config: LouvainConfig,
}

impl LouvainDetector {
    pub fn new(config: LouvainConfig) -> Self {
        Self { config }
    }
}

impl CommunityDetector for LouvainDetector {
    fn detect(&self, graph: &NeighborGraph) -> CommunityAssignment {
        let view = to_view(graph);
        let result = louvain(&view, &self.config);
        debug!(
            "Louvain: {} nodes, {} edges -> {} communities (Q = {:.4}, {} levels)",
            view.node_count,
            view.edge_count(),
            result.community_count,
            result.modularity,
            result.levels
        );
        let membership = membership_of(&view, &result.node_community);
        CommunityAssignment::from_membership(graph.nodes(), &membership)
    }
}

/// Connected components: nodes joined by any surviving edge share a cluster
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentDetector;

impl CommunityDetector for ComponentDetector {
    fn detect(&self, graph: &NeighborGraph) -> CommunityAssignment {
        let view = to_view(graph);
        let result = weakly_connected_components(&view);
        CommunityAssignment::from_membership(
            graph.nodes(),
            &membership_of(&view, &result.node_component),
        )
    }
}
