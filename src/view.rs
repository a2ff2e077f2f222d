//! View pipeline: active subset -> edges -> top-K graph -> clusters
//!
//! Invoked synchronously on every filter, threshold or K change. The vector
//! space is only borrowed.

use crate::community::{CommunityAssignment, CommunityDetector, LouvainDetector};
use crate::config::GraphConfig;
use crate::neighbor_graph::NeighborGraph;
use crate::similarity::{select_top_k, SimilarityEngine};
use crate::space::VectorSpace;
use crate::tokenizer::Term;
use crate::types::{ClusterLabel, EntityId};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// A computed view: neighbor graph plus optional cluster assignment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeView {
    pub graph: NeighborGraph,
    pub clusters: Option<CommunityAssignment>,
}

/// Node as consumed by the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadNode {
    pub id: EntityId,
}

/// Edge as consumed by the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadEdge {
    pub source: EntityId,
    pub target: EntityId,
    pub weight: f64,
    pub top_terms: Vec<Term>,
}

/// Serialisable output for the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPayload {
    pub nodes: Vec<PayloadNode>,
    pub edges: Vec<PayloadEdge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters: Option<BTreeMap<EntityId, ClusterLabel>>,
}

impl ThemeView {
    pub fn payload(&self) -> RenderPayload {
        RenderPayload {
            nodes: self
                .graph
                .nodes()
                .iter()
                .map(|id| PayloadNode { id: id.clone() })
                .collect(),
            edges: self
                .graph
                .edges()
                .iter()
                .map(|e| PayloadEdge {
                    source: e.source().clone(),
                    target: e.target().clone(),
                    weight: e.weight,
                    top_terms: e.top_terms.clone(),
                })
                .collect(),
            clusters: self
                .clusters
                .as_ref()
                .map(|c| c.iter().map(|(id, label)| (id.clone(), label)).collect()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.payload())
    }
}

/// Build the view for `active` using the default Louvain detector
pub fn build_view<I>(space: &VectorSpace, active: I, config: &GraphConfig) -> ThemeView
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let detector = LouvainDetector::new(config.louvain.to_algo_config());
    build_view_with(space, active, config, &detector)
}

/// Build the view with a caller-chosen community detector
///
/// Nodes are the active ids known to `space`, in corpus order. Unknown ids
/// are dropped silently.
pub fn build_view_with<I>(
    space: &VectorSpace,
    active: I,
    config: &GraphConfig,
    detector: &dyn CommunityDetector,
) -> ThemeView
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let requested: HashSet<String> = active.into_iter().map(|id| id.as_ref().to_string()).collect();
    let nodes: Vec<EntityId> = space
        .entity_ids()
        .filter(|id| requested.contains(id.as_str()))
        .cloned()
        .collect();

    let candidates = SimilarityEngine::new(space)
        .with_top_terms(config.top_terms)
        .with_max_postings(config.max_postings)
        .compute_edges(&nodes, config.threshold);
    let candidate_count = candidates.len();
    let edges = select_top_k(candidates, config.top_k);

    debug!(
        "View: {} nodes, {} candidate edges, {} kept (k = {})",
        nodes.len(),
        candidate_count,
        edges.len(),
        config.top_k
    );

    let graph = NeighborGraph::new(nodes, edges);
    let clusters = config.clustering.then(|| detector.detect(&graph));

    ThemeView { graph, clusters }
}
