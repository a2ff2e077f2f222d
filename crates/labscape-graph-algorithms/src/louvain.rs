//! Louvain community detection
//!
//! Greedy modularity optimisation on a weighted undirected graph
//! (Blondel et al. 2008). Each level runs local moving until no node
//! changes community, then collapses communities into super-nodes and
//! repeats on the aggregated graph.
//!
//! Node visiting order is the view order unless a seed is configured, in
//! which case it is shuffled once per level with a seeded RNG. Either way
//! the result is reproducible for the same input.

use super::common::{GraphView, NodeId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;

const GAIN_EPSILON: f64 = 1e-12;

/// Louvain configuration
#[derive(Debug, Clone)]
pub struct LouvainConfig {
    /// Resolution parameter gamma (1.0 = standard modularity)
    pub resolution: f64,
    /// Maximum number of aggregation levels
    pub max_levels: usize,
    /// Maximum local-moving sweeps per level
    pub max_passes: usize,
    /// Stop once a level improves modularity by less than this
    pub min_gain: f64,
    /// Shuffle node order with this seed (None = view order)
    pub seed: Option<u64>,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_levels: 10,
            max_passes: 32,
            min_gain: 1e-7,
            seed: None,
        }
    }
}

/// Result of Louvain algorithm
#[derive(Debug, Clone)]
pub struct LouvainResult {
    /// Map of NodeId -> Community ID (dense, numbered by first appearance in view order)
    pub node_community: HashMap<NodeId, usize>,
    /// Number of communities
    pub community_count: usize,
    /// Modularity of the final partition
    pub modularity: f64,
    /// Number of aggregation levels that improved the partition
    pub levels: usize,
}

/// Working graph for one level: symmetric adjacency plus self-loop weights
struct Level {
    adjacency: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
}

impl Level {
    fn from_view(view: &GraphView) -> Self {
        let adjacency = (0..view.node_count)
            .map(|i| {
                view.neighbors(i)
                    .iter()
                    .copied()
                    .zip(view.weights(i).iter().copied())
                    .collect()
            })
            .collect();

        Level {
            adjacency,
            self_loops: vec![0.0; view.node_count],
        }
    }

    fn len(&self) -> usize {
        self.adjacency.len()
    }

    fn degree(&self, i: usize) -> f64 {
        self.adjacency[i].iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self.self_loops[i]
    }

    /// Collapse each community into a single node
    fn aggregate(&self, partition: &[usize], count: usize) -> Level {
        let mut rows: Vec<HashMap<usize, f64>> = vec![HashMap::new(); count];
        let mut self_loops = vec![0.0; count];

        for i in 0..self.len() {
            let c = partition[i];
            self_loops[c] += self.self_loops[i];
            for &(j, w) in &self.adjacency[i] {
                let cj = partition[j];
                if cj == c {
                    // Internal edges are seen from both endpoints
                    self_loops[c] += w / 2.0;
                } else {
                    *rows[c].entry(cj).or_insert(0.0) += w;
                }
            }
        }

        let adjacency = rows
            .into_iter()
            .map(|row| {
                let mut row: Vec<(usize, f64)> = row.into_iter().collect();
                row.sort_by_key(|&(j, _)| j);
                row
            })
            .collect();

        Level {
            adjacency,
            self_loops,
        }
    }
}

/// Renumber labels densely by first appearance
fn relabel(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    let relabeled = labels
        .iter()
        .map(|&c| {
            let next = mapping.len();
            *mapping.entry(c).or_insert(next)
        })
        .collect();
    (relabeled, mapping.len())
}

/// Local moving phase. Returns the (dense) partition and whether any node moved.
fn local_moving(
    level: &Level,
    config: &LouvainConfig,
    rng: Option<&mut StdRng>,
) -> (Vec<usize>, bool) {
    let n = level.len();
    let degrees: Vec<f64> = (0..n).map(|i| level.degree(i)).collect();
    let m2: f64 = degrees.iter().sum();
    let mut community: Vec<usize> = (0..n).collect();

    if m2 <= 0.0 {
        return (community, false);
    }

    let mut totals = degrees.clone();
    let mut order: Vec<usize> = (0..n).collect();
    if let Some(rng) = rng {
        order.shuffle(rng);
    }

    let mut link_weights = vec![0.0; n];
    let mut seen = vec![false; n];
    let mut touched: Vec<usize> = Vec::new();
    let mut moved_any = false;

    for _ in 0..config.max_passes {
        let mut moved = 0usize;

        for &i in &order {
            let current = community[i];
            let k_i = degrees[i];

            for &(j, w) in &level.adjacency[i] {
                let c = community[j];
                if !seen[c] {
                    seen[c] = true;
                    touched.push(c);
                }
                link_weights[c] += w;
            }

            totals[current] -= k_i;

            let gain = |c: usize| link_weights[c] - config.resolution * totals[c] * k_i / m2;
            let mut best = current;
            let mut best_gain = gain(current);
            for &c in &touched {
                let g = gain(c);
                if g > best_gain + GAIN_EPSILON {
                    best = c;
                    best_gain = g;
                }
            }

            totals[best] += k_i;
            if best != current {
                community[i] = best;
                moved += 1;
            }

            for c in touched.drain(..) {
                link_weights[c] = 0.0;
                seen[c] = false;
            }
        }

        if moved == 0 {
            break;
        }
        moved_any = true;
    }

    (relabel(&community).0, moved_any)
}

/// Modularity of a partition
///
/// `membership[i]` is the community of the node at dense index `i`; it must have
/// one entry per node of the view. A graph without edges has modularity 0.
pub fn modularity(view: &GraphView, membership: &[usize], resolution: f64) -> f64 {
    let m = view.total_weight();
    if m <= 0.0 {
        return 0.0;
    }

    let count = membership.iter().max().map_or(0, |&c| c + 1);
    let mut internal = vec![0.0; count];
    let mut totals = vec![0.0; count];

    for i in 0..view.node_count {
        let c = membership[i];
        for (&j, &w) in view.neighbors(i).iter().zip(view.weights(i)) {
            totals[c] += w;
            if membership[j] == c {
                internal[c] += w;
            }
        }
    }

    let m2 = 2.0 * m;
    internal
        .iter()
        .zip(&totals)
        .map(|(&inside, &tot)| inside / m2 - resolution * (tot / m2) * (tot / m2))
        .sum()
}

/// Louvain community detection
///
/// Nodes without edges end up in singleton communities. An edgeless graph
/// yields one community per node.
pub fn louvain(view: &GraphView, config: &LouvainConfig) -> LouvainResult {
    let n = view.node_count;
    let mut membership: Vec<usize> = (0..n).collect();
    let mut current_q = modularity(view, &membership, config.resolution);
    let mut levels = 0;

    let mut rng = config.seed.map(StdRng::seed_from_u64);
    let mut level = Level::from_view(view);

    for _ in 0..config.max_levels {
        let (partition, moved) = local_moving(&level, config, rng.as_mut());
        if !moved {
            break;
        }

        let candidate: Vec<usize> = membership.iter().map(|&c| partition[c]).collect();
        let q = modularity(view, &candidate, config.resolution);
        if q <= current_q {
            break;
        }

        let gain = q - current_q;
        membership = candidate;
        current_q = q;
        levels += 1;

        if gain < config.min_gain {
            break;
        }

        let count = partition.iter().max().map_or(0, |&c| c + 1);
        level = level.aggregate(&partition, count);
    }

    let (membership, community_count) = relabel(&membership);
    let node_community = membership
        .iter()
        .enumerate()
        .map(|(i, &c)| (view.index_to_node[i], c))
        .collect();

    LouvainResult {
        node_community,
        community_count,
        modularity: current_q,
        levels,
    }
}
