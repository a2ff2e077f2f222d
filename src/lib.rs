//! Labscape thematic similarity engine
//!
//! Explores a collection of research-lab records by thematic similarity:
//! a TF-IDF vector space over each lab's keyword/domain text, inverted-index
//! cosine similarity over any active subset, a sparse top-K neighbor graph
//! and optional Louvain clustering for grouping.
//!
//! # Pipeline
//!
//! - [`filter`]: query, keyword and facet filters that pick the active subset
//! - [`tokenizer`]: raw text -> index terms
//! - [`space`]: document frequencies, smoothed IDF, TF-IDF vectors, inverted index
//!   (built once per corpus, immutable)
//! - [`similarity`]: thresholded cosine edges for an active subset, top-K pruning
//! - [`community`]: pluggable community detection (Louvain, connected components)
//! - [`view`]: the whole chain for one view, plus the render payload
//! - [`worker`]: background recomputation where the newest request wins
//!
//! ## Example Usage
//!
//! ```rust
//! use labscape::{build_view, Entity, GraphConfig, VectorSpace};
//!
//! let space = VectorSpace::build(&[
//!     Entity::new("A", "vision robotics"),
//!     Entity::new("B", "robotics control"),
//!     Entity::new("C", "vision robotics control"),
//! ]);
//!
//! let config = GraphConfig { threshold: 0.0, top_k: 2, ..GraphConfig::default() };
//! let view = build_view(&space, ["A", "B", "C"], &config);
//!
//! assert_eq!(view.graph.node_count(), 3);
//! assert_eq!(view.graph.edge_count(), 3);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod community;
pub mod config;
pub mod filter;
pub mod neighbor_graph;
pub mod record;
pub mod similarity;
pub mod space;
pub mod tokenizer;
pub mod types;
pub mod view;
pub mod worker;

// Re-export main types for convenience
pub use community::{CommunityAssignment, CommunityDetector, ComponentDetector, LouvainDetector};
pub use config::{ConfigError, ConfigResult, GraphConfig, LouvainSettings};
pub use filter::{facets, parse_keywords, Facets, LabFilter};
pub use neighbor_graph::{Neighbor, NeighborGraph};
pub use record::{parse_records, records_to_entities, split_multi, LabRecord, RecordError};
pub use similarity::{compute_edges, rank_neighbors, select_top_k, SimilarityEdge, SimilarityEngine};
pub use space::{EntityVector, Posting, VectorSpace};
pub use tokenizer::{tokenize, Term};
pub use types::{ClusterLabel, Entity, EntityId, PairKey};
pub use view::{build_view, build_view_with, RenderPayload, ThemeView};
pub use worker::{ViewWorker, WorkerError};

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
