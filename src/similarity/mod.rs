//! Pairwise similarity and sparse neighbor selection
//!
//! The engine turns an active subset of the corpus into thresholded cosine
//! edges using the inverted index; the selector prunes them to at most K
//! strongest edges per node (union of both endpoints' choices).

pub mod edge;
pub mod engine;
pub mod neighbors;

pub use edge::SimilarityEdge;
pub use engine::{compute_edges, SimilarityEngine, DEFAULT_TOP_TERMS};
pub use neighbors::{rank_neighbors, select_top_k};
