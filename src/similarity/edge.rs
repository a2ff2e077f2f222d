//! Similarity edge type

use crate::tokenizer::Term;
use crate::types::{EntityId, PairKey};
use serde::Serialize;

/// Undirected edge between two entities weighted by cosine similarity
///
/// Ephemeral: recomputed for every change of active set, threshold or K.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityEdge {
    pub key: PairKey,
    /// Cosine similarity in [0, 1]
    pub weight: f64,
    /// Shared terms with the largest weight products, strongest first
    pub top_terms: Vec<Term>,
}

impl SimilarityEdge {
    pub fn new(key: PairKey, weight: f64, top_terms: Vec<Term>) -> Self {
        SimilarityEdge {
            key,
            weight,
            top_terms,
        }
    }

    pub fn source(&self) -> &EntityId {
        self.key.low()
    }

    pub fn target(&self) -> &EntityId {
        self.key.high()
    }
}
