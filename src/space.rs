//! TF-IDF vector space
//!
//! Built once per corpus and read-only afterwards. Holds the document
//! frequency and IDF tables, one weight vector per entity and the inverted
//! index used by the similarity engine.
//!
//! Weighting:
//! - `idf(t) = ln((N + 1) / (df(t) + 1)) + 1` (smoothed, always > 0)
//! - `w(t, d) = (1 + ln(tf(t, d))) * idf(t)` (log-dampened term frequency)

use crate::tokenizer::{tokenize, Term};
use crate::types::{Entity, EntityId};
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use tracing::{info, warn};

/// Smoothed inverse document frequency for a term seen in `df` of `n` documents
pub fn smoothed_idf(n: usize, df: usize) -> f64 {
    ((n as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0
}

/// Log-dampened term frequency factor
pub fn dampened_tf(tf: usize) -> f64 {
    1.0 + (tf as f64).ln()
}

/// Cosine from a dot product and two norms, snapped to 1.0 within rounding error
pub(crate) fn unit_cosine(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    let cosine = dot / (norm_a * norm_b);
    if cosine >= 1.0 - 1e-12 {
        1.0
    } else {
        cosine
    }
}

/// TF-IDF weights of one entity plus their Euclidean norm
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityVector {
    weights: IndexMap<Term, f64>,
    norm: f64,
}

impl EntityVector {
    pub fn weight(&self, term: &str) -> Option<f64> {
        self.weights.get(term).copied()
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// An entity without terms has norm 0 and never forms edges
    pub fn is_zero(&self) -> bool {
        self.norm == 0.0
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Terms in first-occurrence order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(t, &w)| (t.as_str(), w))
    }

    pub fn dot(&self, other: &EntityVector) -> f64 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .filter_map(|(t, &w)| large.weights.get(t).map(|&v| w * v))
            .sum()
    }
}

/// One entry of a posting list: dense entity index and the term's weight in that entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posting {
    pub doc: usize,
    pub weight: f64,
}

/// Immutable TF-IDF index over a corpus
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorSpace {
    /// Entity ids in corpus order; position is the dense doc index
    entities: IndexSet<EntityId>,
    /// Aligned with `entities`
    vectors: Vec<EntityVector>,
    doc_freq: IndexMap<Term, usize>,
    idf: IndexMap<Term, f64>,
    inverted: IndexMap<Term, Vec<Posting>>,
}

impl VectorSpace {
    /// Build the vector space for a corpus
    ///
    /// Total for any input: entities with empty or unusable text get a zero
    /// vector. When an id occurs more than once only the first occurrence is
    /// indexed.
    pub fn build(entities: &[Entity]) -> Self {
        let mut ids: IndexSet<EntityId> = IndexSet::with_capacity(entities.len());
        let mut corpus: Vec<&Entity> = Vec::with_capacity(entities.len());
        for entity in entities {
            if ids.insert(entity.id.clone()) {
                corpus.push(entity);
            } else {
                warn!("Duplicate entity id {} ignored", entity.id);
            }
        }

        let tokens: Vec<Vec<Term>> = corpus.par_iter().map(|e| tokenize(&e.text)).collect();

        // Document frequency over unique terms per entity
        let mut doc_freq: IndexMap<Term, usize> = IndexMap::new();
        for doc_tokens in &tokens {
            let unique: IndexSet<&Term> = doc_tokens.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let n = corpus.len();
        let idf: IndexMap<Term, f64> = doc_freq
            .iter()
            .map(|(term, &df)| (term.clone(), smoothed_idf(n, df)))
            .collect();

        let mut vectors = Vec::with_capacity(n);
        let mut inverted: IndexMap<Term, Vec<Posting>> = IndexMap::new();

        for (doc, doc_tokens) in tokens.into_iter().enumerate() {
            let mut tf: IndexMap<Term, usize> = IndexMap::new();
            for term in doc_tokens {
                *tf.entry(term).or_insert(0) += 1;
            }

            let mut weights = IndexMap::with_capacity(tf.len());
            let mut norm2 = 0.0;
            for (term, count) in tf {
                let Some(&term_idf) = idf.get(&term) else {
                    continue;
                };
                let weight = dampened_tf(count) * term_idf;
                norm2 += weight * weight;
                inverted
                    .entry(term.clone())
                    .or_default()
                    .push(Posting { doc, weight });
                weights.insert(term, weight);
            }

            vectors.push(EntityVector {
                weights,
                norm: norm2.sqrt(),
            });
        }

        info!("Built vector space: {} entities, {} terms", n, idf.len());

        VectorSpace {
            entities: ids,
            vectors,
            doc_freq,
            idf,
            inverted,
        }
    }

    /// Number of indexed entities (N)
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of distinct terms
    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    pub fn doc_freq(&self, term: &str) -> Option<usize> {
        self.doc_freq.get(term).copied()
    }

    pub fn vector(&self, id: &str) -> Option<&EntityVector> {
        self.entities.get_index_of(id).map(|doc| &self.vectors[doc])
    }

    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.inverted.get(term).map(Vec::as_slice)
    }

    /// Dense index of an entity
    pub fn doc_index(&self, id: &str) -> Option<usize> {
        self.entities.get_index_of(id)
    }

    pub fn entity_id(&self, doc: usize) -> Option<&EntityId> {
        self.entities.get_index(doc)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains(id)
    }

    /// Entity ids in corpus order
    pub fn entity_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.entities.iter()
    }

    pub(crate) fn vector_at(&self, doc: usize) -> &EntityVector {
        &self.vectors[doc]
    }

    /// Term at a position of the inverted index
    pub(crate) fn term_at(&self, term_index: usize) -> Option<&Term> {
        self.inverted.get_index(term_index).map(|(t, _)| t)
    }

    /// Inverted index in first-occurrence term order
    pub fn inverted_index(&self) -> impl Iterator<Item = (&str, &[Posting])> {
        self.inverted.iter().map(|(t, p)| (t.as_str(), p.as_slice()))
    }

    /// Direct cosine similarity between two entities (0 if unknown or zero vector)
    pub fn cosine(&self, a: &str, b: &str) -> f64 {
        let (Some(da), Some(db)) = (self.doc_index(a), self.doc_index(b)) else {
            return 0.0;
        };
        // Fixed operand order keeps the float summation identical both ways
        let (va, vb) = (self.vector_at(da.min(db)), self.vector_at(da.max(db)));
        if va.is_zero() || vb.is_zero() {
            return 0.0;
        }
        unit_cosine(va.dot(vb), va.norm(), vb.norm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Entity> {
        vec![
            Entity::new("A", "vision robotics"),
            Entity::new("B", "robotics control"),
            Entity::new("C", "vision robotics control"),
        ]
    }

    #[test]
    fn test_idf_values() {
        let space = VectorSpace::build(&corpus());

        assert_eq!(space.len(), 3);
        assert_eq!(space.doc_freq("robotics"), Some(3));
        assert_eq!(space.doc_freq("vision"), Some(2));
        assert_eq!(space.idf("vision"), space.idf("control"));
        assert!(space.idf("robotics").unwrap() < space.idf("vision").unwrap());
        // Term in every document still weighs 1
        assert!((space.idf("robotics").unwrap() - 1.0).abs() < 1e-12);
        assert!(space.idf("unknown").is_none());
    }

    #[test]
    fn test_idf_monotonic_in_df() {
        for n in [1usize, 5, 100] {
            for df in 0..n {
                assert!(smoothed_idf(n, df) > smoothed_idf(n, df + 1));
                assert!(smoothed_idf(n, df + 1) > 0.0);
            }
        }
    }

    #[test]
    fn test_term_frequency_is_dampened() {
        let space = VectorSpace::build(&[
            Entity::new("A", "graph graph graph"),
            Entity::new("B", "graph theory"),
        ]);
        let idf = space.idf("graph").unwrap();
        let w = space.vector("A").unwrap().weight("graph").unwrap();
        assert!((w - (1.0 + 3f64.ln()) * idf).abs() < 1e-12);
        assert!((space.vector("A").unwrap().norm() - w).abs() < 1e-12);
    }

    #[test]
    fn test_empty_text_gives_zero_vector() {
        let space = VectorSpace::build(&[
            Entity::new("A", "vision"),
            Entity::new("E", "  ; "),
        ]);
        let v = space.vector("E").unwrap();
        assert!(v.is_zero());
        assert!(v.is_empty());
        assert_eq!(space.cosine("A", "E"), 0.0);
    }

    #[test]
    fn test_inverted_index_matches_vectors() {
        let space = VectorSpace::build(&corpus());

        for (term, postings) in space.inverted_index() {
            for p in postings {
                let id = space.entity_id(p.doc).unwrap();
                assert_eq!(space.vector(id.as_str()).unwrap().weight(term), Some(p.weight));
            }
            let holders = space
                .entity_ids()
                .filter(|id| space.vector(id.as_str()).unwrap().weight(term).is_some())
                .count();
            assert_eq!(holders, postings.len());
        }
        assert_eq!(space.postings("robotics").unwrap().len(), 3);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let space = VectorSpace::build(&[
            Entity::new("A", "alpha"),
            Entity::new("A", "beta"),
        ]);
        assert_eq!(space.len(), 1);
        assert!(space.vector("A").unwrap().weight("alpha").is_some());
        assert!(space.idf("beta").is_none());
    }

    #[test]
    fn test_empty_corpus() {
        let space = VectorSpace::build(&[]);
        assert!(space.is_empty());
        assert_eq!(space.vocabulary_size(), 0);
    }

    #[test]
    fn test_cosine_is_symmetric() {
        let space = VectorSpace::build(&corpus());
        assert_eq!(space.cosine("A", "C"), space.cosine("C", "A"));
        assert!(space.cosine("A", "C") > space.cosine("A", "B"));
        assert_eq!(space.cosine("A", "missing"), 0.0);
    }
}
