//! Inverted-index cosine similarity
//!
//! Instead of comparing every pair of active entities over the whole
//! vocabulary, each term's posting list is filtered to the active set and
//! every pair inside it gets `w_a * w_b` added to its dot product. Cost is
//! `sum over terms of (active postings)^2`, dominated by rare high-IDF terms
//! for keyword corpora. Very common terms can be skipped with a posting cap.

use super::edge::SimilarityEdge;
use crate::space::{unit_cosine, Posting, VectorSpace};
use crate::types::PairKey;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Number of shared terms kept per edge for explanations
pub const DEFAULT_TOP_TERMS: usize = 8;

#[derive(Default)]
struct PairAccumulator {
    dot: f64,
    /// (term index in the inverted index, weight product)
    contributions: Vec<(usize, f64)>,
}

/// Computes thresholded similarity edges over a prebuilt vector space
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEngine<'a> {
    space: &'a VectorSpace,
    top_terms: usize,
    max_postings: Option<usize>,
}

impl<'a> SimilarityEngine<'a> {
    pub fn new(space: &'a VectorSpace) -> Self {
        Self {
            space,
            top_terms: DEFAULT_TOP_TERMS,
            max_postings: None,
        }
    }

    /// How many contributing terms to keep per edge (0 disables tracking)
    pub fn with_top_terms(mut self, top_terms: usize) -> Self {
        self.top_terms = top_terms;
        self
    }

    /// Skip terms whose active posting list is longer than `cap`
    pub fn with_max_postings(mut self, cap: Option<usize>) -> Self {
        self.max_postings = cap;
        self
    }

    /// Dense membership mask; unknown ids are ignored
    fn active_mask<I>(&self, active: I) -> Vec<bool>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut mask = vec![false; self.space.len()];
        for id in active {
            if let Some(doc) = self.space.doc_index(id.as_ref()) {
                mask[doc] = true;
            }
        }
        mask
    }

    /// Edges between active entities with cosine similarity `>= threshold`
    ///
    /// Edges are returned sorted by pair key. Pairs involving a zero vector
    /// never appear. `threshold` is expected in [0, 1].
    pub fn compute_edges<I>(&self, active: I, threshold: f64) -> Vec<SimilarityEdge>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mask = self.active_mask(active);
        let active_count = mask.iter().filter(|&&on| on).count();
        if active_count < 2 {
            return Vec::new();
        }

        let mut pairs: FxHashMap<(usize, usize), PairAccumulator> = FxHashMap::default();
        let mut filtered: Vec<Posting> = Vec::new();
        let mut skipped_terms = 0usize;

        for (term_index, (_, postings)) in self.space.inverted_index().enumerate() {
            filtered.clear();
            filtered.extend(postings.iter().filter(|p| mask[p.doc]).copied());
            if filtered.len() < 2 {
                continue;
            }
            if self.max_postings.is_some_and(|cap| filtered.len() > cap) {
                skipped_terms += 1;
                continue;
            }

            // Postings are in ascending doc order, so (a.doc, b.doc) is canonical
            for (i, a) in filtered.iter().enumerate() {
                for b in &filtered[i + 1..] {
                    let contribution = a.weight * b.weight;
                    let acc = pairs.entry((a.doc, b.doc)).or_default();
                    acc.dot += contribution;
                    if self.top_terms > 0 {
                        acc.contributions.push((term_index, contribution));
                    }
                }
            }
        }

        if skipped_terms > 0 {
            debug!(
                "Skipped {} terms exceeding the posting cap {:?}",
                skipped_terms, self.max_postings
            );
        }

        let candidate_pairs = pairs.len();
        let mut edges = Vec::new();
        for ((a, b), acc) in pairs {
            let norm_a = self.space.vector_at(a).norm();
            let norm_b = self.space.vector_at(b).norm();
            if norm_a == 0.0 || norm_b == 0.0 {
                continue;
            }

            let similarity = unit_cosine(acc.dot, norm_a, norm_b);
            if similarity < threshold {
                continue;
            }

            let (Some(id_a), Some(id_b)) = (self.space.entity_id(a), self.space.entity_id(b)) else {
                continue;
            };

            edges.push(SimilarityEdge::new(
                PairKey::new(id_a.clone(), id_b.clone()),
                similarity,
                self.top_terms_of(acc.contributions),
            ));
        }

        edges.sort_by(|x, y| x.key.cmp(&y.key));

        debug!(
            "Similarity over {} active entities: {} candidate pairs, {} edges at threshold {}",
            active_count,
            candidate_pairs,
            edges.len(),
            threshold
        );

        edges
    }

    fn top_terms_of(&self, mut contributions: Vec<(usize, f64)>) -> Vec<String> {
        contributions.sort_by(|x, y| y.1.total_cmp(&x.1).then(x.0.cmp(&y.0)));
        contributions
            .into_iter()
            .take(self.top_terms)
            .filter_map(|(term_index, _)| self.space.term_at(term_index).cloned())
            .collect()
    }
}

/// Edges among `active` with default engine settings
pub fn compute_edges<I>(space: &VectorSpace, active: I, threshold: f64) -> Vec<SimilarityEdge>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    SimilarityEngine::new(space).compute_edges(active, threshold)
}
