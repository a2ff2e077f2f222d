//! Record filtering: narrows the corpus to the active subset of a view
//!
//! A lab passes when it matches the free-text query, carries at least one of
//! the selected ERC panels, at least one of the selected HCERES domains, and
//! contains every requested keyword. Empty criteria accept everything.
//! Matching is case-insensitive substring matching over
//! [`LabRecord::search_corpus`].

use crate::record::LabRecord;
use crate::types::EntityId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

/// Filter criteria for one view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabFilter {
    /// Free text; every word must occur in the search corpus
    pub query: String,
    /// Every keyword must occur in the search corpus
    pub keywords: Vec<String>,
    /// Any-of over the lab's ERC panels (exact values)
    pub erc: Vec<String>,
    /// Any-of over the lab's HCERES domains (exact values)
    pub hceres: Vec<String>,
}

fn any_of(selected: &[String], values: &[String]) -> bool {
    selected.is_empty() || selected.iter().any(|s| values.contains(s))
}

fn contains_all<'a>(haystack: &str, needles: impl IntoIterator<Item = &'a str>) -> bool {
    let haystack = haystack.to_lowercase();
    needles
        .into_iter()
        .all(|needle| haystack.contains(&needle.to_lowercase()))
}

impl LabFilter {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
            && self.keywords.iter().all(|k| k.trim().is_empty())
            && self.erc.is_empty()
            && self.hceres.is_empty()
    }

    pub fn matches(&self, record: &LabRecord) -> bool {
        if !any_of(&self.erc, &record.erc) || !any_of(&self.hceres, &record.hceres) {
            return false;
        }
        let words = self.query.split_whitespace();
        let keywords = self
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty());
        let mut needles = words.chain(keywords).peekable();
        needles.peek().is_none() || contains_all(&record.search_corpus(), needles)
    }

    /// Ids of the matching records, in record order
    pub fn apply(&self, records: &[LabRecord]) -> Vec<EntityId> {
        let active: Vec<EntityId> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches(r))
            .map(|(i, r)| r.entity_id(i))
            .collect();
        debug!("Filter kept {} of {} labs", active.len(), records.len());
        active
    }
}

/// Split a comma-separated keyword list, dropping blanks
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Selectable values for the ERC and HCERES filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub erc: Vec<String>,
    pub hceres: Vec<String>,
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'â' | 'ä' => 'a',
        'ç' => 'c',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' => 'i',
        'ô' | 'ö' => 'o',
        'ù' | 'û' | 'ü' => 'u',
        'ÿ' => 'y',
        'ñ' => 'n',
        other => other,
    }
}

/// French-friendly ordering: accents and case only break ties
fn collate(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| -> String { s.to_lowercase().chars().map(fold_accent).collect() };
    folded(a).cmp(&folded(b)).then_with(|| a.cmp(b))
}

fn sorted_unique<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut unique: Vec<String> = values.cloned().collect::<BTreeSet<_>>().into_iter().collect();
    unique.sort_by(|a, b| collate(a, b));
    unique
}

/// Every distinct ERC and HCERES value across the corpus, sorted
pub fn facets(records: &[LabRecord]) -> Facets {
    Facets {
        erc: sorted_unique(records.iter().flat_map(|r| r.erc.iter())),
        hceres: sorted_unique(records.iter().flat_map(|r| r.hceres.iter())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab(
        code: &str,
        name: &str,
        erc: &[&str],
        hceres: &[&str],
        keywords: &[&str],
    ) -> LabRecord {
        let owned = |v: &[&str]| -> Vec<String> { v.iter().map(|s| s.to_string()).collect() };
        LabRecord {
            code: code.into(),
            name: name.into(),
            erc: owned(erc),
            hceres: owned(hceres),
            keywords: owned(keywords),
            ..LabRecord::default()
        }
    }

    fn corpus() -> Vec<LabRecord> {
        vec![
            lab("LIRMM", "Robotique et microélectronique", &["PE6"], &["ST6"], &["vision"]),
            lab("MARBEC", "Biodiversité marine", &["LS8"], &["SVE2"], &["océan", "pêche"]),
            lab("", "Unité sans code", &["PE6", "LS8"], &[], &["climat"]),
        ]
    }

    fn ids(list: &[EntityId]) -> Vec<&str> {
        list.iter().map(EntityId::as_str).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = LabFilter::default();
        assert!(filter.is_empty());
        assert_eq!(ids(&filter.apply(&corpus())), vec!["LIRMM", "MARBEC", "lab_2"]);
    }

    #[test]
    fn test_query_words_all_required() {
        let filter = LabFilter {
            query: "biodiversité MARINE".into(),
            ..LabFilter::default()
        };
        assert_eq!(ids(&filter.apply(&corpus())), vec!["MARBEC"]);

        let filter = LabFilter {
            query: "marine vision".into(),
            ..LabFilter::default()
        };
        assert!(filter.apply(&corpus()).is_empty());
    }

    #[test]
    fn test_query_matches_code_prefix() {
        let filter = LabFilter {
            query: "lirm".into(),
            ..LabFilter::default()
        };
        assert_eq!(ids(&filter.apply(&corpus())), vec!["LIRMM"]);
    }

    #[test]
    fn test_erc_any_of() {
        let filter = LabFilter {
            erc: vec!["LS8".into(), "PE1".into()],
            ..LabFilter::default()
        };
        assert_eq!(ids(&filter.apply(&corpus())), vec!["MARBEC", "lab_2"]);
    }

    #[test]
    fn test_hceres_any_of() {
        let filter = LabFilter {
            hceres: vec!["ST6".into()],
            ..LabFilter::default()
        };
        assert_eq!(ids(&filter.apply(&corpus())), vec!["LIRMM"]);
    }

    #[test]
    fn test_keywords_all_required() {
        let filter = LabFilter {
            keywords: parse_keywords("Océan, pêche ,"),
            ..LabFilter::default()
        };
        assert_eq!(filter.keywords, vec!["Océan", "pêche"]);
        assert_eq!(ids(&filter.apply(&corpus())), vec!["MARBEC"]);

        let filter = LabFilter {
            keywords: vec!["océan".into(), "vision".into()],
            ..LabFilter::default()
        };
        assert!(filter.apply(&corpus()).is_empty());
    }

    #[test]
    fn test_criteria_combine() {
        let filter = LabFilter {
            erc: vec!["PE6".into()],
            keywords: vec!["climat".into()],
            ..LabFilter::default()
        };
        assert!(!filter.is_empty());
        assert_eq!(ids(&filter.apply(&corpus())), vec!["lab_2"]);
    }

    #[test]
    fn test_facets_sorted_unique() {
        let mut records = corpus();
        records.push(lab("X", "", &["écologie", "Energie"], &["ST6"], &[]));
        let facets = facets(&records);
        assert_eq!(facets.erc, vec!["écologie", "Energie", "LS8", "PE6"]);
        assert_eq!(facets.hceres, vec!["ST6", "SVE2"]);
    }

    #[test]
    fn test_facets_empty_corpus() {
        assert_eq!(facets(&[]), Facets::default());
    }
}
