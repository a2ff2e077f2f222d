//! Lab records at the ingestion boundary
//!
//! Row parsing happens upstream. This module only turns already-parsed lab
//! records into [`Entity`] values so the core never looks at raw field names.

use crate::types::{Entity, EntityId};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Record loading errors
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RecordResult<T> = Result<T, RecordError>;

/// Split a pipe-separated multi-value cell: `"a | b ||c"` -> `["a", "b", "c"]`
pub fn split_multi(value: &str) -> Vec<String> {
    value
        .trim_start_matches('\u{feff}')
        .split('|')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MultiValue {
    Joined(String),
    List(Vec<String>),
}

fn multi_value<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<MultiValue>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(MultiValue::Joined(s)) => split_multi(&s),
        Some(MultiValue::List(items)) => items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// One research lab as delivered by the record source
///
/// Multi-valued fields accept a JSON array or a pipe-separated string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabRecord {
    /// Short code, used as the entity id
    pub code: String,
    pub name: String,
    /// National structure identifier
    pub rnsr: String,
    #[serde(deserialize_with = "multi_value")]
    pub axes: Vec<String>,
    #[serde(deserialize_with = "multi_value")]
    pub erc: Vec<String>,
    #[serde(deserialize_with = "multi_value")]
    pub hceres: Vec<String>,
    #[serde(deserialize_with = "multi_value")]
    pub keywords: Vec<String>,
    #[serde(deserialize_with = "multi_value")]
    pub keywords_ai: Vec<String>,
    #[serde(deserialize_with = "multi_value")]
    pub emails: Vec<String>,
}

impl LabRecord {
    /// Themed text: AI keywords, keywords, ERC, HCERES then axes
    pub fn themed_text(&self) -> String {
        [
            &self.keywords_ai,
            &self.keywords,
            &self.erc,
            &self.hceres,
            &self.axes,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Free-text search corpus: code, name, every multi-value field, RNSR
    pub fn search_corpus(&self) -> String {
        [
            self.code.trim().to_string(),
            self.name.trim().to_string(),
            self.axes.join(" "),
            self.erc.join(" "),
            self.hceres.join(" "),
            self.keywords.join(" "),
            self.keywords_ai.join(" "),
            self.rnsr.trim().to_string(),
        ]
        .join(" ")
    }

    /// Id for this record; `position` names records without a code
    pub fn entity_id(&self, position: usize) -> EntityId {
        let code = self.code.trim();
        if code.is_empty() {
            EntityId::new(format!("lab_{position}"))
        } else {
            EntityId::new(code)
        }
    }

    pub fn to_entity(&self, position: usize) -> Entity {
        Entity::new(self.entity_id(position), self.themed_text())
    }
}

/// Convert records to entities, numbering code-less records by position
pub fn records_to_entities(records: &[LabRecord]) -> Vec<Entity> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| r.to_entity(i))
        .collect()
}

/// Parse a JSON array of lab records
pub fn parse_records(json: &str) -> RecordResult<Vec<LabRecord>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_multi() {
        assert_eq!(split_multi(" a | b ||c "), vec!["a", "b", "c"]);
        assert_eq!(split_multi("\u{feff}robotique"), vec!["robotique"]);
        assert!(split_multi("  ").is_empty());
        assert!(split_multi("").is_empty());
    }

    #[test]
    fn test_parse_mixed_multi_values() {
        let json = r#"[
            {"code": "LAB1", "keywords": "vision | robotique", "erc": ["PE6", " "], "axes": null},
            {"name": "No code", "keywords_ai": ["océan"]}
        ]"#;
        let records = parse_records(json).unwrap();

        assert_eq!(records[0].keywords, vec!["vision", "robotique"]);
        assert_eq!(records[0].erc, vec!["PE6"]);
        assert!(records[0].axes.is_empty());
        assert_eq!(records[1].keywords_ai, vec!["océan"]);
    }

    #[test]
    fn test_themed_text_priority() {
        let record = LabRecord {
            code: "L".into(),
            axes: vec!["axe".into()],
            erc: vec!["erc".into()],
            hceres: vec!["hceres".into()],
            keywords: vec!["kw".into()],
            keywords_ai: vec!["ia".into()],
            ..LabRecord::default()
        };
        assert_eq!(record.themed_text(), "ia kw erc hceres axe");
    }

    #[test]
    fn test_entity_id_fallback() {
        let records = vec![
            LabRecord {
                code: "  UMR1 ".into(),
                ..LabRecord::default()
            },
            LabRecord::default(),
        ];
        let entities = records_to_entities(&records);
        assert_eq!(entities[0].id.as_str(), "UMR1");
        assert_eq!(entities[1].id.as_str(), "lab_1");
        assert_eq!(entities[1].text, "");
    }

    #[test]
    fn test_search_corpus_fields() {
        let record = LabRecord {
            code: "IRIT".into(),
            name: "Institut de recherche en informatique".into(),
            rnsr: "200711886U".into(),
            erc: vec!["PE6".into()],
            keywords_ai: vec!["logique".into()],
            ..LabRecord::default()
        };
        let corpus = record.search_corpus();
        assert!(corpus.starts_with("IRIT Institut de recherche"));
        assert!(corpus.contains("PE6"));
        assert!(corpus.contains("logique"));
        assert!(corpus.ends_with("200711886U"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(parse_records("{not json"), Err(RecordError::Json(_))));
    }
}
