//! Host pipeline records
//!
//! A `Message` owns the entity occurrences found in one utterance. The mapper
//! mutates occurrences in place; fields it does not know about are carried
//! through untouched.

use crate::error::{Result, SynonymError};
use crate::synonyms::{Candidate, Outcome, Resolution};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entity found by an upstream extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityOccurrence {
    /// Entity type label (e.g., "inform#object_type")
    pub entity: String,

    /// Raw or resolved value; `null` once deliberately unresolved
    pub value: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,

    /// Which branch resolved this occurrence, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,

    /// Components that modified this occurrence
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processors: Vec<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl EntityOccurrence {
    pub fn new(entity: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            entity: entity.into(),
            value: value.into(),
            start: None,
            end: None,
            confidence: None,
            candidates: None,
            resolution: None,
            processors: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Value as text; non-string values use their JSON rendering
    pub fn value_text(&self) -> String {
        value_to_text(&self.value)
    }

    /// Write a resolution onto this occurrence and record the processor
    pub fn apply(&mut self, outcome: Outcome, processor: &str) {
        self.resolution = Some(outcome.resolution());
        self.value = outcome
            .value()
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null);
        self.confidence = outcome.confidence();
        self.candidates = Some(outcome.into_candidates());
        self.processors.push(processor.to_string());
    }
}

pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A processed utterance and its entities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub entities: Vec<EntityOccurrence>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Message {
    pub fn new(text: impl Into<String>, entities: Vec<EntityOccurrence>) -> Self {
        Self {
            text: text.into(),
            entities,
            extra: serde_json::Map::new(),
        }
    }

    /// Parse a message, failing on entities without `entity` or `value`
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(json)?;
        if let Some(entities) = raw.get("entities").and_then(Value::as_array) {
            for (idx, entity) in entities.iter().enumerate() {
                for field in ["entity", "value"] {
                    if entity.get(field).is_none() {
                        return Err(SynonymError::MalformedOccurrence(format!(
                            "entity #{idx} is missing `{field}`"
                        )));
                    }
                }
            }
        }
        serde_json::from_value(raw)
            .map_err(|e| SynonymError::MalformedOccurrence(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_text_coerces_numbers() {
        assert_eq!(EntityOccurrence::new("size", 42).value_text(), "42");
        assert_eq!(EntityOccurrence::new("size", "M").value_text(), "M");
        assert_eq!(EntityOccurrence::new("flag", true).value_text(), "true");
    }

    #[test]
    fn test_untouched_roundtrip_is_identical() {
        let json = r#"{"text":"xin chao","entities":[{"entity":"greet","value":"hello","start":0,"end":8,"extractor":"crf"}],"intent":"greet"}"#;
        let message = Message::from_json(json).unwrap();
        assert_eq!(message.entities[0].extra["extractor"], json!("crf"));
        let back: Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();
        let original: Value = serde_json::from_str(json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_missing_value_is_malformed() {
        let err = Message::from_json(r#"{"entities":[{"entity":"greet"}]}"#).unwrap_err();
        match err {
            SynonymError::MalformedOccurrence(msg) => assert!(msg.contains("`value`")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_entity_is_malformed() {
        let err = Message::from_json(r#"{"entities":[{"value":"ao"}]}"#).unwrap_err();
        assert!(matches!(err, SynonymError::MalformedOccurrence(_)));
    }

    #[test]
    fn test_apply_rejected_clears_value() {
        let mut occ = EntityOccurrence::new("inform#object_type", "xyz");
        occ.apply(
            Outcome::FuzzyRejected {
                candidates: vec![Candidate::new("ao", 0.2)],
            },
            "EntitySynonymMapper",
        );
        assert_eq!(occ.value, Value::Null);
        assert_eq!(occ.confidence, None);
        assert_eq!(occ.resolution, Some(Resolution::FuzzyRejected));
        assert_eq!(occ.processors, vec!["EntitySynonymMapper".to_string()]);

        let rendered = serde_json::to_value(&occ).unwrap();
        assert_eq!(rendered["value"], Value::Null);
        assert_eq!(rendered["resolution"], json!("fuzzy_rejected"));
        assert!(rendered.get("confidence").is_none());
        assert_eq!(rendered["candidates"], json!([["ao", 0.2]]));
    }
}
