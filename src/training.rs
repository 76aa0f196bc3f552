//! Training data consumed by the mapper
//!
//! Accepts the host's NLU JSON layout, either wrapped in `rasa_nlu_data` or
//! as a bare object:
//!
//! ```json
//! {
//!   "rasa_nlu_data": {
//!     "common_examples": [
//!       {"text": "cho mình xem áo dài", "intent": "inform",
//!        "entities": [{"start": 13, "end": 19, "value": "ao", "entity": "inform#object_type"}]}
//!     ],
//!     "entity_synonyms": [{"value": "ao", "synonyms": ["áo", "áo dài"]}]
//!   }
//! }
//! ```

use crate::error::{Result, SynonymError};
use crate::message::value_to_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Explicit synonym declaration: every listed surface form maps to `value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymGroup {
    pub value: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// A labeled entity inside a training example; offsets are in characters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub entity: String,
    #[serde(default)]
    pub value: Option<Value>,
}

impl EntitySpan {
    /// Labeled value as text, `None` when unlabeled
    pub fn value_text(&self) -> Option<String> {
        match &self.value {
            None | Some(Value::Null) => None,
            Some(v) => Some(value_to_text(v)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default)]
    pub entities: Vec<EntitySpan>,
}

impl TrainingExample {
    /// Text covered by a span; out-of-range offsets are clamped
    pub fn span_text(&self, span: &EntitySpan) -> String {
        self.text
            .chars()
            .skip(span.start)
            .take(span.end.saturating_sub(span.start))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    #[serde(default)]
    pub common_examples: Vec<TrainingExample>,
    #[serde(default)]
    pub entity_synonyms: Vec<SynonymGroup>,
}

#[derive(Deserialize)]
struct Wrapped {
    rasa_nlu_data: TrainingData,
}

impl TrainingData {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(json)?;
        let data = if raw.get("rasa_nlu_data").is_some() {
            serde_json::from_value::<Wrapped>(raw).map(|w| w.rasa_nlu_data)
        } else {
            serde_json::from_value::<TrainingData>(raw)
        };
        data.map_err(|e| SynonymError::MalformedTrainingData(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// (surface form, canonical value) pairs from explicit declarations
    pub fn synonym_pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entity_synonyms.iter().flat_map(|group| {
            group
                .synonyms
                .iter()
                .map(move |s| (s.as_str(), group.value.as_str()))
        })
    }

    /// Examples that carry at least one labeled entity
    pub fn entity_examples(&self) -> impl Iterator<Item = &TrainingExample> + '_ {
        self.common_examples
            .iter()
            .filter(|ex| !ex.entities.is_empty())
    }
}
