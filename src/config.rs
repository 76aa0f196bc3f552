//! Mapper configuration
//!
//! Loaded from YAML (or JSON, which is a YAML subset) and validated once at
//! construction. Every field has a default, so an empty document is valid.

use crate::error::{Result, SynonymError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

const DEFAULT_THRESHOLD: f64 = 0.80;
const DEFAULT_NUM_CANDIDATES: usize = 5;

/// Configuration for the entity synonym mapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    /// Entity types eligible for fuzzy resolution (e.g., "inform#object_type")
    pub tracked_entity_types: BTreeSet<String>,
    /// Canonical values too generic to be offered as the first alternative
    pub general_object_types: BTreeSet<String>,
    /// Canonical values never offered as fuzzy targets
    pub ignore_values: BTreeSet<String>,
    /// Minimum similarity (inclusive) to accept a fuzzy match
    pub threshold: f64,
    /// Maximum number of alternative candidates attached to an entity
    pub num_candidates: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            tracked_entity_types: to_set(&[
                "inform#object_type",
                "ask_confirm#object_type",
                "ask_availability#object_type",
                "deny#object_type",
                "inform#location",
            ]),
            general_object_types: to_set(&["ao", "bo", "set", "combo", "vay", "quan"]),
            ignore_values: BTreeSet::new(),
            threshold: DEFAULT_THRESHOLD,
            num_candidates: DEFAULT_NUM_CANDIDATES,
        }
    }
}

fn to_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl MapperConfig {
    /// Parse configuration from a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML or JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SynonymError::invalid_config(
                "threshold",
                format!("must be within [0, 1], got {}", self.threshold),
            ));
        }
        Ok(())
    }

    pub fn is_tracked(&self, entity_type: &str) -> bool {
        self.tracked_entity_types.contains(entity_type)
    }

    pub fn is_general(&self, value: &str) -> bool {
        self.general_object_types.contains(value)
    }

    pub fn with_tracked_entity_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tracked_entity_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_general_object_types<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.general_object_types = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ignore_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_num_candidates(mut self, num_candidates: usize) -> Self {
        self.num_candidates = num_candidates;
        self
    }
}
