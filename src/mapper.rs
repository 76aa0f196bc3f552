//! Entity synonym mapper component
//!
//! Owns the configuration, the synonym table and the ranker derived from it.
//! Lifecycle: `new`/`load` → `train` (optional) → `process` any number of
//! messages. Processing only reads state, so a trained mapper can be shared
//! across threads.

use crate::config::MapperConfig;
use crate::error::Result;
use crate::message::{EntityOccurrence, Message};
use crate::synonyms::{policy, AddOutcome, CandidateRanker, SynonymConflict, SynonymTable};
use crate::training::TrainingData;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Name recorded in `EntityOccurrence::processors`
pub const COMPONENT_NAME: &str = "EntitySynonymMapper";

/// Metadata returned by `persist` and handed back to `load`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedMeta {
    pub file: Option<String>,
}

/// Summary of a training pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingReport {
    /// Pairs stored (including same-value repeats)
    pub pairs_added: usize,
    /// Pairs skipped: no value, or value equal to the surface form
    pub pairs_ignored: usize,
    pub conflicts: Vec<SynonymConflict>,
}

impl TrainingReport {
    fn record(&mut self, outcome: AddOutcome) {
        match outcome {
            AddOutcome::Ignored => self.pairs_ignored += 1,
            AddOutcome::Inserted => self.pairs_added += 1,
            AddOutcome::Conflict(conflict) => {
                self.pairs_added += 1;
                self.conflicts.push(conflict);
            }
        }
    }
}

pub struct EntitySynonymMapper {
    config: MapperConfig,
    table: SynonymTable,
    ranker: CandidateRanker,
}

impl EntitySynonymMapper {
    /// Create a mapper around an existing (possibly empty) table.
    ///
    /// Fails with `InvalidConfig` when the configuration is out of range.
    pub fn new(config: MapperConfig, table: Option<SynonymTable>) -> Result<Self> {
        config.validate()?;
        let mut table = table.unwrap_or_default();
        let ranker = CandidateRanker::new(&table.finalize(&config.ignore_values));
        Ok(Self {
            config,
            table,
            ranker,
        })
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn table(&self) -> &SynonymTable {
        &self.table
    }

    /// Add explicit synonyms and labeled spans, then rebuild the index
    #[instrument(skip_all, fields(examples = data.common_examples.len()))]
    pub fn train(&mut self, data: &TrainingData) -> TrainingReport {
        let mut report = TrainingReport::default();

        for (surface, value) in data.synonym_pairs() {
            report.record(self.table.add(surface, Some(value)));
        }

        for example in data.entity_examples() {
            for span in &example.entities {
                let surface = example.span_text(span);
                let value = span.value_text();
                report.record(self.table.add(&surface, value.as_deref()));
            }
        }

        self.rebuild_index();

        info!(
            synonyms = self.table.len(),
            canonical_values = self.ranker.len(),
            conflicts = report.conflicts.len(),
            "Entity synonym training complete"
        );
        report
    }

    fn rebuild_index(&mut self) {
        let index = self.table.finalize(&self.config.ignore_values);
        self.ranker = CandidateRanker::new(&index);
    }

    /// Resolve the entities of a message in place.
    ///
    /// A mapper without synonyms leaves every message untouched.
    pub fn process(&self, message: &mut Message) {
        if self.table.is_empty() {
            return;
        }
        for entity in &mut message.entities {
            self.process_entity(entity);
        }
    }

    /// Resolve a single occurrence; returns false for passthrough
    pub fn process_entity(&self, entity: &mut EntityOccurrence) -> bool {
        let value = entity.value_text();
        let Some(outcome) = policy::resolve(
            &entity.entity,
            &value,
            &self.table,
            &self.ranker,
            &self.config,
        ) else {
            return false;
        };

        debug!(
            entity = %entity.entity,
            from = %value,
            to = ?outcome.value(),
            resolution = ?outcome.resolution(),
            "Replace entity value"
        );
        entity.apply(outcome, COMPONENT_NAME);
        true
    }

    /// Write the synonym table to `<model_dir>/<file_name>.json`.
    ///
    /// Nothing is written for an empty table.
    pub fn persist(&self, file_name: &str, model_dir: &Path) -> Result<PersistedMeta> {
        if self.table.is_empty() {
            return Ok(PersistedMeta { file: None });
        }

        let file_name = format!("{file_name}.json");
        std::fs::create_dir_all(model_dir)?;
        let content = serde_json::to_string_pretty(&self.table)?;
        std::fs::write(model_dir.join(&file_name), content)?;

        debug!(file = %file_name, synonyms = self.table.len(), "Persisted entity synonyms");
        Ok(PersistedMeta {
            file: Some(file_name),
        })
    }

    /// Restore a persisted mapper.
    ///
    /// A missing or unreadable synonyms file is not fatal: the mapper starts
    /// empty and passes every message through. An invalid configuration is.
    pub fn load(config: MapperConfig, meta: &PersistedMeta, model_dir: &Path) -> Result<Self> {
        let Some(file_name) = meta.file.as_deref() else {
            return Self::new(config, None);
        };

        let path = model_dir.join(file_name);
        let table = match read_table(&path) {
            Ok(table) => Some(table),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load synonyms file, continuing without synonyms"
                );
                None
            }
        };
        Self::new(config, table)
    }
}

fn read_table(path: &Path) -> Result<SynonymTable> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
