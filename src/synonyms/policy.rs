//! Resolution policy for a single entity occurrence
//!
//! ```text
//! value ──► exact synonym? ──yes──► ExactMatch      (confidence 1.0)
//!              │ no
//!              ▼
//!          rank anchors ──top ≥ threshold──► FuzzyAccepted (confidence = score)
//!              │ below
//!              ▼
//!          FuzzyRejected (value and confidence cleared)
//! ```
//!
//! Untracked entity types never reach the policy's branches and pass
//! through untouched.

use super::ranker::{Candidate, CandidateRanker};
use super::table::SynonymTable;
use crate::config::MapperConfig;
use serde::{Deserialize, Serialize};

/// Which branch resolved an occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    ExactMatch,
    FuzzyAccepted,
    FuzzyRejected,
}

/// Result of resolving one tracked occurrence
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    ExactMatch {
        value: String,
        candidates: Vec<Candidate>,
    },
    FuzzyAccepted {
        value: String,
        score: f64,
        candidates: Vec<Candidate>,
    },
    FuzzyRejected {
        candidates: Vec<Candidate>,
    },
}

impl Outcome {
    pub fn resolution(&self) -> Resolution {
        match self {
            Outcome::ExactMatch { .. } => Resolution::ExactMatch,
            Outcome::FuzzyAccepted { .. } => Resolution::FuzzyAccepted,
            Outcome::FuzzyRejected { .. } => Resolution::FuzzyRejected,
        }
    }

    /// Resolved canonical value, `None` when rejected
    pub fn value(&self) -> Option<&str> {
        match self {
            Outcome::ExactMatch { value, .. } | Outcome::FuzzyAccepted { value, .. } => {
                Some(value)
            }
            Outcome::FuzzyRejected { .. } => None,
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            Outcome::ExactMatch { .. } => Some(1.0),
            Outcome::FuzzyAccepted { score, .. } => Some(*score),
            Outcome::FuzzyRejected { .. } => None,
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        match self {
            Outcome::ExactMatch { candidates, .. }
            | Outcome::FuzzyAccepted { candidates, .. }
            | Outcome::FuzzyRejected { candidates } => candidates,
        }
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        match self {
            Outcome::ExactMatch { candidates, .. }
            | Outcome::FuzzyAccepted { candidates, .. }
            | Outcome::FuzzyRejected { candidates } => candidates,
        }
    }
}

/// Trim a ranking down to the alternatives attached to an entity.
///
/// When the resolved value is a general object type the best candidate is
/// dropped first; the rest is truncated to `num_candidates`.
pub fn select_candidates(
    ranked: Vec<Candidate>,
    resolved: Option<&str>,
    config: &MapperConfig,
) -> Vec<Candidate> {
    let skip = match resolved {
        Some(value) if config.is_general(value) => 1,
        _ => 0,
    };
    ranked
        .into_iter()
        .skip(skip)
        .take(config.num_candidates)
        .collect()
}

/// Decide how a single occurrence resolves.
///
/// Returns `None` for entity types outside `tracked_entity_types`.
pub fn resolve(
    entity_type: &str,
    value: &str,
    table: &SynonymTable,
    ranker: &CandidateRanker,
    config: &MapperConfig,
) -> Option<Outcome> {
    if !config.is_tracked(entity_type) {
        return None;
    }

    if let Some(canonical) = table.lookup(value) {
        let ranked = ranker.rank(value);
        return Some(Outcome::ExactMatch {
            value: canonical.to_string(),
            candidates: select_candidates(ranked, Some(canonical), config),
        });
    }

    let ranked = ranker.rank(value);
    let top = ranked
        .first()
        .filter(|best| best.score >= config.threshold)
        .cloned();

    let outcome = match top {
        Some(best) => Outcome::FuzzyAccepted {
            candidates: select_candidates(ranked, Some(&best.value), config),
            value: best.value,
            score: best.score,
        },
        None => Outcome::FuzzyRejected {
            candidates: select_candidates(ranked, None, config),
        },
    };
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn fixture(config: &MapperConfig) -> (SynonymTable, CandidateRanker) {
        let mut table = SynonymTable::new();
        table.add("áo dài", Some("ao"));
        table.add("bộ đồ", Some("bo"));
        table.add("set đồ", Some("set"));
        table.add("đầm maxi", Some("dam_maxi"));
        let ranker = CandidateRanker::new(&table.finalize(&config.ignore_values));
        (table, ranker)
    }

    fn test_config() -> MapperConfig {
        MapperConfig::default()
            .with_tracked_entity_types(["inform#object_type"])
            .with_general_object_types(["ao", "bo", "set"])
    }

    #[test]
    fn test_exact_match() {
        let config = test_config();
        let (table, ranker) = fixture(&config);
        let outcome = resolve("inform#object_type", "Áo Dài", &table, &ranker, &config).unwrap();
        assert_eq!(outcome.resolution(), Resolution::ExactMatch);
        assert_eq!(outcome.value(), Some("ao"));
        assert_eq!(outcome.confidence(), Some(1.0));
        // "ao" is general: its own top candidate is dropped
        assert!(outcome.candidates().iter().all(|c| c.value != "ao"));
        assert_eq!(outcome.candidates().len(), 3);
    }

    #[test]
    fn test_exact_match_takes_precedence() {
        let config = test_config();
        let mut table = SynonymTable::new();
        // "bo" scores 1.0 against itself, but the exact entry wins
        table.add("bo", Some("set"));
        table.add("bộ đồ", Some("bo"));
        let ranker = CandidateRanker::new(&table.finalize(&BTreeSet::new()));
        let outcome = resolve("inform#object_type", "bo", &table, &ranker, &config).unwrap();
        assert_eq!(outcome.resolution(), Resolution::ExactMatch);
        assert_eq!(outcome.value(), Some("set"));
    }

    #[test]
    fn test_fuzzy_accepted() {
        let config = test_config();
        let (table, ranker) = fixture(&config);
        let outcome = resolve("inform#object_type", "aos", &table, &ranker, &config).unwrap();
        assert_eq!(outcome.resolution(), Resolution::FuzzyAccepted);
        assert_eq!(outcome.value(), Some("ao"));
        assert_eq!(outcome.confidence(), Some(0.8));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let (table, ranker) = fixture(&test_config());

        let at = test_config().with_threshold(0.8);
        let outcome = resolve("inform#object_type", "aos", &table, &ranker, &at).unwrap();
        assert_eq!(outcome.resolution(), Resolution::FuzzyAccepted);

        let above = test_config().with_threshold(0.81);
        let outcome = resolve("inform#object_type", "aos", &table, &ranker, &above).unwrap();
        assert_eq!(outcome.resolution(), Resolution::FuzzyRejected);
    }

    #[test]
    fn test_fuzzy_rejected() {
        let config = test_config();
        let (table, ranker) = fixture(&config);
        let outcome = resolve("inform#object_type", "xyz123", &table, &ranker, &config).unwrap();
        assert_eq!(outcome.resolution(), Resolution::FuzzyRejected);
        assert_eq!(outcome.value(), None);
        assert_eq!(outcome.confidence(), None);
        // nothing dropped when unresolved
        assert_eq!(outcome.candidates().len(), 4);
    }

    #[test]
    fn test_untracked_is_none() {
        let config = test_config();
        let (table, ranker) = fixture(&config);
        assert!(resolve("greet", "áo dài", &table, &ranker, &config).is_none());
    }

    #[test]
    fn test_empty_ranking_rejects() {
        let config = test_config();
        let table = SynonymTable::new();
        let ranker = CandidateRanker::default();
        let outcome = resolve("inform#object_type", "ao", &table, &ranker, &config).unwrap();
        assert_eq!(outcome, Outcome::FuzzyRejected { candidates: vec![] });
    }

    #[test]
    fn test_select_candidates_general_drops_first() {
        let config = test_config().with_num_candidates(2);
        let ranked = vec![
            Candidate::new("ao", 1.0),
            Candidate::new("bo", 0.5),
            Candidate::new("set", 0.4),
            Candidate::new("dam_maxi", 0.1),
        ];
        let picked = select_candidates(ranked.clone(), Some("ao"), &config);
        assert_eq!(picked, ranked[1..3].to_vec());

        let picked = select_candidates(ranked.clone(), Some("dam_maxi"), &config);
        assert_eq!(picked, ranked[0..2].to_vec());

        let picked = select_candidates(ranked.clone(), None, &config);
        assert_eq!(picked, ranked[0..2].to_vec());
    }

    #[test]
    fn test_select_candidates_short_list() {
        let config = test_config();
        assert!(select_candidates(vec![], Some("ao"), &config).is_empty());
        let one = vec![Candidate::new("ao", 1.0)];
        assert!(select_candidates(one, Some("ao"), &config).is_empty());
    }

    #[test]
    fn test_resolution_serde() {
        assert_eq!(
            serde_json::to_string(&Resolution::FuzzyRejected).unwrap(),
            "\"fuzzy_rejected\""
        );
    }
}
