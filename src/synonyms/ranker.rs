//! Candidate ranking against a reverse index

use super::normalize::normalize;
use super::similarity::ratio;
use super::table::ReverseIndex;
use serde::{Deserialize, Serialize};

/// A canonical value with its similarity to a query.
///
/// Serialized as a `[value, score]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, f64)", into = "(String, f64)")]
pub struct Candidate {
    pub value: String,
    pub score: f64,
}

impl From<(String, f64)> for Candidate {
    fn from((value, score): (String, f64)) -> Self {
        Self { value, score }
    }
}

impl From<Candidate> for (String, f64) {
    fn from(candidate: Candidate) -> Self {
        (candidate.value, candidate.score)
    }
}

impl Candidate {
    pub fn new(value: impl Into<String>, score: f64) -> Self {
        Self {
            value: value.into(),
            score,
        }
    }
}

/// Scores queries against every canonical value of a reverse index.
///
/// Anchors are normalized once at construction.
#[derive(Debug, Clone, Default)]
pub struct CandidateRanker {
    groups: Vec<(String, Vec<String>)>,
}

impl CandidateRanker {
    pub fn new(index: &ReverseIndex) -> Self {
        let groups = index
            .groups()
            .iter()
            .map(|g| {
                let anchors = g.anchors.iter().map(|a| normalize(a)).collect();
                (g.value.clone(), anchors)
            })
            .collect();
        Self { groups }
    }

    /// One candidate per canonical value, best score first.
    ///
    /// A value's score is its best anchor `ratio` against the normalized
    /// query. Equal scores keep reverse index order.
    pub fn rank(&self, query: &str) -> Vec<Candidate> {
        let query = normalize(query);

        let mut candidates: Vec<Candidate> = self
            .groups
            .iter()
            .map(|(value, anchors)| {
                let score = anchors
                    .iter()
                    .map(|anchor| ratio(&query, anchor))
                    .fold(0.0_f64, f64::max);
                Candidate::new(value.clone(), score)
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates
    }

    /// Number of canonical values that can be ranked
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
