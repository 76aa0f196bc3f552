//! Synonym table and its reverse index
//!
//! The `SynonymTable` maps lowercased surface forms to canonical values and
//! remembers key insertion order, so everything derived from it (and the
//! persisted JSON document) is deterministic. `finalize()` is the only way
//! to obtain a `ReverseIndex`; any mutation marks the table stale until the
//! next `finalize()`.

use super::normalize::table_key;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::warn;

/// A surface form that was remapped to a different canonical value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymConflict {
    /// Lowercased surface form
    pub surface: String,
    /// Canonical value that was overwritten
    pub discarded: String,
    /// Canonical value now stored
    pub replacement: String,
}

impl fmt::Display for SynonymConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found conflicting synonym definitions for {:?}. Overwriting target {:?} with {:?}. \
             Check your training data and remove conflicting synonym definitions to prevent \
             this from happening.",
            self.surface, self.discarded, self.replacement
        )
    }
}

/// What `SynonymTable::add` did with a pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// No canonical value, or surface form equal to it
    Ignored,
    /// New key, or same value stored again
    Inserted,
    /// Key existed with a different value and was overwritten
    Conflict(SynonymConflict),
}

/// Lowercased surface form → canonical value, in insertion order
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: HashMap<String, String>,
    order: Vec<String>,
    stale: bool,
}

impl PartialEq for SynonymTable {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.entries == other.entries
    }
}

impl SynonymTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `surface` should resolve to `canonical`.
    ///
    /// Pairs without a canonical value, or whose surface form is literally
    /// the canonical value, are no-ops. Remapping an existing key to a
    /// different value logs a warning and overwrites.
    pub fn add(&mut self, surface: &str, canonical: Option<&str>) -> AddOutcome {
        let Some(canonical) = canonical else {
            return AddOutcome::Ignored;
        };
        if surface == canonical {
            return AddOutcome::Ignored;
        }

        let key = table_key(surface);
        self.stale = true;

        match self.entries.get_mut(&key) {
            Some(existing) if existing != canonical => {
                let conflict = SynonymConflict {
                    surface: key,
                    discarded: std::mem::replace(existing, canonical.to_string()),
                    replacement: canonical.to_string(),
                };
                warn!(
                    surface = %conflict.surface,
                    discarded = %conflict.discarded,
                    replacement = %conflict.replacement,
                    "{}",
                    conflict
                );
                AddOutcome::Conflict(conflict)
            }
            Some(_) => AddOutcome::Inserted,
            None => {
                self.order.push(key.clone());
                self.entries.insert(key, canonical.to_string());
                AddOutcome::Inserted
            }
        }
    }

    /// Exact lookup by surface form (case-insensitive)
    pub fn lookup(&self, surface: &str) -> Option<&str> {
        self.entries.get(&table_key(surface)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// True when the table changed since the last `finalize()`
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.order
            .iter()
            .filter_map(|k| self.entries.get(k).map(|v| (k.as_str(), v.as_str())))
    }

    /// Rebuild the reverse index from scratch.
    ///
    /// Canonical values appear in order of first occurrence; each group's
    /// anchors are its surface forms in table order followed by the
    /// canonical value with underscores replaced by spaces. Values in
    /// `ignore_values` are left out.
    pub fn finalize(&mut self, ignore_values: &BTreeSet<String>) -> ReverseIndex {
        let mut groups: Vec<AnchorGroup> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for (surface, canonical) in self.iter() {
            if ignore_values.contains(canonical) {
                continue;
            }
            match positions.get(canonical) {
                Some(&idx) => groups[idx].anchors.push(surface.to_string()),
                None => {
                    positions.insert(canonical, groups.len());
                    let mut anchors = SmallVec::new();
                    anchors.push(surface.to_string());
                    groups.push(AnchorGroup {
                        value: canonical.to_string(),
                        anchors,
                    });
                }
            }
        }

        for group in &mut groups {
            let spelled = group.value.replace('_', " ");
            group.anchors.push(spelled);
        }

        self.stale = false;
        ReverseIndex { groups }
    }

    /// Owned `(surface, canonical)` entries in insertion order, the shape
    /// `from_map` accepts back
    pub fn to_map(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Build from a persisted map. Keys are stored as given and the result is
    /// stale until finalized.
    pub fn from_map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (k, v) in entries {
            table.insert_raw(k.into(), v.into());
        }
        table
    }

    fn insert_raw(&mut self, key: String, value: String) {
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push(key);
        }
        self.stale = true;
    }
}

impl Serialize for SynonymTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SynonymTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = SynonymTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of surface form to canonical value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = SynonymTable::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    table.insert_raw(k, v);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Anchors of a single canonical value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorGroup {
    pub value: String,
    pub anchors: SmallVec<[String; 4]>,
}

/// Canonical value → anchors, produced by `SynonymTable::finalize`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseIndex {
    groups: Vec<AnchorGroup>,
}

impl ReverseIndex {
    pub fn groups(&self) -> &[AnchorGroup] {
        &self.groups
    }

    pub fn anchors(&self, value: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|g| g.value == value)
            .map(|g| g.anchors.as_slice())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
