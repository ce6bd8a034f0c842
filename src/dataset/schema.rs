// src/dataset/schema.rs

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::{DashError, Result};
use crate::roman::decode_roman;

/// `Gen <numeral> Born` / `Gen <numeral> Died`, with any whitespace between tokens.
static GEN_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Gen\s+(\S+)\s+(Born|Died)$").expect("valid generation regex"));

/// The pair of source columns backing one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationColumns {
    /// Roman numeral label, e.g. "IX".
    pub label: String,
    /// Decoded value of `label`; the sort key.
    pub rank: u32,
    /// Index of this generation in the schema's canonical order.
    pub position: usize,
    pub born_column: String,
    pub died_column: String,
    pub(crate) born_index: usize,
    pub(crate) died_index: usize,
}

/// Explicit descriptor of the generations present in the source, built once
/// from the header row.
///
/// Generations are held youngest first (descending numeral value). This is
/// the only place that order is decided; every consumer iterates it as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSchema {
    generations: Vec<GenerationColumns>,
}

#[derive(Default)]
struct PendingPair {
    born: Option<(usize, String)>,
    died: Option<(usize, String)>,
}

impl GenerationSchema {
    /// Scan `headers` for generation columns and validate that every label
    /// has both a Born and a Died column.
    pub fn from_headers(headers: &[String]) -> Result<Self> {
        let mut pending: BTreeMap<String, PendingPair> = BTreeMap::new();

        for (idx, header) in headers.iter().enumerate() {
            let name = header.trim();
            if !name.contains("Gen") {
                continue;
            }
            let Some(caps) = GEN_COLUMN.captures(name) else {
                warn!(column = name, "skipping column that mentions Gen but is not a generation column");
                continue;
            };
            let label = caps[1].to_string();
            let slot = pending.entry(label).or_default();
            let entry = Some((idx, name.to_string()));
            match &caps[2] {
                "Born" => slot.born = entry,
                _ => slot.died = entry,
            }
        }

        if pending.is_empty() {
            return Err(DashError::NoGenerationsFound);
        }

        let mut generations = Vec::with_capacity(pending.len());
        for (label, pair) in pending {
            let rank = decode_roman(&label)?;
            let (born_index, born_column) =
                pair.born.ok_or_else(|| DashError::IncompleteGeneration {
                    label: label.clone(),
                    missing: format!("Gen {} Born", label),
                })?;
            let (died_index, died_column) =
                pair.died.ok_or_else(|| DashError::IncompleteGeneration {
                    label: label.clone(),
                    missing: format!("Gen {} Died", label),
                })?;
            generations.push(GenerationColumns {
                label,
                rank,
                position: 0,
                born_column,
                died_column,
                born_index,
                died_index,
            });
        }

        // youngest (highest numeral) first; label text breaks ties so the
        // order never depends on header layout
        generations.sort_by(|a, b| b.rank.cmp(&a.rank).then_with(|| a.label.cmp(&b.label)));
        for (position, gen) in generations.iter_mut().enumerate() {
            gen.position = position;
        }

        debug!(
            generations = ?generations.iter().map(|g| g.label.as_str()).collect::<Vec<_>>(),
            "built generation schema"
        );
        Ok(Self { generations })
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenerationColumns> {
        self.generations.iter()
    }

    /// Labels in canonical order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.generations.iter().map(|g| g.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&GenerationColumns> {
        self.generations.iter().find(|g| g.label == label)
    }

    /// Like [`get`](Self::get), but an unknown label is an error.
    pub fn require(&self, label: &str) -> Result<&GenerationColumns> {
        self.get(label).ok_or_else(|| DashError::UnknownGeneration {
            label: label.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn orders_generations_descending() {
        let h = headers(&[
            "Location",
            "Gen II Born",
            "Gen II Died",
            "Gen IX Born",
            "Gen IX Died",
            "Gen IV Born",
            "Gen IV Died",
            "Latitude",
        ]);
        let schema = GenerationSchema::from_headers(&h).unwrap();
        let labels: Vec<&str> = schema.labels().collect();
        assert_eq!(labels, vec!["IX", "IV", "II"]);

        let ix = schema.get("IX").unwrap();
        assert_eq!(ix.position, 0);
        assert_eq!(ix.born_column, "Gen IX Born");
        assert_eq!(ix.born_index, 3);
        assert_eq!(ix.died_index, 4);

        // stable across rebuilds
        let again = GenerationSchema::from_headers(&h).unwrap();
        assert_eq!(schema, again);
    }

    #[test]
    fn rejects_half_a_generation() {
        let h = headers(&["Location", "Gen I Born", "Gen I Died", "Gen II Born"]);
        match GenerationSchema::from_headers(&h) {
            Err(DashError::IncompleteGeneration { label, missing }) => {
                assert_eq!(label, "II");
                assert_eq!(missing, "Gen II Died");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn no_generation_columns() {
        let h = headers(&["Location", "Latitude", "Longitude", "Gender"]);
        assert!(matches!(
            GenerationSchema::from_headers(&h),
            Err(DashError::NoGenerationsFound)
        ));
    }

    #[test]
    fn unknown_label_is_an_error() {
        let h = headers(&["Gen I Born", "Gen I Died"]);
        let schema = GenerationSchema::from_headers(&h).unwrap();
        assert!(schema.require("I").is_ok());
        assert!(matches!(
            schema.require("V"),
            Err(DashError::UnknownGeneration { .. })
        ));
    }
}
