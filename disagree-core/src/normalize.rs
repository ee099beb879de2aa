//! Label normalization.
//!
//! Turns an [`AnnotationTable`] into a [`CanonicalTable`] plus the
//! [`LabelDictionary`] needed to map codes back to the original labels.
//!
//! Codes are assigned in a fixed order so that normalizing the same table
//! twice yields the same codes:
//!
//! - [`LabelOrder::Sorted`] (default): ascending [`Label`] order. An
//!   already-canonical table (integer labels `0..n`) maps onto itself.
//! - [`LabelOrder::FirstSeen`]: order of first occurrence, scanning instances
//!   top to bottom and annotators left to right.
//!
//! `None` cells and float NaN cells are absent and stay `None`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, Result};
use crate::label::Label;
use crate::table::{AnnotationTable, CanonicalTable, Code};

/// Policy for assigning codes to labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOrder {
    /// Ascending label order
    #[default]
    Sorted,
    /// Row-major order of first occurrence
    FirstSeen,
}

/// Bijection between labels and their codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Label>", into = "Vec<Label>")]
pub struct LabelDictionary {
    labels: Vec<Label>,
    codes: HashMap<Label, Code>,
}

impl LabelDictionary {
    /// Build a dictionary where `labels[code]` is the label for `code`.
    ///
    /// Duplicate labels keep their first code.
    #[must_use]
    pub fn new(labels: Vec<Label>) -> Self {
        let mut codes = HashMap::with_capacity(labels.len());
        for (code, label) in labels.iter().enumerate() {
            codes.entry(label.clone()).or_insert(code);
        }
        Self { labels, codes }
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the label space is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Code assigned to a label.
    #[must_use]
    pub fn code_of(&self, label: &Label) -> Option<Code> {
        self.codes.get(label).copied()
    }

    /// Label behind a code.
    #[must_use]
    pub fn label_of(&self, code: Code) -> Option<&Label> {
        self.labels.get(code)
    }

    /// Labels indexed by code.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Iterate `(code, label)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (Code, &Label)> + '_ {
        self.labels.iter().enumerate()
    }
}

impl TryFrom<Vec<Label>> for LabelDictionary {
    type Error = Error;

    /// Strict form of [`LabelDictionary::new`]: a repeated label is an error
    /// instead of an unreachable code.
    fn try_from(labels: Vec<Label>) -> Result<Self> {
        let dictionary = Self::new(labels);
        if dictionary.codes.len() != dictionary.labels.len() {
            let repeated = dictionary
                .iter()
                .find(|(code, label)| dictionary.code_of(label) != Some(*code))
                .map(|(_, label)| label.to_string())
                .unwrap_or_default();
            return Err(Error::invalid_input_kind(format!(
                "label dictionary repeats label {}",
                repeated
            )));
        }
        Ok(dictionary)
    }
}

impl From<LabelDictionary> for Vec<Label> {
    fn from(dictionary: LabelDictionary) -> Self {
        dictionary.labels
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NormalizedData")]
pub struct Normalized {
    /// The integer-coded table
    pub table: CanonicalTable,
    /// Code ↔ label mapping
    pub dictionary: LabelDictionary,
}

#[derive(Deserialize)]
struct NormalizedData {
    table: CanonicalTable,
    dictionary: LabelDictionary,
}

impl TryFrom<NormalizedData> for Normalized {
    type Error = Error;

    fn try_from(data: NormalizedData) -> Result<Self> {
        if data.dictionary.len() != data.table.n_labels() {
            return Err(Error::invalid_input_kind(format!(
                "dictionary has {} labels but the table uses {}",
                data.dictionary.len(),
                data.table.n_labels()
            )));
        }
        Ok(Self {
            table: data.table,
            dictionary: data.dictionary,
        })
    }
}

fn present_labels(table: &AnnotationTable) -> impl Iterator<Item = &Label> + '_ {
    (0..table.n_instances())
        .flat_map(move |k| table.row(k))
        .flatten()
        .filter(|label| !label.is_missing())
}

/// Normalize a table into integer codes.
///
/// Pure function of its input. Shape errors are caught when the
/// [`AnnotationTable`] is built, so normalization itself cannot fail.
#[must_use]
pub fn normalize(table: &AnnotationTable, order: LabelOrder) -> Normalized {
    let labels: Vec<Label> = match order {
        LabelOrder::Sorted => present_labels(table)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect(),
        LabelOrder::FirstSeen => {
            let mut seen = std::collections::HashSet::new();
            present_labels(table)
                .filter(|label| seen.insert(*label))
                .cloned()
                .collect()
        }
    };
    let dictionary = LabelDictionary::new(labels);

    let mut cells = Vec::with_capacity(table.n_instances() * table.n_annotators());
    for k in 0..table.n_instances() {
        cells.extend(table.row(k).map(|cell| {
            cell.filter(|label| !label.is_missing())
                .and_then(|label| dictionary.code_of(label))
        }));
    }

    log::debug!(
        "Normalized {} instances x {} annotators into {} labels ({:?} order)",
        table.n_instances(),
        table.n_annotators(),
        dictionary.len(),
        order
    );

    Normalized {
        table: CanonicalTable::from_parts(
            table.annotators().to_vec(),
            table.n_instances(),
            dictionary.len(),
            cells,
        ),
        dictionary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[Option<i64>]) -> Vec<Option<Label>> {
        values.iter().map(|v| v.map(Label::Int)).collect()
    }

    fn wikipedia_table() -> AnnotationTable {
        let n = None;
        AnnotationTable::from_columns(vec![
            ("a", ints(&[n, n, n, n, n, Some(2), Some(3), Some(0), Some(1), Some(0), Some(0), Some(2), Some(2), n, Some(2)])),
            ("b", ints(&[Some(0), n, Some(1), Some(0), Some(2), Some(2), Some(3), Some(2), n, n, n, n, n, n, n])),
            ("c", ints(&[n, n, Some(1), Some(0), Some(2), Some(3), Some(3), n, Some(1), Some(0), Some(0), Some(2), Some(2), n, Some(3)])),
        ])
        .unwrap()
    }

    #[test]
    fn test_canonical_input_is_identity() {
        let table = wikipedia_table();
        let normalized = normalize(&table, LabelOrder::Sorted);

        assert_eq!(normalized.dictionary.len(), 4);
        for code in 0..4 {
            assert_eq!(normalized.dictionary.label_of(code), Some(&Label::Int(code as i64)));
        }
        for k in 0..table.n_instances() {
            for col in 0..table.n_annotators() {
                let expected = table.cell(k, col).map(|label| match label {
                    Label::Int(v) => *v as usize,
                    _ => unreachable!(),
                });
                assert_eq!(normalized.table.cell(k, col), expected);
            }
        }
    }

    #[test]
    fn test_zero_is_a_label_not_absent() {
        let table = AnnotationTable::from_columns(vec![
            ("a", vec![Some(Label::Int(0)), None]),
            ("b", vec![Some(Label::Int(0)), Some(Label::Int(1))]),
        ])
        .unwrap();
        let normalized = normalize(&table, LabelOrder::Sorted);

        assert_eq!(normalized.table.row(0), &[Some(0), Some(0)]);
        assert_eq!(normalized.table.row(1), &[None, Some(1)]);
    }

    #[test]
    fn test_nan_is_absent() {
        let table = AnnotationTable::from_columns(vec![
            ("a", vec![Some(Label::Float(f64::NAN)), Some(Label::Float(1.5))]),
            ("b", vec![Some(Label::Float(1.5)), None]),
        ])
        .unwrap();
        let normalized = normalize(&table, LabelOrder::Sorted);

        assert_eq!(normalized.dictionary.len(), 1);
        assert_eq!(normalized.table.row(0), &[None, Some(0)]);
    }

    #[test]
    fn test_first_seen_order() {
        let table = AnnotationTable::from_rows(
            vec!["a", "b"],
            vec![
                vec![Some(Label::from("neg")), Some(Label::from("pos"))],
                vec![Some(Label::from("neutral")), Some(Label::from("neg"))],
            ],
        )
        .unwrap();

        let first_seen = normalize(&table, LabelOrder::FirstSeen);
        assert_eq!(
            first_seen.dictionary.labels(),
            &[Label::from("neg"), Label::from("pos"), Label::from("neutral")]
        );

        let sorted = normalize(&table, LabelOrder::Sorted);
        assert_eq!(
            sorted.dictionary.labels(),
            &[Label::from("neg"), Label::from("neutral"), Label::from("pos")]
        );
    }

    #[test]
    fn test_deterministic() {
        let table = wikipedia_table();
        assert_eq!(
            normalize(&table, LabelOrder::FirstSeen),
            normalize(&table, LabelOrder::FirstSeen)
        );
        assert_eq!(
            normalize(&table, LabelOrder::Sorted),
            normalize(&table, LabelOrder::Sorted)
        );
    }

    #[test]
    fn test_dictionary_round_trip() {
        let table = AnnotationTable::from_rows(
            vec!["a"],
            vec![vec![Some(Label::from("x"))], vec![Some(Label::from(true))]],
        )
        .unwrap();
        let normalized = normalize(&table, LabelOrder::Sorted);

        for (code, label) in normalized.dictionary.iter() {
            assert_eq!(normalized.dictionary.code_of(label), Some(code));
        }

        let json = serde_json::to_string(&normalized.dictionary).unwrap();
        let back: LabelDictionary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, normalized.dictionary);

        let json = serde_json::to_string(&normalized).unwrap();
        let back: Normalized = serde_json::from_str(&json).unwrap();
        assert_eq!(back, normalized);
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_parts() {
        let repeated = serde_json::from_str::<LabelDictionary>(r#"["x", "y", "x"]"#);
        assert!(repeated.is_err());
        let numeric_repeat = serde_json::from_str::<LabelDictionary>("[1, 1.0]");
        assert!(numeric_repeat.is_err());

        let short_dictionary = r#"{
            "table": {"annotators": ["a"], "n_instances": 1, "n_labels": 2, "cells": [1]},
            "dictionary": ["x"]
        }"#;
        assert!(serde_json::from_str::<Normalized>(short_dictionary).is_err());
    }

    #[test]
    fn test_integral_floats_share_a_code_with_ints() {
        // Integer columns with gaps often arrive as floats
        let table = AnnotationTable::from_json_str(r#"{"a": [1, 2, 1], "b": [1.0, 2.0, null]}"#).unwrap();

        for order in [LabelOrder::Sorted, LabelOrder::FirstSeen] {
            let normalized = normalize(&table, order);
            assert_eq!(normalized.dictionary.len(), 2);
            assert_eq!(normalized.table.row(0), &[Some(0), Some(0)]);
            assert_eq!(normalized.table.row(1), &[Some(1), Some(1)]);
            assert_eq!(normalized.dictionary.code_of(&Label::Float(2.0)), Some(1));
        }

        let signed_zero = AnnotationTable::from_json_str(r#"{"a": [0.0], "b": [-0.0]}"#).unwrap();
        assert_eq!(normalize(&signed_zero, LabelOrder::Sorted).table.row(0), &[Some(0), Some(0)]);
    }
}
