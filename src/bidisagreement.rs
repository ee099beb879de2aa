//! Absolute disagreement analysis.
//!
//! Classifies each instance by how many distinct labels its annotators used,
//! and records which label pairs annotators confuse.
//!
//! # Degrees
//!
//! | distinct labels | bucket |
//! |-----------------|--------|
//! | 1 | full agreement |
//! | 2 | bidisagreement |
//! | 3 | tridisagreement |
//! | 4+ | more |
//!
//! Instances with fewer than two annotations have no degree and are left out
//! of both the summary and the matrix.
//!
//! # Known limitation
//!
//! The bidisagreement matrix only records instances with exactly two
//! distinct labels. Three-way and wider disagreements are counted by
//! [`BiDisagreements::summarize`] but leave no trace in
//! [`BiDisagreements::agreement_matrix`].
//!
//! # Example
//!
//! ```rust
//! use disagree::{normalize, AnnotationTable, BiDisagreements, LabelOrder};
//!
//! let table = AnnotationTable::from_json_str(
//!     r#"{"olly": [0, 1, null, 3], "rob": [0, 1, 1, 3], "cal": [0, 1, 2, 3]}"#,
//! )?;
//! let normalized = normalize(&table, LabelOrder::Sorted);
//! let bidis = BiDisagreements::new(&normalized.table);
//!
//! let summary = bidis.summarize();
//! assert_eq!(summary.full_agreement, 3);
//! assert_eq!(summary.bidisagreement, 1);
//!
//! let matrix = bidis.agreement_matrix(false);
//! assert_eq!(matrix[[1, 2]], 1.0);
//! assert_eq!(matrix[[2, 1]], 1.0);
//! # Ok::<(), disagree::Error>(())
//! ```

use disagree_core::{CanonicalTable, Code};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instance counts per disagreement degree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementSummary {
    /// Instances where every annotator used the same label
    pub full_agreement: usize,
    /// Instances with exactly two distinct labels
    pub bidisagreement: usize,
    /// Instances with exactly three distinct labels
    pub tridisagreement: usize,
    /// Instances with four or more distinct labels
    pub more: usize,
}

impl AgreementSummary {
    /// Number of instances with at least two annotations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.full_agreement + self.bidisagreement + self.tridisagreement + self.more
    }
}

impl fmt::Display for AgreementSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of instances with:")?;
        writeln!(f, "=========================")?;
        writeln!(f, "No disagreement: {}", self.full_agreement)?;
        writeln!(f, "Bidisagreement: {}", self.bidisagreement)?;
        writeln!(f, "Tridisagreement: {}", self.tridisagreement)?;
        write!(f, "More disagreements: {}", self.more)
    }
}

/// Disagreement analyzer over a canonical table.
#[derive(Debug, Clone, Copy)]
pub struct BiDisagreements<'a> {
    table: &'a CanonicalTable,
}

impl<'a> BiDisagreements<'a> {
    /// Create an analyzer. The table is only read.
    pub fn new(table: &'a CanonicalTable) -> Self {
        Self { table }
    }

    /// Sorted distinct codes on an instance, or `None` with fewer than two annotations.
    fn distinct_labels(&self, row: usize) -> Option<Vec<Code>> {
        let mut codes: Vec<Code> = self.table.present(row).collect();
        if codes.len() <= 1 {
            return None;
        }
        codes.sort_unstable();
        codes.dedup();
        Some(codes)
    }

    /// Number of distinct labels on each instance.
    ///
    /// `None` for instances with zero or one annotation.
    #[must_use]
    pub fn instance_degrees(&self) -> Vec<Option<usize>> {
        (0..self.table.n_instances())
            .map(|k| self.distinct_labels(k).map(|codes| codes.len()))
            .collect()
    }

    /// Bucket instances by disagreement degree.
    #[must_use]
    pub fn summarize(&self) -> AgreementSummary {
        let mut summary = AgreementSummary::default();
        for degree in self.instance_degrees().into_iter().flatten() {
            match degree {
                1 => summary.full_agreement += 1,
                2 => summary.bidisagreement += 1,
                3 => summary.tridisagreement += 1,
                _ => summary.more += 1,
            }
        }
        summary
    }

    /// Symmetric `n_labels × n_labels` matrix of bidisagreement counts.
    ///
    /// `[i][j]` and `[j][i]` both count the instances labelled with exactly
    /// `{i, j}`. With `normalise`, cells are divided by the number of
    /// bidisagreements so the matrix sums to 2. A table without any
    /// bidisagreement returns the zero matrix either way.
    #[must_use]
    pub fn agreement_matrix(&self, normalise: bool) -> Array2<f64> {
        let n = self.table.n_labels();
        let mut matrix = Array2::<f64>::zeros((n, n));

        for k in 0..self.table.n_instances() {
            if let Some(codes) = self.distinct_labels(k) {
                if let [i, j] = codes[..] {
                    matrix[[i, j]] += 1.0;
                    matrix[[j, i]] += 1.0;
                }
            }
        }

        if normalise {
            let total = matrix.sum() / 2.0;
            if total == 0.0 {
                log::warn!("No bidisagreements found; returning unnormalised zero matrix");
            } else {
                matrix.mapv_inplace(|count| count / total);
            }
        }

        matrix
    }
}
