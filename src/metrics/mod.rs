//! Agreement metrics over a canonical table.
//!
//! [`Metrics`] borrows a [`CanonicalTable`] and computes:
//!
//! - **Joint probability**: raw pairwise agreement rate
//! - **Cohen's kappa**: pairwise agreement corrected for chance
//! - **Fleiss' kappa**: chance-corrected agreement across all annotators
//! - **Correlation**: Pearson, Spearman, or Kendall between two annotators
//!
//! Pairwise statistics only look at instances both annotators labelled.
//! Correlation also needs the label values behind the codes, so it requires
//! an engine built with [`Metrics::from_normalized`] or
//! [`Metrics::with_dictionary`].
//!
//! # Example
//!
//! ```rust
//! use disagree::{normalize, AnnotationTable, LabelOrder, Metrics};
//!
//! let table = AnnotationTable::from_json_str(
//!     r#"{"a": ["yes", "yes", "no", null], "b": ["yes", "no", "no", "no"]}"#,
//! )?;
//! let normalized = normalize(&table, LabelOrder::Sorted);
//! let metrics = Metrics::from_normalized(&normalized);
//!
//! let jp = metrics.joint_probability("a", "b")?;
//! assert!((jp - 2.0 / 3.0).abs() < 1e-12);
//!
//! let matrix = metrics.metric_matrix(|a, b| metrics.cohens_kappa(a, b))?;
//! assert_eq!(matrix.shape(), &[2, 2]);
//! # Ok::<(), disagree::Error>(())
//! ```

mod correlation;
mod fleiss;
mod pairwise;

pub use correlation::{kendall_tau, pearson, spearman, Correlation, CorrelationMeasure};
pub use pairwise::PairwiseMetric;

use disagree_core::{CanonicalTable, LabelDictionary, Normalized};

/// Default decimal places for annotator × annotator matrices.
pub const DEFAULT_MATRIX_DECIMALS: u32 = 3;

/// Agreement metrics engine.
#[derive(Debug, Clone, Copy)]
pub struct Metrics<'a> {
    table: &'a CanonicalTable,
    dictionary: Option<&'a LabelDictionary>,
    matrix_decimals: u32,
}

impl<'a> Metrics<'a> {
    /// Create an engine over a canonical table. The table is only read.
    pub fn new(table: &'a CanonicalTable) -> Self {
        Self {
            table,
            dictionary: None,
            matrix_decimals: DEFAULT_MATRIX_DECIMALS,
        }
    }

    /// Create an engine over normalized annotations, keeping the dictionary
    /// so that correlation sees label values rather than codes.
    pub fn from_normalized(normalized: &'a Normalized) -> Self {
        Self::new(&normalized.table).with_dictionary(&normalized.dictionary)
    }

    /// Attach the dictionary that maps this table's codes back to labels.
    pub fn with_dictionary(mut self, dictionary: &'a LabelDictionary) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    /// Set the decimal places kept by [`Metrics::metric_matrix`].
    pub fn with_matrix_decimals(mut self, decimals: u32) -> Self {
        self.matrix_decimals = decimals;
        self
    }

    /// Decimal places kept in metric matrices.
    #[must_use]
    pub fn matrix_decimals(&self) -> u32 {
        self.matrix_decimals
    }

    /// The table this engine reads.
    #[must_use]
    pub fn table(&self) -> &'a CanonicalTable {
        self.table
    }

    /// The code to label mapping, if one was attached.
    #[must_use]
    pub fn dictionary(&self) -> Option<&'a LabelDictionary> {
        self.dictionary
    }
}

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
