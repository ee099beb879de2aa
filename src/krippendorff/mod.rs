//! Krippendorff's alpha.
//!
//! # Method
//!
//! ```text
//! α = 1 − D_o / D_e
//!
//! D_o = Σ_{v1 > v2} o[v1, v2] · δ(v1, v2)
//! D_e = Σ_{v1 > v2} n_v1 · n_v2 · δ(v1, v2) / (n − 1)
//! ```
//!
//! where `o` is the coincidence matrix, `n_v` its row sums and `n` the
//! total number of pairable annotations. Instances with fewer than two
//! annotations are not pairable and drop out entirely.
//!
//! Both sums visit the lower triangle in ascending `(v1, v2)` order so the
//! result is reproducible bit for bit across runs.
//!
//! # Example
//!
//! ```
//! use disagree::{normalize, AnnotationTable, DistanceKind, Krippendorff, LabelOrder};
//!
//! let table = AnnotationTable::from_json_str(
//!     r#"{"a": [1, 2, 3, 3], "b": [1, 2, 3, 3], "c": [null, 2, 3, 1]}"#,
//! )?;
//! let normalized = normalize(&table, LabelOrder::Sorted);
//! let kripp = Krippendorff::new(&normalized.table);
//!
//! let alpha = kripp.alpha(DistanceKind::Nominal);
//! assert!(alpha > 0.0 && alpha < 1.0);
//! # Ok::<(), disagree::Error>(())
//! ```

mod coincidence;
mod distance;

pub use distance::DistanceKind;

use disagree_core::{CanonicalTable, Code};
use ndarray::{Array1, Array2, Axis};

/// Alpha engine over one canonical table.
///
/// Built once; the coincidence matrix and its marginals are shared by every
/// distance kind.
#[derive(Debug, Clone)]
pub struct Krippendorff {
    labels_per_instance: Vec<usize>,
    coincidence: Array2<f64>,
    coincidence_sum: Array1<f64>,
}

impl Krippendorff {
    /// Precompute the coincidence matrix for `table`.
    #[must_use]
    pub fn new(table: &CanonicalTable) -> Self {
        let labels_per_instance = table.labels_per_instance();
        let coincidence = coincidence::coincidence_matrix(table);
        let coincidence_sum = coincidence.sum_axis(Axis(1));

        log::debug!(
            "Krippendorff: {} instances, {} labels, {:.3} pairable values",
            table.n_instances(),
            table.n_labels(),
            coincidence_sum.sum()
        );

        Self {
            labels_per_instance,
            coincidence,
            coincidence_sum,
        }
    }

    /// Number of label codes (matrix dimension).
    #[must_use]
    pub fn n_labels(&self) -> usize {
        self.coincidence.nrows()
    }

    /// The symmetric `labels × labels` coincidence matrix.
    #[must_use]
    pub fn coincidence_matrix(&self) -> &Array2<f64> {
        &self.coincidence
    }

    /// Row sums of the coincidence matrix (`n_v`).
    #[must_use]
    pub fn coincidence_sum(&self) -> &Array1<f64> {
        &self.coincidence_sum
    }

    /// Annotation count per instance.
    #[must_use]
    pub fn labels_per_instance(&self) -> &[usize] {
        &self.labels_per_instance
    }

    /// Total pairable annotations (`n`).
    #[must_use]
    pub fn total_pairable(&self) -> f64 {
        self.coincidence_sum.sum()
    }

    /// `δ(v1, v2)` under this table's marginals.
    ///
    /// # Panics
    ///
    /// For the ordinal kind, if either code is `>= n_labels()`.
    #[must_use]
    pub fn distance(&self, kind: DistanceKind, v1: Code, v2: Code) -> f64 {
        distance::distance(kind, &self.coincidence_sum, v1, v2)
    }

    /// Observed disagreement `D_o`.
    #[must_use]
    pub fn observed_disagreement(&self, kind: DistanceKind) -> f64 {
        let mut total = 0.0;
        for v1 in 0..self.n_labels() {
            for v2 in 0..v1 {
                let o = self.coincidence[[v1, v2]];
                if o != 0.0 {
                    total += o * self.distance(kind, v1, v2);
                }
            }
        }
        total
    }

    /// Expected disagreement `D_e`; `0.0` with fewer than two pairable values.
    #[must_use]
    pub fn expected_disagreement(&self, kind: DistanceKind) -> f64 {
        let n = self.total_pairable();
        if n <= 1.0 {
            return 0.0;
        }
        let mut total = 0.0;
        for v1 in 0..self.n_labels() {
            for v2 in 0..v1 {
                total += self.coincidence_sum[v1] * self.coincidence_sum[v2] * self.distance(kind, v1, v2);
            }
        }
        total / (n - 1.0)
    }

    /// Krippendorff's alpha for the given level of measurement.
    ///
    /// `1.0` when expected disagreement is zero (no variation in the
    /// pairable data, or nothing pairable at all).
    #[must_use]
    pub fn alpha(&self, kind: DistanceKind) -> f64 {
        let expected = self.expected_disagreement(kind);
        if expected == 0.0 {
            log::debug!("Krippendorff {}: no expected disagreement", kind);
            return 1.0;
        }
        1.0 - self.observed_disagreement(kind) / expected
    }
}
