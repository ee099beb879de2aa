//! Coincidence matrix construction.
//!
//! For an instance with `m ≥ 2` annotations and label counts `c`, every
//! ordered pair of distinct annotators `(p, q)` votes once for
//! `(code(p), code(q))`, weighted by `1 / (m − 1)`. Counting ordered pairs
//! directly from `c`:
//!
//! ```text
//! pairs(i, j) = c_i · c_j          (i ≠ j)
//! pairs(i, i) = c_i · (c_i − 1)
//! ```
//!
//! Each unordered annotator pair is counted twice, once per direction, so
//! the matrix is symmetric and its total equals the number of pairable
//! annotations.

use disagree_core::CanonicalTable;
use ndarray::Array2;

/// Add one instance's weighted pair counts to `matrix`.
fn accumulate_instance(counts: &[usize], matrix: &mut Array2<f64>) {
    let m: usize = counts.iter().sum();
    if m < 2 {
        return;
    }
    let weight = 1.0 / (m - 1) as f64;

    for (i, &ci) in counts.iter().enumerate() {
        if ci == 0 {
            continue;
        }
        for (j, &cj) in counts.iter().enumerate() {
            let pairs = if i == j { ci * (ci - 1) } else { ci * cj };
            if pairs > 0 {
                matrix[[i, j]] += pairs as f64 * weight;
            }
        }
    }
}

/// Build the coincidence matrix, summing instances in ascending order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn coincidence_matrix(table: &CanonicalTable) -> Array2<f64> {
    let n = table.n_labels();
    let mut matrix = Array2::<f64>::zeros((n, n));
    for k in 0..table.n_instances() {
        accumulate_instance(&table.label_counts(k), &mut matrix);
    }
    matrix
}

/// Build the coincidence matrix with instances partitioned across threads.
///
/// Partial matrices are reduced in an unspecified order, so results can
/// differ from the sequential build in the last bits.
#[cfg(feature = "parallel")]
pub(crate) fn coincidence_matrix(table: &CanonicalTable) -> Array2<f64> {
    use rayon::prelude::*;

    let n = table.n_labels();
    (0..table.n_instances())
        .into_par_iter()
        .fold(
            || Array2::<f64>::zeros((n, n)),
            |mut matrix, k| {
                accumulate_instance(&table.label_counts(k), &mut matrix);
                matrix
            },
        )
        .reduce(|| Array2::<f64>::zeros((n, n)), |a, b| a + b)
}
