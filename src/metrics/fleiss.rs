//! Fleiss' kappa.
//!
//! Chance-corrected agreement for any number of annotators on nominal
//! labels. Instances may have different numbers of annotations; each
//! instance's agreement extent uses its own rater count.

use ndarray::{Array2, Axis};

use super::Metrics;

impl Metrics<'_> {
    /// Instances × labels table of how many annotators chose each label.
    ///
    /// Row sums equal the number of annotations on that instance.
    #[must_use]
    pub fn label_count_table(&self) -> Array2<usize> {
        let mut counts = Array2::<usize>::zeros((self.table.n_instances(), self.table.n_labels()));
        for (k, mut row) in counts.axis_iter_mut(Axis(0)).enumerate() {
            for code in self.table.present(k) {
                row[code] += 1;
            }
        }
        counts
    }

    /// Proportion of all annotations assigned to each label (`p_j`).
    ///
    /// All zeros when the table holds no annotations.
    #[must_use]
    pub fn category_proportions(&self) -> Vec<f64> {
        proportions(&self.label_count_table().sum_axis(Axis(0)).to_vec())
    }

    /// Extent to which annotators agree on each instance (`P_i`).
    ///
    /// `(Σ_j n_ij² − m) / (m (m − 1))` for an instance with `m` annotations;
    /// `0.0` when `m ≤ 1`.
    #[must_use]
    pub fn rater_agreement_extent(&self) -> Vec<f64> {
        self.label_count_table()
            .axis_iter(Axis(0))
            .map(|row| {
                let m: usize = row.sum();
                if m <= 1 {
                    return 0.0;
                }
                let squares: usize = row.iter().map(|&c| c * c).sum();
                (squares - m) as f64 / (m * (m - 1)) as f64
            })
            .collect()
    }

    /// Fleiss' kappa across all annotators.
    ///
    /// `(P̄ − P̄_e) / (1 − P̄_e)` with `P̄` the mean agreement extent over all
    /// instances and `P̄_e = Σ_j p_j²`. Returns `1.0` when a single label
    /// received every annotation (`P̄_e == 1`) or when there are no
    /// annotations at all.
    #[must_use]
    pub fn fleiss_kappa(&self) -> f64 {
        let column_sums = self.label_count_table().sum_axis(Axis(0)).to_vec();
        let total: usize = column_sums.iter().sum();

        if total == 0 || column_sums.iter().any(|&c| c == total) {
            log::debug!("Fleiss' kappa: no chance disagreement possible (total={})", total);
            return 1.0;
        }

        let extents = self.rater_agreement_extent();
        let mean_agreement = extents.iter().sum::<f64>() / extents.len() as f64;
        let chance_agreement: f64 = proportions(&column_sums).iter().map(|p| p * p).sum();

        (mean_agreement - chance_agreement) / (1.0 - chance_agreement)
    }
}

fn proportions(column_sums: &[usize]) -> Vec<f64> {
    let total: usize = column_sums.iter().sum();
    if total == 0 {
        return vec![0.0; column_sums.len()];
    }
    column_sums
        .iter()
        .map(|&c| c as f64 / total as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use disagree_core::{CanonicalTable, Code};

    /// Expand per-label counts into one row of annotator codes.
    fn expand(counts: &[usize]) -> Vec<Option<Code>> {
        counts
            .iter()
            .enumerate()
            .flat_map(|(code, &c)| std::iter::repeat(Some(code)).take(c))
            .collect()
    }

    /// Ten instances, fourteen annotators, five categories.
    fn fleiss_example() -> CanonicalTable {
        let counts = [
            [0, 0, 0, 0, 14],
            [0, 2, 6, 4, 2],
            [0, 0, 3, 5, 6],
            [0, 3, 9, 2, 0],
            [2, 2, 8, 1, 1],
            [7, 7, 0, 0, 0],
            [3, 2, 6, 3, 0],
            [2, 5, 3, 2, 2],
            [6, 5, 2, 1, 0],
            [0, 2, 2, 3, 7],
        ];
        let rows = counts.iter().map(|c| expand(c)).collect();
        let annotators: Vec<String> = (0..14).map(|i| format!("r{}", i)).collect();
        CanonicalTable::from_rows(annotators, rows, 5).unwrap()
    }

    #[test]
    fn test_fleiss_example() {
        let table = fleiss_example();
        let metrics = Metrics::new(&table);

        let kappa = metrics.fleiss_kappa();
        assert!((kappa - 0.210).abs() < 5e-4, "kappa = {}", kappa);

        let p = metrics.category_proportions();
        assert!((p[0] - 0.143).abs() < 1e-3);
        assert!((p[2] - 0.279).abs() < 1e-3);

        let extents = metrics.rater_agreement_extent();
        assert_eq!(extents[0], 1.0);
        assert!((extents[1] - 0.253).abs() < 1e-3);
    }

    #[test]
    fn test_label_count_table_rows_sum_to_raters() {
        let table = CanonicalTable::from_rows(
            vec!["a", "b", "c"],
            vec![
                vec![Some(0), Some(1), None],
                vec![None, None, None],
                vec![Some(2), Some(2), Some(2)],
            ],
            3,
        )
        .unwrap();
        let metrics = Metrics::new(&table);
        let counts = metrics.label_count_table();

        let row_sums = counts.sum_axis(Axis(1)).to_vec();
        assert_eq!(row_sums, table.labels_per_instance());
        assert_eq!(counts[[2, 2]], 3);
    }

    #[test]
    fn test_single_rater_instances_contribute_zero() {
        let table = CanonicalTable::from_rows(
            vec!["a", "b"],
            vec![vec![Some(0), None], vec![Some(1), Some(1)]],
            2,
        )
        .unwrap();
        let extents = Metrics::new(&table).rater_agreement_extent();
        assert_eq!(extents, vec![0.0, 1.0]);
    }

    #[test]
    fn test_unanimous() {
        let table = CanonicalTable::from_rows(
            vec!["a", "b", "c"],
            vec![
                vec![Some(0), Some(0), Some(0)],
                vec![Some(1), Some(1), Some(1)],
                vec![Some(2), Some(2), None],
            ],
            3,
        )
        .unwrap();
        let kappa = Metrics::new(&table).fleiss_kappa();
        assert!((kappa - 1.0).abs() < 1e-12, "kappa = {}", kappa);
    }

    #[test]
    fn test_single_label_everywhere() {
        let table =
            CanonicalTable::from_rows(vec!["a", "b"], vec![vec![Some(0), Some(0)]; 3], 1).unwrap();
        assert_eq!(Metrics::new(&table).fleiss_kappa(), 1.0);
    }

    #[test]
    fn test_empty_table() {
        let table = CanonicalTable::from_rows(vec!["a", "b"], vec![vec![None, None]], 0).unwrap();
        assert_eq!(Metrics::new(&table).fleiss_kappa(), 1.0);
    }
}
