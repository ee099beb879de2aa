//! Pairwise agreement: joint probability, Cohen's kappa, annotator matrices.

use disagree_core::Code;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{round_to, Metrics};
use crate::{Error, Result};

/// Pairwise statistics selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairwiseMetric {
    /// [`Metrics::joint_probability`]
    JointProbability,
    /// [`Metrics::cohens_kappa`]
    CohensKappa,
}

impl PairwiseMetric {
    /// Every pairwise metric.
    pub const ALL: [PairwiseMetric; 2] = [PairwiseMetric::JointProbability, PairwiseMetric::CohensKappa];

    /// Name accepted by `FromStr`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PairwiseMetric::JointProbability => "joint_probability",
            PairwiseMetric::CohensKappa => "cohens_kappa",
        }
    }
}

impl FromStr for PairwiseMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "joint_probability" => Ok(PairwiseMetric::JointProbability),
            "cohens_kappa" => Ok(PairwiseMetric::CohensKappa),
            other => Err(Error::invalid_callable_signature(other)),
        }
    }
}

impl fmt::Display for PairwiseMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Metrics<'_> {
    /// Code pairs on the instances both annotators labelled.
    ///
    /// # Errors
    ///
    /// `UnknownAnnotator` for a name that is not a column, `NoOverlap` if no
    /// instance carries both labels.
    pub(crate) fn overlap(&self, ann1: &str, ann2: &str) -> Result<Vec<(Code, Code)>> {
        let col1 = self.table.annotator_index(ann1)?;
        let col2 = self.table.annotator_index(ann2)?;

        let pairs: Vec<(Code, Code)> = self
            .table
            .rows()
            .filter_map(|row| Some((row[col1]?, row[col2]?)))
            .collect();

        if pairs.is_empty() {
            return Err(Error::no_overlap(ann1, ann2));
        }
        Ok(pairs)
    }

    /// Probability that two annotators give the same label to an instance
    /// they both labelled.
    ///
    /// The most basic (and least useful) pairwise agreement statistic.
    pub fn joint_probability(&self, ann1: &str, ann2: &str) -> Result<f64> {
        let pairs = self.overlap(ann1, ann2)?;
        let agree = pairs.iter().filter(|(a, b)| a == b).count();
        Ok(agree as f64 / pairs.len() as f64)
    }

    /// Cohen's kappa between two annotators.
    ///
    /// `(p_o - p_e) / (1 - p_e)` where `p_o` is the joint probability and
    /// `p_e = Σ_label n₁(label)·n₂(label) / N²` over the `N` shared
    /// instances. Returns `1.0` when `p_e == 1` (both annotators used one
    /// and the same label throughout).
    pub fn cohens_kappa(&self, ann1: &str, ann2: &str) -> Result<f64> {
        let pairs = self.overlap(ann1, ann2)?;
        let n_labels = self.table.n_labels();

        let mut counts1 = vec![0usize; n_labels];
        let mut counts2 = vec![0usize; n_labels];
        let mut agree = 0usize;
        for &(a, b) in &pairs {
            counts1[a] += 1;
            counts2[b] += 1;
            if a == b {
                agree += 1;
            }
        }

        let n = pairs.len();
        let chance: usize = counts1.iter().zip(&counts2).map(|(c1, c2)| c1 * c2).sum();
        if chance == n * n {
            return Ok(1.0);
        }

        let observed = agree as f64 / n as f64;
        let expected = chance as f64 / (n * n) as f64;
        Ok((observed - expected) / (1.0 - expected))
    }

    /// Apply a pairwise statistic to every ordered pair of annotators.
    ///
    /// Entry `[i][j]` is `pairwise(annotators[i], annotators[j])`, rounded to
    /// the configured decimal places (3 by default). The diagonal is
    /// included. The first error from `pairwise` aborts the matrix.
    pub fn metric_matrix<F>(&self, pairwise: F) -> Result<Array2<f64>>
    where
        F: Fn(&str, &str) -> Result<f64>,
    {
        let annotators = self.table.annotators();
        let n = annotators.len();
        let mut matrix = Array2::<f64>::zeros((n, n));

        for (i, ann1) in annotators.iter().enumerate() {
            for (j, ann2) in annotators.iter().enumerate() {
                let value = pairwise(ann1, ann2)?;
                matrix[[i, j]] = round_to(value, self.matrix_decimals);
            }
        }

        Ok(matrix)
    }

    /// Evaluate one named pairwise metric.
    pub fn pairwise(&self, metric: PairwiseMetric, ann1: &str, ann2: &str) -> Result<f64> {
        match metric {
            PairwiseMetric::JointProbability => self.joint_probability(ann1, ann2),
            PairwiseMetric::CohensKappa => self.cohens_kappa(ann1, ann2),
        }
    }

    /// [`Metrics::metric_matrix`] for a named metric.
    ///
    /// ```
    /// use disagree::{normalize, AnnotationTable, LabelOrder, Metrics};
    ///
    /// let table = AnnotationTable::from_json_str(r#"{"a": [0, 1], "b": [0, 0]}"#)?;
    /// let normalized = normalize(&table, LabelOrder::Sorted);
    /// let metrics = Metrics::new(&normalized.table);
    ///
    /// let matrix = metrics.metric_matrix_by_name("joint_probability")?;
    /// assert_eq!(matrix[[0, 1]], 0.5);
    /// assert!(metrics.metric_matrix_by_name("fleiss_kappa").is_err());
    /// # Ok::<(), disagree::Error>(())
    /// ```
    pub fn metric_matrix_by_name(&self, name: &str) -> Result<Array2<f64>> {
        let metric: PairwiseMetric = name.parse()?;
        self.metric_matrix(|a, b| self.pairwise(metric, a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use disagree_core::CanonicalTable;

    /// The 50-item yes/no example: 20 both-yes, 5 yes/no, 10 no/yes, 15 both-no.
    fn two_by_two() -> CanonicalTable {
        let mut rows = Vec::new();
        rows.extend(std::iter::repeat(vec![Some(1), Some(1)]).take(20));
        rows.extend(std::iter::repeat(vec![Some(1), Some(0)]).take(5));
        rows.extend(std::iter::repeat(vec![Some(0), Some(1)]).take(10));
        rows.extend(std::iter::repeat(vec![Some(0), Some(0)]).take(15));
        CanonicalTable::from_rows(vec!["a", "b"], rows, 2).unwrap()
    }

    #[test]
    fn test_cohens_kappa_two_by_two() {
        let table = two_by_two();
        let metrics = Metrics::new(&table);

        assert!((metrics.joint_probability("a", "b").unwrap() - 0.7).abs() < 1e-12);
        let kappa = metrics.cohens_kappa("a", "b").unwrap();
        assert!((kappa - 0.4).abs() < 1e-9, "kappa = {}", kappa);
    }

    #[test]
    fn test_kappa_symmetric() {
        let table = two_by_two();
        let metrics = Metrics::new(&table);
        let ab = metrics.cohens_kappa("a", "b").unwrap();
        let ba = metrics.cohens_kappa("b", "a").unwrap();
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn test_unanimous_single_label() {
        let table =
            CanonicalTable::from_rows(vec!["a", "b"], vec![vec![Some(0), Some(0)]; 4], 3).unwrap();
        let metrics = Metrics::new(&table);
        assert_eq!(metrics.cohens_kappa("a", "b").unwrap(), 1.0);
        assert_eq!(metrics.joint_probability("a", "b").unwrap(), 1.0);
    }

    #[test]
    fn test_overlap_ignores_absent() {
        let table = CanonicalTable::from_rows(
            vec!["a", "b"],
            vec![
                vec![Some(0), None],
                vec![Some(1), Some(1)],
                vec![None, Some(0)],
                vec![Some(0), Some(1)],
            ],
            2,
        )
        .unwrap();
        let metrics = Metrics::new(&table);
        assert_eq!(metrics.joint_probability("a", "b").unwrap(), 0.5);
    }

    #[test]
    fn test_no_overlap() {
        let table = CanonicalTable::from_rows(
            vec!["a", "b"],
            vec![vec![Some(0), None], vec![None, Some(0)]],
            1,
        )
        .unwrap();
        let metrics = Metrics::new(&table);

        match metrics.joint_probability("a", "b") {
            Err(Error::NoOverlap { first, second }) => {
                assert_eq!(first, "a");
                assert_eq!(second, "b");
            }
            other => panic!("expected NoOverlap, got {:?}", other),
        }
        assert!(matches!(
            metrics.cohens_kappa("a", "b"),
            Err(Error::NoOverlap { .. })
        ));
    }

    #[test]
    fn test_unknown_annotator() {
        let table = two_by_two();
        let metrics = Metrics::new(&table);
        assert!(matches!(
            metrics.joint_probability("a", "zed"),
            Err(Error::Core(disagree_core::Error::UnknownAnnotator { .. }))
        ));
    }

    #[test]
    fn test_metric_matrix_rounds() {
        let table = CanonicalTable::from_rows(
            vec!["a", "b"],
            vec![
                vec![Some(0), Some(0)],
                vec![Some(1), Some(0)],
                vec![Some(1), Some(1)],
            ],
            2,
        )
        .unwrap();
        let metrics = Metrics::new(&table);
        let matrix = metrics
            .metric_matrix(|a, b| metrics.joint_probability(a, b))
            .unwrap();

        assert_eq!(matrix[[0, 0]], 1.0);
        assert_eq!(matrix[[1, 1]], 1.0);
        assert_eq!(matrix[[0, 1]], 0.667);
        assert_eq!(matrix[[1, 0]], 0.667);

        let coarse = metrics.with_matrix_decimals(1);
        let matrix = coarse
            .metric_matrix(|a, b| coarse.joint_probability(a, b))
            .unwrap();
        assert_eq!(matrix[[0, 1]], 0.7);
    }

    #[test]
    fn test_metric_matrix_propagates_errors() {
        let table = CanonicalTable::from_rows(
            vec!["a", "b"],
            vec![vec![Some(0), None], vec![None, Some(0)]],
            1,
        )
        .unwrap();
        let metrics = Metrics::new(&table);
        let result = metrics.metric_matrix(|a, b| metrics.joint_probability(a, b));
        assert!(matches!(result, Err(Error::NoOverlap { .. })));
    }

    #[test]
    fn test_pairwise_metric_names() {
        for metric in PairwiseMetric::ALL {
            assert_eq!(metric.name().parse::<PairwiseMetric>().unwrap(), metric);
        }
        assert!(matches!(
            "correlation".parse::<PairwiseMetric>(),
            Err(Error::InvalidCallableSignature(_))
        ));
    }
}
