//! Unified agreement report.
//!
//! Runs every engine over one table and collects the results in a single
//! serializable structure.
//!
//! # Example
//!
//! ```rust
//! use disagree::{AgreementConfig, AgreementReport, AnnotationTable};
//!
//! let table = AnnotationTable::from_json_str(
//!     r#"{"a": [0, 1, 1, 2], "b": [0, 1, 2, 2], "c": [0, null, 1, 2]}"#,
//! )?;
//! let report = AgreementReport::build(&table, &AgreementConfig::default())?;
//!
//! assert_eq!(report.annotators, vec!["a", "b", "c"]);
//! assert_eq!(report.summary.full_agreement, 3);
//! println!("{}", report.summary());
//! # Ok::<(), disagree::Error>(())
//! ```

use disagree_core::{normalize, AnnotationTable};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bidisagreement::{AgreementSummary, BiDisagreements};
use crate::config::AgreementConfig;
use crate::interpret::{alpha_reliability, kappa_interpretation, AlphaReliability};
use crate::krippendorff::{DistanceKind, Krippendorff};
use crate::metrics::{round_to, Metrics, PairwiseMetric};
use crate::{Error, Result};

/// Krippendorff's alpha under one level of measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphaResult {
    /// Level of measurement
    pub distance: DistanceKind,
    /// Alpha coefficient
    pub alpha: f64,
    /// Reliability verdict for `alpha`
    pub reliability: AlphaReliability,
}

/// Every agreement statistic for one annotation table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgreementReport {
    /// Annotator names, in column order
    pub annotators: Vec<String>,

    /// Display form of each label, indexed by code
    pub labels: Vec<String>,

    /// Number of instances (rows)
    pub n_instances: usize,

    /// Instances per disagreement degree
    pub summary: AgreementSummary,

    /// Label × label bidisagreement matrix
    pub bidisagreement_matrix: Array2<f64>,

    /// Annotator × annotator joint probability; `None` where a pair shares no instance
    pub joint_probability: Vec<Vec<Option<f64>>>,

    /// Annotator × annotator Cohen's kappa; `None` where a pair shares no instance
    pub cohens_kappa: Vec<Vec<Option<f64>>>,

    /// Fleiss' kappa across all annotators
    pub fleiss_kappa: f64,

    /// Landis & Koch band for `fleiss_kappa`
    pub fleiss_interpretation: String,

    /// Krippendorff's alpha for every distance kind
    pub alpha: Vec<AlphaResult>,

    /// Notes generated while building (e.g. annotator pairs without overlap)
    pub warnings: Vec<String>,
}

impl AgreementReport {
    /// Normalize `table` once and run every engine over it.
    ///
    /// # Errors
    ///
    /// Pairs without overlap do not fail the build; any other engine error
    /// is returned.
    pub fn build(table: &AnnotationTable, config: &AgreementConfig) -> Result<Self> {
        let normalized = normalize(table, config.label_order);
        let canonical = &normalized.table;

        log::debug!(
            "Building agreement report: {} instances, {} annotators, {} labels",
            canonical.n_instances(),
            canonical.n_annotators(),
            canonical.n_labels()
        );

        let bidis = BiDisagreements::new(canonical);
        let metrics = Metrics::from_normalized(&normalized).with_matrix_decimals(config.matrix_decimals);
        let kripp = Krippendorff::new(canonical);

        let joint_probability = pairwise_matrix(&metrics, PairwiseMetric::JointProbability)?;
        let cohens_kappa = pairwise_matrix(&metrics, PairwiseMetric::CohensKappa)?;

        let annotators = canonical.annotators();
        let mut warnings = Vec::new();
        for (i, row) in joint_probability.iter().enumerate() {
            for (j, value) in row.iter().enumerate().skip(i + 1) {
                if value.is_none() {
                    warnings.push(format!(
                        "{} and {} share no instances",
                        annotators[i], annotators[j]
                    ));
                }
            }
        }

        let fleiss_kappa = metrics.fleiss_kappa();
        let alpha = DistanceKind::ALL
            .iter()
            .map(|&distance| {
                let alpha = kripp.alpha(distance);
                AlphaResult {
                    distance,
                    alpha,
                    reliability: alpha_reliability(alpha),
                }
            })
            .collect();

        Ok(Self {
            annotators: annotators.to_vec(),
            labels: normalized.dictionary.labels().iter().map(ToString::to_string).collect(),
            n_instances: canonical.n_instances(),
            summary: bidis.summarize(),
            bidisagreement_matrix: bidis.agreement_matrix(config.normalise_bidisagreements),
            joint_probability,
            cohens_kappa,
            fleiss_kappa,
            fleiss_interpretation: kappa_interpretation(fleiss_kappa).to_string(),
            alpha,
            warnings,
        })
    }

    /// Alpha for one distance kind.
    pub fn alpha_for(&self, distance: DistanceKind) -> Option<f64> {
        self.alpha
            .iter()
            .find(|result| result.distance == distance)
            .map(|result| result.alpha)
    }

    /// Generate a human-readable summary.
    pub fn summary(&self) -> String {
        let mut out = String::new();

        out.push_str("=== Agreement Report ===\n");
        out.push_str(&format!(
            "{} instances, {} annotators, {} labels\n\n",
            self.n_instances,
            self.annotators.len(),
            self.labels.len()
        ));

        out.push_str("## Disagreement\n");
        for line in self.summary.to_string().lines() {
            out.push_str(&format!("  {}\n", line));
        }
        out.push('\n');
        out.push_str(&render_matrix(&self.bidisagreement_matrix, &self.labels, 3));
        out.push('\n');

        out.push_str("## Joint Probability\n");
        out.push_str(&render_optional(&self.joint_probability, &self.annotators));
        out.push('\n');

        out.push_str("## Cohen's Kappa\n");
        out.push_str(&render_optional(&self.cohens_kappa, &self.annotators));
        out.push('\n');

        out.push_str("## Fleiss' Kappa\n");
        out.push_str(&format!(
            "  {:.3} ({})\n\n",
            self.fleiss_kappa, self.fleiss_interpretation
        ));

        out.push_str("## Krippendorff's Alpha\n");
        for result in &self.alpha {
            out.push_str(&format!(
                "  {:10} {:.3} ({})\n",
                result.distance.name(),
                result.alpha,
                result.reliability
            ));
        }

        if !self.warnings.is_empty() {
            out.push_str("\n## Warnings\n");
            for warning in &self.warnings {
                out.push_str(&format!("  - {}\n", warning));
            }
        }

        out
    }

    /// Export report as JSON.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self).map_err(disagree_core::Error::from)?;
        Ok(json)
    }
}

impl fmt::Display for AgreementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Evaluate a pairwise metric over every annotator pair, recording pairs
/// without overlap as `None`.
fn pairwise_matrix(metrics: &Metrics<'_>, metric: PairwiseMetric) -> Result<Vec<Vec<Option<f64>>>> {
    let annotators = metrics.table().annotators();
    let mut rows = Vec::with_capacity(annotators.len());

    for ann1 in annotators {
        let mut row = Vec::with_capacity(annotators.len());
        for ann2 in annotators {
            match metrics.pairwise(metric, ann1, ann2) {
                Ok(value) => row.push(Some(round_to(value, metrics.matrix_decimals()))),
                Err(Error::NoOverlap { .. }) => row.push(None),
                Err(e) => return Err(e),
            }
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Render a square matrix with `axis` naming both rows and columns.
///
/// ```
/// use disagree::report::render_matrix;
/// use ndarray::array;
///
/// let out = render_matrix(&array![[1.0, 0.5], [0.5, 1.0]], &["x".to_string(), "y".to_string()], 2);
/// assert!(out.contains("0.50"));
/// ```
pub fn render_matrix(matrix: &Array2<f64>, axis: &[String], decimals: usize) -> String {
    render_grid(axis, |i, j| {
        matrix
            .get((i, j))
            .map_or_else(String::new, |v| format!("{:.*}", decimals, v))
    })
}

fn render_optional(matrix: &[Vec<Option<f64>>], axis: &[String]) -> String {
    render_grid(axis, |i, j| {
        match matrix.get(i).and_then(|row| row.get(j)).copied().flatten() {
            Some(v) => format!("{:.3}", v),
            None => "-".to_string(),
        }
    })
}

fn render_grid<F>(axis: &[String], cell: F) -> String
where
    F: Fn(usize, usize) -> String,
{
    let cells: Vec<Vec<String>> = (0..axis.len())
        .map(|i| (0..axis.len()).map(|j| cell(i, j)).collect())
        .collect();

    let width = axis
        .iter()
        .map(String::len)
        .chain(cells.iter().flatten().map(String::len))
        .max()
        .unwrap_or(0);

    let mut out = format!("  {:>width$}", "", width = width);
    for name in axis {
        out.push_str(&format!(" {:>width$}", name, width = width));
    }
    out.push('\n');

    for (name, row) in axis.iter().zip(&cells) {
        out.push_str(&format!("  {:>width$}", name, width = width));
        for value in row {
            out.push_str(&format!(" {:>width$}", value, width = width));
        }
        out.push('\n');
    }
    out
}
