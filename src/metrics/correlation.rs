//! Correlation between two annotators' labels.
//!
//! Appropriate when labels are numeric (ratings, scales). Computed over the
//! label values of instances both annotators labelled, so the result does
//! not depend on how labels were coded. Booleans count as 1 and 0.
//!
//! p-values are two-sided:
//! - Pearson and Spearman: Student's t with `n − 2` degrees of freedom
//! - Kendall tau-b: normal approximation with tie-corrected variance
//!
//! Small samples give unreliable p-values.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::function::erf::erfc;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::Metrics;
use crate::{Code, Error, LabelDictionary, Result};

/// Correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationMeasure {
    /// Pearson r (assumes interval data)
    Pearson,
    /// Spearman rho (ordinal data)
    Spearman,
    /// Kendall tau-b (ordinal data)
    Kendall,
}

impl FromStr for CorrelationMeasure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pearson" => Ok(CorrelationMeasure::Pearson),
            "spearman" => Ok(CorrelationMeasure::Spearman),
            "kendall" => Ok(CorrelationMeasure::Kendall),
            other => Err(Error::invalid_measure(other)),
        }
    }
}

impl fmt::Display for CorrelationMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CorrelationMeasure::Pearson => "pearson",
            CorrelationMeasure::Spearman => "spearman",
            CorrelationMeasure::Kendall => "kendall",
        })
    }
}

/// A correlation coefficient with its p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    /// Coefficient in `[-1, 1]`
    pub coefficient: f64,
    /// Two-sided p-value for the null hypothesis of no correlation
    pub p_value: f64,
}

impl Metrics<'_> {
    /// Correlation between two annotators over their shared instances.
    ///
    /// # Errors
    ///
    /// `UnknownAnnotator`, `NoOverlap`, or `UndefinedStatistic` when fewer
    /// than two instances are shared or one annotator's labels are constant.
    /// `InvalidInputKind` when the engine has no label dictionary or a shared
    /// label is not numeric.
    pub fn correlation(
        &self,
        ann1: &str,
        ann2: &str,
        measure: CorrelationMeasure,
    ) -> Result<Correlation> {
        let overlap = self.overlap(ann1, ann2)?;
        let dictionary = self.dictionary.ok_or_else(|| {
            disagree_core::Error::invalid_input_kind(
                "correlation needs label values; build the engine with Metrics::from_normalized",
            )
        })?;

        let mut x = Vec::with_capacity(overlap.len());
        let mut y = Vec::with_capacity(overlap.len());
        for (a, b) in overlap {
            x.push(numeric_value(dictionary, a)?);
            y.push(numeric_value(dictionary, b)?);
        }

        match measure {
            CorrelationMeasure::Pearson => pearson(&x, &y),
            CorrelationMeasure::Spearman => spearman(&x, &y),
            CorrelationMeasure::Kendall => kendall_tau(&x, &y),
        }
    }
}

fn numeric_value(dictionary: &LabelDictionary, code: Code) -> Result<f64> {
    let label = dictionary.label_of(code).ok_or_else(|| {
        disagree_core::Error::invalid_input_kind(format!(
            "code {} is not in the label dictionary",
            code
        ))
    })?;
    label.as_f64().ok_or_else(|| {
        disagree_core::Error::invalid_input_kind(format!(
            "correlation needs numeric labels, found '{}'",
            label
        ))
        .into()
    })
}

fn check_samples(x: &[f64], y: &[f64]) -> Result<usize> {
    if x.len() != y.len() {
        return Err(Error::undefined_statistic(format!(
            "samples differ in length ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(Error::undefined_statistic(format!(
            "correlation needs at least two paired values, got {}",
            x.len()
        )));
    }
    Ok(x.len())
}

fn t_test_p_value(r: f64, n: usize) -> Result<f64> {
    if n == 2 {
        return Ok(1.0);
    }
    if r.abs() >= 1.0 {
        return Ok(0.0);
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| Error::undefined_statistic(e.to_string()))?;
    Ok((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

/// Pearson product-moment correlation.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Correlation> {
    let n = check_samples(x, y)?;
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return Err(Error::undefined_statistic(
            "correlation of a constant series is undefined",
        ));
    }

    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    Ok(Correlation {
        coefficient: r,
        p_value: t_test_p_value(r, n)?,
    })
}

/// Average ranks (1-based), ties sharing the mean of their positions.
fn ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        let rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Spearman rank correlation.
pub fn spearman(x: &[f64], y: &[f64]) -> Result<Correlation> {
    check_samples(x, y)?;
    pearson(&ranks(x), &ranks(y))
}

/// Sizes of groups of equal values.
fn tie_groups(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut groups = Vec::new();
    let mut run = 1usize;
    for pair in sorted.windows(2) {
        if pair[0] == pair[1] {
            run += 1;
        } else {
            if run > 1 {
                groups.push(run as f64);
            }
            run = 1;
        }
    }
    if run > 1 {
        groups.push(run as f64);
    }
    groups
}

/// Kendall tau-b with tie correction.
pub fn kendall_tau(x: &[f64], y: &[f64]) -> Result<Correlation> {
    let n = check_samples(x, y)?;

    let mut concordant = 0i64;
    let mut discordant = 0i64;
    let mut tied_x = 0i64;
    let mut tied_y = 0i64;
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i].total_cmp(&x[j]);
            let dy = y[i].total_cmp(&y[j]);
            if dx == Ordering::Equal {
                tied_x += 1;
            }
            if dy == Ordering::Equal {
                tied_y += 1;
            }
            if dx != Ordering::Equal && dy != Ordering::Equal {
                if dx == dy {
                    concordant += 1;
                } else {
                    discordant += 1;
                }
            }
        }
    }

    let pairs = (n * (n - 1) / 2) as i64;
    let denominator = (((pairs - tied_x) * (pairs - tied_y)) as f64).sqrt();
    if denominator == 0.0 {
        return Err(Error::undefined_statistic(
            "correlation of a constant series is undefined",
        ));
    }

    let s = (concordant - discordant) as f64;
    let tau = (s / denominator).clamp(-1.0, 1.0);

    if n == 2 {
        return Ok(Correlation {
            coefficient: tau,
            p_value: 1.0,
        });
    }

    let nf = n as f64;
    let gx = tie_groups(x);
    let gy = tie_groups(y);
    let tie_term = |t: f64| t * (t - 1.0) * (2.0 * t + 5.0);
    let pair_term = |t: f64| t * (t - 1.0);
    let triple_term = |t: f64| t * (t - 1.0) * (t - 2.0);

    let variance = (nf * (nf - 1.0) * (2.0 * nf + 5.0)
        - sum_over(&gx, tie_term)
        - sum_over(&gy, tie_term))
        / 18.0
        + sum_over(&gx, pair_term) * sum_over(&gy, pair_term) / (2.0 * nf * (nf - 1.0))
        + sum_over(&gx, triple_term) * sum_over(&gy, triple_term)
            / (9.0 * nf * (nf - 1.0) * (nf - 2.0));

    let p_value = if variance <= 0.0 {
        1.0
    } else {
        let z = s / variance.sqrt();
        erfc(z.abs() / std::f64::consts::SQRT_2).clamp(0.0, 1.0)
    };

    Ok(Correlation {
        coefficient: tau,
        p_value,
    })
}

/// Sum a per-tie-group term over the group sizes.
fn sum_over(groups: &[f64], term: impl Fn(f64) -> f64) -> f64 {
    groups.iter().copied().map(term).sum()
}
