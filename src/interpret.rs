//! Verbal interpretation of agreement coefficients.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bounds (exclusive) of the Landis & Koch kappa bands.
const KAPPA_BANDS: [(f64, &str); 5] = [
    (0.0, "Less than chance agreement"),
    (0.20, "Slight agreement"),
    (0.40, "Fair agreement"),
    (0.60, "Moderate agreement"),
    (0.80, "Substantial agreement"),
];

/// Describe a kappa value in words.
///
/// Uses the benchmark scale of Landis & Koch, "The Measurement of Observer
/// Agreement for Categorical Data", *Biometrics* 33(1), 1977:
///
/// | kappa          | description                |
/// |----------------|----------------------------|
/// | `< 0`          | less than chance agreement |
/// | `0 .. 0.20`    | slight                     |
/// | `0.20 .. 0.40` | fair                       |
/// | `0.40 .. 0.60` | moderate                   |
/// | `0.60 .. 0.80` | substantial                |
/// | `≥ 0.80`       | almost perfect             |
///
/// Lower bounds are inclusive. The scale was proposed for Cohen's kappa and
/// is commonly applied to Fleiss' kappa as well; the cut points are
/// conventions, not significance thresholds. NaN is reported as undefined.
pub fn kappa_interpretation(kappa: f64) -> &'static str {
    if kappa.is_nan() {
        return "Undefined agreement";
    }
    KAPPA_BANDS
        .iter()
        .find(|(upper, _)| kappa < *upper)
        .map_or("Almost perfect agreement", |(_, band)| *band)
}

/// Krippendorff's guidance on whether data are reliable enough to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaReliability {
    /// `α ≥ .800`
    Reliable,
    /// `.667 ≤ α < .800`: tentative conclusions only
    Tentative,
    /// `α < .667`
    Unreliable,
}

impl fmt::Display for AlphaReliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlphaReliability::Reliable => write!(f, "Reliable"),
            AlphaReliability::Tentative => write!(f, "Tentative"),
            AlphaReliability::Unreliable => write!(f, "Unreliable"),
        }
    }
}

/// Classify an alpha value. NaN is unreliable.
pub fn alpha_reliability(alpha: f64) -> AlphaReliability {
    if alpha >= 0.800 {
        AlphaReliability::Reliable
    } else if alpha >= 0.667 {
        AlphaReliability::Tentative
    } else {
        AlphaReliability::Unreliable
    }
}
