//! Distance (difference) functions for Krippendorff's alpha.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Level of measurement, selecting the distance between two label codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceKind {
    /// Any difference counts the same
    Nominal,
    /// Ranked labels; distance grows with the mass of labels in between
    Ordinal,
    /// Squared difference of codes
    Interval,
    /// Squared relative difference of codes
    Ratio,
}

impl DistanceKind {
    /// Every distance kind.
    pub const ALL: [DistanceKind; 4] = [
        DistanceKind::Nominal,
        DistanceKind::Ordinal,
        DistanceKind::Interval,
        DistanceKind::Ratio,
    ];

    /// Name accepted by `FromStr`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DistanceKind::Nominal => "nominal",
            DistanceKind::Ordinal => "ordinal",
            DistanceKind::Interval => "interval",
            DistanceKind::Ratio => "ratio",
        }
    }
}

impl FromStr for DistanceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nominal" => Ok(DistanceKind::Nominal),
            "ordinal" => Ok(DistanceKind::Ordinal),
            "interval" => Ok(DistanceKind::Interval),
            "ratio" => Ok(DistanceKind::Ratio),
            other => Err(Error::invalid_distance_kind(other)),
        }
    }
}

impl fmt::Display for DistanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `δ(v1, v2)` for the given level of measurement.
///
/// `marginals` are the coincidence matrix row sums, used by the ordinal
/// distance:
///
/// ```text
/// δ_ordinal(v1, v2) = (Σ_{g=lo..=hi} n_g − (n_lo + n_hi) / 2)²
/// ```
///
/// with `lo = min(v1, v2)` and `hi = max(v1, v2)`. The ratio distance is
/// `0` when `v1 + v2 == 0`.
pub(crate) fn distance(kind: DistanceKind, marginals: &Array1<f64>, v1: usize, v2: usize) -> f64 {
    match kind {
        DistanceKind::Nominal => {
            if v1 == v2 {
                0.0
            } else {
                1.0
            }
        }
        DistanceKind::Ordinal => {
            let (lo, hi) = if v1 <= v2 { (v1, v2) } else { (v2, v1) };
            let between: f64 = (lo..=hi).map(|g| marginals[g]).sum();
            let d = between - (marginals[lo] + marginals[hi]) / 2.0;
            d * d
        }
        DistanceKind::Interval => {
            let d = v1 as f64 - v2 as f64;
            d * d
        }
        DistanceKind::Ratio => {
            let sum = (v1 + v2) as f64;
            if sum == 0.0 {
                0.0
            } else {
                let d = (v1 as f64 - v2 as f64) / sum;
                d * d
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_nominal() {
        let m = array![1.0, 1.0];
        assert_eq!(distance(DistanceKind::Nominal, &m, 0, 0), 0.0);
        assert_eq!(distance(DistanceKind::Nominal, &m, 0, 1), 1.0);
    }

    #[test]
    fn test_interval_and_ratio() {
        let m = Array1::<f64>::zeros(4);
        assert_eq!(distance(DistanceKind::Interval, &m, 3, 1), 4.0);
        assert_eq!(distance(DistanceKind::Ratio, &m, 3, 1), 0.25);
        assert_eq!(distance(DistanceKind::Ratio, &m, 0, 0), 0.0);
    }

    #[test]
    fn test_ordinal_uses_marginals() {
        let m = array![2.0, 4.0, 6.0];
        // (2 + 4 + 6) - (2 + 6) / 2 = 8
        assert_eq!(distance(DistanceKind::Ordinal, &m, 0, 2), 64.0);
        assert_eq!(distance(DistanceKind::Ordinal, &m, 2, 0), 64.0);
        // (2 + 4) - (2 + 4) / 2 = 3
        assert_eq!(distance(DistanceKind::Ordinal, &m, 1, 0), 9.0);
        assert_eq!(distance(DistanceKind::Ordinal, &m, 1, 1), 0.0);
    }

    #[test]
    fn test_parse() {
        for kind in DistanceKind::ALL {
            assert_eq!(kind.name().parse::<DistanceKind>().unwrap(), kind);
        }
        assert!(matches!(
            "cardinal".parse::<DistanceKind>(),
            Err(Error::InvalidDistanceKind(_))
        ));
        assert!("Nominal".parse::<DistanceKind>().is_err());
    }
}
