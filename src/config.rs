//! Configuration for agreement analysis.

use disagree_core::LabelOrder;
use serde::{Deserialize, Serialize};

use crate::metrics::DEFAULT_MATRIX_DECIMALS;
use crate::Result;

/// Settings shared by the engines and the report.
///
/// Missing fields take their defaults when deserialized, so a config file
/// only needs to name what it changes:
///
/// ```
/// use disagree::AgreementConfig;
///
/// let config = AgreementConfig::from_json_str(r#"{"matrix_decimals": 2}"#).unwrap();
/// assert_eq!(config.matrix_decimals, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgreementConfig {
    /// How label codes are assigned during normalization
    pub label_order: LabelOrder,
    /// Decimal places kept in annotator × annotator metric matrices (default: 3)
    pub matrix_decimals: u32,
    /// Report the bidisagreement matrix as a distribution instead of counts
    pub normalise_bidisagreements: bool,
}

impl Default for AgreementConfig {
    fn default() -> Self {
        Self {
            label_order: LabelOrder::Sorted,
            matrix_decimals: DEFAULT_MATRIX_DECIMALS,
            normalise_bidisagreements: false,
        }
    }
}

impl AgreementConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label ordering policy.
    pub fn with_label_order(mut self, order: LabelOrder) -> Self {
        self.label_order = order;
        self
    }

    /// Set the decimal places kept in metric matrices.
    pub fn with_matrix_decimals(mut self, decimals: u32) -> Self {
        self.matrix_decimals = decimals;
        self
    }

    /// Normalise the bidisagreement matrix in reports.
    pub fn with_normalised_bidisagreements(mut self, normalise: bool) -> Self {
        self.normalise_bidisagreements = normalise;
        self
    }

    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config = serde_json::from_str(json).map_err(disagree_core::Error::from)?;
        Ok(config)
    }
}
