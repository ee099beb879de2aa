//! # disagree
//!
//! Inter-annotator agreement for Rust.
//!
//! - **Disagreement analysis**: instances bucketed by how many distinct labels they received
//! - **Pairwise**: joint probability, Cohen's kappa, annotator × annotator matrices
//! - **Multi-annotator**: Fleiss' kappa, Krippendorff's alpha (nominal, ordinal, interval, ratio)
//! - **Correlation**: Pearson, Spearman, Kendall between two annotators
//!
//! ## Quick Start
//!
//! ```rust
//! use disagree::{normalize, AnnotationTable, DistanceKind, Krippendorff, LabelOrder, Metrics};
//!
//! // One column per annotator, one row per instance; null is a missing annotation
//! let table = AnnotationTable::from_json_str(
//!     r#"{
//!         "olly": ["pos", "neg", "neg", null],
//!         "rob":  ["pos", "neg", "pos", "neu"],
//!         "cal":  ["pos", "neg", "neg", "neu"]
//!     }"#,
//! )?;
//! let normalized = normalize(&table, LabelOrder::Sorted);
//!
//! let metrics = Metrics::from_normalized(&normalized);
//! let kappa = metrics.cohens_kappa("olly", "cal")?;
//! assert!((kappa - 1.0).abs() < 1e-12);
//!
//! let alpha = Krippendorff::new(&normalized.table).alpha(DistanceKind::Nominal);
//! assert!(alpha < 1.0);
//! # Ok::<(), disagree::Error>(())
//! ```
//!
//! ## Everything at once
//!
//! [`AgreementReport`] normalizes a table once and runs every engine over it:
//!
//! ```rust
//! use disagree::{AgreementConfig, AgreementReport, AnnotationTable};
//!
//! let table = AnnotationTable::from_json_str(r#"{"a": [1, 2, 2], "b": [1, 2, 3]}"#)?;
//! let report = AgreementReport::build(&table, &AgreementConfig::default())?;
//! println!("{}", report.summary());
//! # Ok::<(), disagree::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! disagree = "0.3"                                         # sequential
//! disagree = { version = "0.3", features = ["parallel"] }  # rayon coincidence build
//! ```
//!
//! ## Missing annotations
//!
//! Absent cells are `None` from loading through every engine. Float `NaN`
//! labels are treated as absent. Pairwise statistics only look at instances
//! both annotators labelled; instances with a single annotation are not
//! pairable for alpha and are left out of the disagreement buckets.

#![warn(missing_docs)]

pub mod bidisagreement;
pub mod config;
pub mod error;
pub mod interpret;
pub mod krippendorff;
pub mod metrics;
pub mod report;

pub use bidisagreement::{AgreementSummary, BiDisagreements};
pub use config::AgreementConfig;
pub use error::{Error, Result};
pub use interpret::{alpha_reliability, kappa_interpretation, AlphaReliability};
pub use krippendorff::{DistanceKind, Krippendorff};
pub use metrics::{
    kendall_tau, pearson, spearman, Correlation, CorrelationMeasure, Metrics, PairwiseMetric,
    DEFAULT_MATRIX_DECIMALS,
};
pub use report::{AgreementReport, AlphaResult};

pub use disagree_core::{
    normalize, AnnotationTable, CanonicalTable, Code, Label, LabelDictionary, LabelOrder,
    Normalized,
};
