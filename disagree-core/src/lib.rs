//! # disagree-core
//!
//! Core types for the disagree toolbox: the data structures every agreement
//! engine is built on.
//!
//! This crate provides:
//! - **Labels**: `Label`, a totally ordered scalar label value
//! - **Tables**: `AnnotationTable` (raw labels) and `CanonicalTable` (integer codes)
//! - **Normalization**: `normalize`, producing a `CanonicalTable` and a `LabelDictionary`
//!
//! Missing annotations are `None` everywhere. A missing cell can never be
//! confused with a label, including the integer `0`.
//!
//! ```
//! use disagree_core::{normalize, AnnotationTable, Label, LabelOrder};
//!
//! let table = AnnotationTable::from_columns(vec![
//!     ("olly", vec![Some(Label::from("pos")), Some(Label::from("neg")), None]),
//!     ("rob", vec![Some(Label::from("pos")), Some(Label::from("pos")), Some(Label::from("neg"))]),
//! ])?;
//!
//! let normalized = normalize(&table, LabelOrder::Sorted);
//! assert_eq!(normalized.dictionary.len(), 2);
//! assert_eq!(normalized.table.cell(2, 0), None);
//! # Ok::<(), disagree_core::Error>(())
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod label;
pub mod normalize;
pub mod table;

pub use error::{Error, Result};
pub use label::Label;
pub use normalize::{normalize, LabelDictionary, LabelOrder, Normalized};
pub use table::{AnnotationTable, CanonicalTable, Code};
