//! Annotation tables.
//!
//! Two representations of the same data:
//!
//! - [`AnnotationTable`]: the raw table as annotators produced it. Rows are
//!   instances, columns are named annotators, cells are `Option<Label>`.
//! - [`CanonicalTable`]: the same shape with every label replaced by its
//!   integer code. Every agreement statistic runs on this form.
//!
//! Both are rectangular by construction and immutable afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::label::Label;

/// Integer code of a label, in `0..n_labels`.
pub type Code = usize;

fn check_unique(annotators: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(annotators.len());
    for name in annotators {
        if !seen.insert(name.as_str()) {
            return Err(Error::invalid_input_kind(format!(
                "annotator '{}' appears more than once",
                name
            )));
        }
    }
    Ok(())
}

// =============================================================================
// AnnotationTable
// =============================================================================

/// Raw annotations: instances × annotators, `None` where an annotator did not
/// label an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnnotationTableData")]
pub struct AnnotationTable {
    annotators: Vec<String>,
    /// Column-major: `columns[annotator][instance]`
    columns: Vec<Vec<Option<Label>>>,
    n_instances: usize,
}

impl AnnotationTable {
    /// Build a table from named columns.
    ///
    /// # Errors
    ///
    /// `InvalidInputKind` if two columns share a name or the columns differ
    /// in length.
    pub fn from_columns<N: Into<String>>(columns: Vec<(N, Vec<Option<Label>>)>) -> Result<Self> {
        let (annotators, columns): (Vec<String>, Vec<Vec<Option<Label>>>) = columns
            .into_iter()
            .map(|(name, column)| (name.into(), column))
            .unzip();

        check_unique(&annotators)?;

        let n_instances = columns.first().map_or(0, Vec::len);
        if let Some((name, column)) = annotators
            .iter()
            .zip(&columns)
            .find(|(_, column)| column.len() != n_instances)
        {
            return Err(Error::invalid_input_kind(format!(
                "table is not rectangular: column '{}' has {} rows, expected {}",
                name,
                column.len(),
                n_instances
            )));
        }

        Ok(Self {
            annotators,
            columns,
            n_instances,
        })
    }

    /// Build a table from rows, one cell per annotator.
    ///
    /// # Errors
    ///
    /// `InvalidInputKind` if annotator names repeat or a row has the wrong
    /// number of cells.
    pub fn from_rows<N: Into<String>>(
        annotators: Vec<N>,
        rows: Vec<Vec<Option<Label>>>,
    ) -> Result<Self> {
        let annotators: Vec<String> = annotators.into_iter().map(Into::into).collect();
        check_unique(&annotators)?;

        let mut columns: Vec<Vec<Option<Label>>> = annotators
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        let n_instances = rows.len();
        for (k, row) in rows.into_iter().enumerate() {
            if row.len() != annotators.len() {
                return Err(Error::invalid_input_kind(format!(
                    "table is not rectangular: row {} has {} cells, expected {}",
                    k,
                    row.len(),
                    annotators.len()
                )));
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.push(cell);
            }
        }

        Ok(Self {
            annotators,
            columns,
            n_instances,
        })
    }

    /// Build a table from a column-oriented JSON object.
    ///
    /// ```json
    /// {"a": [null, 2, 3], "b": [0, null, 1]}
    /// ```
    ///
    /// `null` marks an absent annotation. Column order follows the object.
    ///
    /// # Errors
    ///
    /// `InvalidInputKind` if the root is not an object, a column is not an
    /// array, a cell is not a scalar, or the columns differ in length.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::invalid_input_kind("expected a JSON object mapping annotator names to columns")
        })?;

        let mut columns = Vec::with_capacity(object.len());
        for (name, column) in object {
            let cells = column.as_array().ok_or_else(|| {
                Error::invalid_input_kind(format!("column '{}' is not an array", name))
            })?;
            let labels = cells
                .iter()
                .map(Label::from_json)
                .collect::<Result<Vec<_>>>()?;
            columns.push((name.clone(), labels));
        }

        Self::from_columns(columns)
    }

    /// Parse a column-oriented JSON table from a string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }

    /// Read a column-oriented JSON table from a file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        log::debug!("Loaded annotation table from {}", path.display());
        Self::from_json_str(&contents)
    }

    /// Annotator names in column order.
    #[must_use]
    pub fn annotators(&self) -> &[String] {
        &self.annotators
    }

    /// Number of instances (rows).
    #[must_use]
    pub fn n_instances(&self) -> usize {
        self.n_instances
    }

    /// Number of annotators (columns).
    #[must_use]
    pub fn n_annotators(&self) -> usize {
        self.annotators.len()
    }

    /// The label annotator `col` gave instance `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&Label> {
        self.columns[col][row].as_ref()
    }

    /// All labels from one annotator.
    pub fn column(&self, annotator: &str) -> Result<&[Option<Label>]> {
        self.annotators
            .iter()
            .position(|name| name == annotator)
            .map(|idx| self.columns[idx].as_slice())
            .ok_or_else(|| Error::unknown_annotator(annotator, &self.annotators))
    }

    /// Iterate over the cells of one instance, in annotator order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Option<&Label>> + '_ {
        self.columns.iter().map(move |column| column[row].as_ref())
    }
}

/// Serialized form of [`AnnotationTable`], re-validated on load.
#[derive(Deserialize)]
struct AnnotationTableData {
    annotators: Vec<String>,
    columns: Vec<Vec<Option<Label>>>,
    n_instances: usize,
}

impl TryFrom<AnnotationTableData> for AnnotationTable {
    type Error = Error;

    fn try_from(data: AnnotationTableData) -> Result<Self> {
        if data.annotators.len() != data.columns.len() {
            return Err(Error::invalid_input_kind(format!(
                "{} annotators but {} columns",
                data.annotators.len(),
                data.columns.len()
            )));
        }
        let mut table = Self::from_columns(data.annotators.into_iter().zip(data.columns).collect())?;
        if table.annotators.is_empty() {
            table.n_instances = data.n_instances;
        } else if table.n_instances != data.n_instances {
            return Err(Error::invalid_input_kind(format!(
                "columns have {} rows but n_instances is {}",
                table.n_instances, data.n_instances
            )));
        }
        Ok(table)
    }
}

// =============================================================================
// CanonicalTable
// =============================================================================

/// Integer-coded annotations: instances × annotators, `None` where absent.
///
/// Codes are in `0..n_labels`. Stored row-major, since every statistic walks
/// instances first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CanonicalTableData")]
pub struct CanonicalTable {
    annotators: Vec<String>,
    n_instances: usize,
    n_labels: usize,
    cells: Vec<Option<Code>>,
}

impl CanonicalTable {
    /// Build a canonical table from already-coded rows.
    ///
    /// # Errors
    ///
    /// `InvalidInputKind` if annotator names repeat, a row has the wrong
    /// number of cells, or a code is not below `n_labels`.
    pub fn from_rows<N: Into<String>>(
        annotators: Vec<N>,
        rows: Vec<Vec<Option<Code>>>,
        n_labels: usize,
    ) -> Result<Self> {
        let annotators: Vec<String> = annotators.into_iter().map(Into::into).collect();
        check_unique(&annotators)?;

        let n_instances = rows.len();
        let mut cells = Vec::with_capacity(n_instances * annotators.len());
        for (k, row) in rows.into_iter().enumerate() {
            if row.len() != annotators.len() {
                return Err(Error::invalid_input_kind(format!(
                    "table is not rectangular: row {} has {} cells, expected {}",
                    k,
                    row.len(),
                    annotators.len()
                )));
            }
            if let Some(code) = row.iter().flatten().find(|&&code| code >= n_labels) {
                return Err(Error::invalid_input_kind(format!(
                    "row {} contains code {} outside 0..{}",
                    k, code, n_labels
                )));
            }
            cells.extend(row);
        }

        Ok(Self {
            annotators,
            n_instances,
            n_labels,
            cells,
        })
    }

    /// Assemble a table whose invariants the caller already guarantees.
    pub(crate) fn from_parts(
        annotators: Vec<String>,
        n_instances: usize,
        n_labels: usize,
        cells: Vec<Option<Code>>,
    ) -> Self {
        debug_assert_eq!(cells.len(), n_instances * annotators.len());
        Self {
            annotators,
            n_instances,
            n_labels,
            cells,
        }
    }

    /// Annotator names in column order.
    #[must_use]
    pub fn annotators(&self) -> &[String] {
        &self.annotators
    }

    /// Number of instances (rows).
    #[must_use]
    pub fn n_instances(&self) -> usize {
        self.n_instances
    }

    /// Number of annotators (columns).
    #[must_use]
    pub fn n_annotators(&self) -> usize {
        self.annotators.len()
    }

    /// Size of the label space.
    #[must_use]
    pub fn n_labels(&self) -> usize {
        self.n_labels
    }

    /// Column index of an annotator.
    pub fn annotator_index(&self, annotator: &str) -> Result<usize> {
        self.annotators
            .iter()
            .position(|name| name == annotator)
            .ok_or_else(|| Error::unknown_annotator(annotator, &self.annotators))
    }

    /// The cells of one instance, in annotator order.
    ///
    /// # Panics
    ///
    /// Panics if `row >= n_instances()`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[Option<Code>] {
        let width = self.annotators.len();
        &self.cells[row * width..(row + 1) * width]
    }

    /// Iterate over all instances.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Code>]> + '_ {
        (0..self.n_instances).map(move |k| self.row(k))
    }

    /// The code annotator `col` gave instance `row`.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<Code> {
        self.cells[row * self.annotators.len() + col]
    }

    /// All codes from one annotator, by column index.
    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<Code>> + '_ {
        self.rows().map(move |row| row[col])
    }

    /// Present codes on one instance.
    pub fn present(&self, row: usize) -> impl Iterator<Item = Code> + '_ {
        self.row(row).iter().flatten().copied()
    }

    /// Number of present annotations on each instance.
    #[must_use]
    pub fn labels_per_instance(&self) -> Vec<usize> {
        self.rows()
            .map(|row| row.iter().filter(|cell| cell.is_some()).count())
            .collect()
    }

    /// How many annotators assigned each code to one instance.
    #[must_use]
    pub fn label_counts(&self, row: usize) -> Vec<usize> {
        let mut counts = vec![0; self.n_labels];
        for code in self.present(row) {
            counts[code] += 1;
        }
        counts
    }
}

/// Serialized form of [`CanonicalTable`], re-validated on load.
#[derive(Deserialize)]
struct CanonicalTableData {
    annotators: Vec<String>,
    n_instances: usize,
    n_labels: usize,
    cells: Vec<Option<Code>>,
}

impl TryFrom<CanonicalTableData> for CanonicalTable {
    type Error = Error;

    fn try_from(data: CanonicalTableData) -> Result<Self> {
        let width = data.annotators.len();
        if data.cells.len() != data.n_instances * width {
            return Err(Error::invalid_input_kind(format!(
                "{} cells do not fill {} instances x {} annotators",
                data.cells.len(),
                data.n_instances,
                width
            )));
        }
        let rows = if width == 0 {
            vec![Vec::new(); data.n_instances]
        } else {
            data.cells.chunks(width).map(<[Option<Code>]>::to_vec).collect()
        };
        Self::from_rows(data.annotators, rows, data.n_labels)
    }
}
