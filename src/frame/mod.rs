//! Typed column storage for raw process datasets.
//!
//! A [`ProcessFrame`] holds the dataset as named, typed columns. Every column
//! is either numeric or categorical; the declared kind — not the textual shape
//! of individual values — decides how the encoder treats it. Column order is
//! preserved from construction because the frozen feature schema derives its
//! numeric block from it.

mod csv;

use crate::error::{HuellaError, Result};
use crate::primitives::Vector;

/// A single dataset column, typed at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureColumn {
    /// Continuous values, used directly as one encoded column.
    Numeric(Vector<f32>),
    /// Discrete labels, expanded into one-hot columns by the encoder.
    Categorical(Vec<String>),
}

impl FeatureColumn {
    /// Returns the number of records in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Categorical(v) => v.len(),
        }
    }

    /// Returns `true` if the column has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for numeric columns.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }

    /// Returns `true` for categorical columns.
    #[must_use]
    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::Categorical(_))
    }

    /// Returns the kind as a display string for error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Numeric(_) => "numeric",
            Self::Categorical(_) => "categorical",
        }
    }
}

/// A dataset of named, typed columns with equal lengths.
///
/// # Examples
///
/// ```
/// use huella::frame::{FeatureColumn, ProcessFrame};
/// use huella::primitives::Vector;
///
/// let frame = ProcessFrame::new(vec![
///     (
///         "machine_hours".to_string(),
///         FeatureColumn::Numeric(Vector::from_vec(vec![4.0, 9.5])),
///     ),
///     (
///         "machine_type".to_string(),
///         FeatureColumn::Categorical(vec!["A".to_string(), "B".to_string()]),
///     ),
/// ])
/// .unwrap();
/// assert_eq!(frame.shape(), (2, 2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessFrame {
    columns: Vec<(String, FeatureColumn)>,
    n_rows: usize,
}

impl ProcessFrame {
    /// Creates a frame from named columns.
    ///
    /// # Errors
    ///
    /// Returns an error if no columns are given, if column lengths differ,
    /// or if a name is empty or duplicated.
    pub fn new(columns: Vec<(String, FeatureColumn)>) -> Result<Self> {
        if columns.is_empty() {
            return Err("Frame must have at least one column".into());
        }

        let n_rows = columns[0].1.len();
        for (name, column) in &columns {
            if name.is_empty() {
                return Err("Column names must not be empty".into());
            }
            if column.len() != n_rows {
                return Err(HuellaError::dimension_mismatch(
                    &format!("column '{name}' length"),
                    n_rows,
                    column.len(),
                ));
            }
        }

        for (i, (name, _)) in columns.iter().enumerate() {
            if columns[i + 1..].iter().any(|(other, _)| other == name) {
                return Err(format!("Duplicate column name: '{name}'").into());
            }
        }

        Ok(Self { columns, n_rows })
    }

    /// Returns the shape as `(n_rows, n_cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    /// Returns the number of records.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns column names in frame order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns the named column, if present.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&FeatureColumn> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Returns `true` if the frame contains the named column.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Iterates over `(name, column)` pairs in frame order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureColumn)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Appends a column to the frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the length differs from existing columns or the
    /// name is empty or already taken.
    pub fn add_column(&mut self, name: impl Into<String>, column: FeatureColumn) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err("Column names must not be empty".into());
        }
        if self.has_column(&name) {
            return Err(format!("Duplicate column name: '{name}'").into());
        }
        if column.len() != self.n_rows {
            return Err(HuellaError::dimension_mismatch(
                &format!("column '{name}' length"),
                self.n_rows,
                column.len(),
            ));
        }
        self.columns.push((name, column));
        Ok(())
    }

    /// Removes a numeric column and returns its values.
    ///
    /// Used to split the target off a loaded dataset before encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing, categorical, or the last
    /// one remaining.
    pub fn take_numeric_column(&mut self, name: &str) -> Result<Vector<f32>> {
        let idx = self
            .columns
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| HuellaError::Other(format!("Column '{name}' not found")))?;

        if self.columns.len() == 1 {
            return Err("Cannot remove the last remaining column".into());
        }

        match &self.columns[idx].1 {
            FeatureColumn::Numeric(_) => {}
            FeatureColumn::Categorical(_) => {
                return Err(format!("Column '{name}' must be numeric, found categorical").into());
            }
        }

        match self.columns.remove(idx).1 {
            FeatureColumn::Numeric(v) => Ok(v),
            FeatureColumn::Categorical(_) => unreachable!("kind checked above"),
        }
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
