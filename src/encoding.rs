//! One-hot feature encoding and the frozen feature schema.
//!
//! [`FrameEncoder`] turns a [`ProcessFrame`] into a numeric matrix: numeric
//! columns pass through unchanged, categorical columns expand into one binary
//! column per distinct category. The encoding is described by a
//! [`FeatureSchema`], the single source of truth for encoded column order.
//! Training freezes one schema and every later prediction is assembled
//! against it, never re-derived from incoming data.
//!
//! Column order is deterministic: numeric features first, in frame order,
//! then categorical groups sorted by feature name, categories sorted within
//! each group. Fitting the same frame twice always yields the same schema.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{HuellaError, Result};
use crate::frame::{FeatureColumn, ProcessFrame};
use crate::primitives::Matrix;

/// One-hot expansion of a single categorical feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalGroup {
    /// Source feature name.
    pub feature: String,
    /// Distinct categories observed at fit time, sorted.
    pub categories: Vec<String>,
    /// Index of the group's first column in the encoded matrix.
    pub offset: usize,
}

impl CategoricalGroup {
    /// Returns the number of encoded columns in this group.
    #[must_use]
    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// Returns the in-group position of a category, or `None` for a label
    /// never seen at fit time.
    #[must_use]
    pub fn position(&self, label: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
    }

    /// Returns the derived column name for the category at `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k` is out of bounds.
    #[must_use]
    pub fn column_name(&self, k: usize) -> String {
        format!("{}_{}", self.feature, self.categories[k])
    }
}

/// The frozen description of the encoded feature space.
///
/// Produced once at fit time and threaded to every consumer: the trainer
/// validates matrix width against it, the ranking maps scores back to column
/// names through it, and inference assembles rows in its exact order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    numeric: Vec<String>,
    groups: Vec<CategoricalGroup>,
    width: usize,
}

impl FeatureSchema {
    /// Builds a schema from numeric feature names and categorical features
    /// with their category sets.
    ///
    /// Group and category ordering is normalized here, so schemas built
    /// directly (for tests or stub models) match what fitting produces.
    #[must_use]
    pub fn new(numeric: Vec<String>, categorical: Vec<(String, Vec<String>)>) -> Self {
        let mut sorted: Vec<(String, Vec<String>)> = categorical;
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let mut groups = Vec::with_capacity(sorted.len());
        let mut offset = numeric.len();
        for (feature, mut categories) in sorted {
            categories.sort();
            categories.dedup();
            let width = categories.len();
            groups.push(CategoricalGroup {
                feature,
                categories,
                offset,
            });
            offset += width;
        }

        Self {
            numeric,
            groups,
            width: offset,
        }
    }

    /// Returns the total number of encoded columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of source features (before expansion).
    #[must_use]
    pub fn n_source_features(&self) -> usize {
        self.numeric.len() + self.groups.len()
    }

    /// Returns numeric feature names in encoded order.
    #[must_use]
    pub fn numeric_features(&self) -> &[String] {
        &self.numeric
    }

    /// Returns categorical groups in encoded order.
    #[must_use]
    pub fn categorical_groups(&self) -> &[CategoricalGroup] {
        &self.groups
    }

    /// Returns the encoded column index of a numeric feature.
    #[must_use]
    pub fn numeric_index(&self, feature: &str) -> Option<usize> {
        self.numeric.iter().position(|n| n == feature)
    }

    /// Returns the group for a categorical feature.
    #[must_use]
    pub fn group(&self, feature: &str) -> Option<&CategoricalGroup> {
        self.groups.iter().find(|g| g.feature == feature)
    }

    /// Returns `true` if the name is a source feature (numeric or
    /// categorical) of this schema.
    #[must_use]
    pub fn has_source_feature(&self, name: &str) -> bool {
        self.numeric_index(name).is_some() || self.group(name).is_some()
    }

    /// Returns every derived column name in encoded order.
    ///
    /// Numeric features keep their name; one-hot columns are named
    /// `{feature}_{category}`.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        let mut names = self.numeric.clone();
        for group in &self.groups {
            for k in 0..group.width() {
                names.push(group.column_name(k));
            }
        }
        names
    }

    /// Maps a derived column name back to its source feature.
    ///
    /// Numeric columns map to themselves; `{feature}_{category}` columns map
    /// to `feature`.
    #[must_use]
    pub fn source_feature(&self, derived: &str) -> Option<&str> {
        if let Some(name) = self.numeric.iter().find(|n| n.as_str() == derived) {
            return Some(name.as_str());
        }
        for group in &self.groups {
            if let Some(rest) = derived.strip_prefix(&format!("{}_", group.feature)) {
                if group.position(rest).is_some() {
                    return Some(&group.feature);
                }
            }
        }
        None
    }
}

/// Fits a one-hot encoding on a frame and applies it.
///
/// Follows the fit/transform convention: [`FrameEncoder::fit`] learns the
/// schema, [`FrameEncoder::transform`] applies it to a compatible frame, and
/// [`FrameEncoder::fit_transform`] does both and hands back the schema for
/// the rest of the pipeline to hold.
///
/// # Examples
///
/// ```
/// use huella::encoding::FrameEncoder;
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
///         FeatureColumn::Categorical(vec!["B".to_string(), "A".to_string()]),
///     ),
/// ])
/// .unwrap();
///
/// let mut encoder = FrameEncoder::new();
/// let (matrix, schema) = encoder.fit_transform(&frame).unwrap();
/// assert_eq!(matrix.shape(), (2, 3));
/// assert_eq!(
///     schema.column_names(),
///     vec!["machine_hours", "machine_type_A", "machine_type_B"]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrameEncoder {
    schema: Option<FeatureSchema>,
}

impl FrameEncoder {
    /// Creates an unfitted encoder.
    #[must_use]
    pub fn new() -> Self {
        Self { schema: None }
    }

    /// Returns `true` if the encoder has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.schema.is_some()
    }

    /// Returns the fitted schema, if any.
    #[must_use]
    pub fn schema(&self) -> Option<&FeatureSchema> {
        self.schema.as_ref()
    }

    /// Learns the feature schema from a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame has no rows.
    pub fn fit(&mut self, frame: &ProcessFrame) -> Result<()> {
        if frame.n_rows() == 0 {
            return Err("Cannot fit encoder on a frame with no rows".into());
        }

        let mut numeric = Vec::new();
        let mut categorical: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

        for (name, column) in frame.iter() {
            match column {
                FeatureColumn::Numeric(_) => numeric.push(name.to_string()),
                FeatureColumn::Categorical(values) => {
                    categorical
                        .entry(name)
                        .or_default()
                        .extend(values.iter().map(String::as_str));
                }
            }
        }

        let categorical = categorical
            .into_iter()
            .map(|(feature, categories)| {
                (
                    feature.to_string(),
                    categories.into_iter().map(str::to_string).collect(),
                )
            })
            .collect();

        self.schema = Some(FeatureSchema::new(numeric, categorical));
        Ok(())
    }

    /// Encodes a frame against the fitted schema.
    ///
    /// Unseen categories encode as an all-zero group; they never error and
    /// never add columns. The output width always equals the schema width.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoder is unfitted, a schema feature is
    /// missing from the frame or has changed kind, or the frame carries a
    /// column the schema has never seen.
    pub fn transform(&self, frame: &ProcessFrame) -> Result<Matrix<f32>> {
        let schema = self
            .schema
            .as_ref()
            .ok_or_else(|| HuellaError::Other("Encoder not fitted. Call fit() first.".into()))?;

        for (name, _) in frame.iter() {
            if !schema.has_source_feature(name) {
                return Err(format!("Column '{name}' was not present at fit time").into());
            }
        }

        let mut matrix = Matrix::zeros(frame.n_rows(), schema.width());

        for (slot, feature) in schema.numeric_features().iter().enumerate() {
            let column = require_column(frame, feature, "numeric")?;
            match column {
                FeatureColumn::Numeric(values) => {
                    for (row, &value) in values.iter().enumerate() {
                        matrix.set(row, slot, value);
                    }
                }
                FeatureColumn::Categorical(_) => {
                    return Err(kind_changed(feature, "numeric", column));
                }
            }
        }

        for group in schema.categorical_groups() {
            let column = require_column(frame, &group.feature, "categorical")?;
            match column {
                FeatureColumn::Categorical(values) => {
                    for (row, label) in values.iter().enumerate() {
                        if let Some(k) = group.position(label) {
                            matrix.set(row, group.offset + k, 1.0);
                        }
                    }
                }
                FeatureColumn::Numeric(_) => {
                    return Err(kind_changed(&group.feature, "categorical", column));
                }
            }
        }

        Ok(matrix)
    }

    /// Fits the schema and encodes the frame in one pass.
    ///
    /// Returns the matrix together with a copy of the frozen schema. The
    /// pipeline holds that copy for the lifetime of the model; nothing
    /// downstream re-derives column order from data.
    ///
    /// # Errors
    ///
    /// Same conditions as [`FrameEncoder::fit`] and
    /// [`FrameEncoder::transform`].
    pub fn fit_transform(&mut self, frame: &ProcessFrame) -> Result<(Matrix<f32>, FeatureSchema)> {
        self.fit(frame)?;
        let matrix = self.transform(frame)?;
        let schema = self
            .schema
            .clone()
            .ok_or_else(|| HuellaError::Other("Encoder lost its schema after fit".into()))?;
        Ok((matrix, schema))
    }
}

fn require_column<'a>(
    frame: &'a ProcessFrame,
    feature: &str,
    expected_kind: &str,
) -> Result<&'a FeatureColumn> {
    frame.column(feature).ok_or_else(|| {
        HuellaError::Other(format!(
            "Column '{feature}' ({expected_kind} at fit time) missing from frame"
        ))
    })
}

fn kind_changed(feature: &str, expected: &str, found: &FeatureColumn) -> HuellaError {
    HuellaError::Other(format!(
        "Column '{feature}' was {expected} at fit time, found {}",
        found.kind_name()
    ))
}
