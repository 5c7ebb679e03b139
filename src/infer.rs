//! Inference-time feature assembly.
//!
//! Raw user input arrives as loosely-typed values keyed by source feature
//! name. This module rebuilds a single encoded row against the frozen
//! [`FeatureSchema`](crate::encoding::FeatureSchema) — same columns, same
//! order, same width as training — so the model never sees a layout it was
//! not trained on.
//!
//! Assembly is forgiving about values but strict about names: a missing or
//! uninterpretable value degrades to a neutral encoding and is reported in
//! the prediction metadata, while a feature name the schema has never seen
//! rejects the whole request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::encoding::FeatureSchema;
use crate::error::{HuellaError, Result};
use crate::primitives::Matrix;
use crate::traits::Estimator;

/// A loosely-typed input value, as a form or JSON body delivers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A numeric value.
    Number(f32),
    /// A textual value: a category label, or a number still in string form.
    Text(String),
}

impl RawValue {
    /// Coerces the value to a number, parsing text if needed.
    #[must_use]
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Returns the value as a category label. Numbers are not labels.
    #[must_use]
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl From<f32> for RawValue {
    fn from(value: f32) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f32)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Raw inference input: source feature names mapped to loose values.
///
/// # Examples
///
/// ```
/// use huella::infer::InferenceRequest;
///
/// let request = InferenceRequest::new()
///     .with_value("machine_hours", 5.0)
///     .with_value("machine_type", "A");
/// assert_eq!(request.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InferenceRequest {
    values: BTreeMap<String, RawValue>,
}

impl InferenceRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a feature value, replacing any previous one.
    pub fn set(&mut self, feature: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(feature.into(), value.into());
    }

    /// Builder-style [`InferenceRequest::set`].
    #[must_use]
    pub fn with_value(mut self, feature: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.set(feature, value);
        self
    }

    /// Returns the value for a feature, if provided.
    #[must_use]
    pub fn get(&self, feature: &str) -> Option<&RawValue> {
        self.values.get(feature)
    }

    /// Iterates over provided feature names.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the number of provided features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no features were provided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, RawValue)> for InferenceRequest {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A model output with its data-quality metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted target value.
    pub value: f32,
    /// Source features that fell back to a neutral encoding, in schema
    /// order. Empty when every input was usable.
    pub degraded_features: Vec<String>,
}

impl Prediction {
    /// Returns `true` if any input fell back to a neutral encoding.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.degraded_features.is_empty()
    }
}

/// Assembles one encoded row from raw input, in exact schema order.
///
/// Numeric features coerce their value to a number, falling back to `0.0`
/// when the value is missing or unparseable. Categorical features set the
/// matching one-hot column to `1.0`; a missing value or a label never seen
/// at fit time leaves the whole group at zero — mirroring how the encoder
/// treats unseen categories in bulk data. Every fallback records its source
/// feature in the returned list, in schema order.
///
/// # Errors
///
/// Returns [`HuellaError::UnknownFeature`] if the request names a feature
/// outside the schema. No row is assembled in that case.
///
/// # Examples
///
/// ```
/// use huella::encoding::FeatureSchema;
/// use huella::infer::{assemble_row, InferenceRequest};
///
/// let schema = FeatureSchema::new(
///     vec!["machine_hours".to_string()],
///     vec![("machine_type".to_string(), vec!["A".to_string(), "B".to_string()])],
/// );
///
/// let request = InferenceRequest::new().with_value("machine_hours", 5.0);
/// let (row, degraded) = assemble_row(&schema, &request).unwrap();
/// assert_eq!(row, vec![5.0, 0.0, 0.0]);
/// assert_eq!(degraded, vec!["machine_type".to_string()]);
/// ```
pub fn assemble_row(
    schema: &FeatureSchema,
    request: &InferenceRequest,
) -> Result<(Vec<f32>, Vec<String>)> {
    for feature in request.features() {
        if !schema.has_source_feature(feature) {
            return Err(HuellaError::unknown_feature(feature));
        }
    }

    let mut row = vec![0.0f32; schema.width()];
    let mut degraded = Vec::new();

    for (slot, feature) in schema.numeric_features().iter().enumerate() {
        match request.get(feature).and_then(RawValue::as_number) {
            Some(value) => row[slot] = value,
            None => degraded.push(feature.clone()),
        }
    }

    for group in schema.categorical_groups() {
        let position = request
            .get(&group.feature)
            .and_then(RawValue::as_label)
            .and_then(|label| group.position(label));
        match position {
            Some(k) => row[group.offset + k] = 1.0,
            None => degraded.push(group.feature.clone()),
        }
    }

    Ok((row, degraded))
}

/// Predicts from raw input through any fitted [`Estimator`].
///
/// The row is assembled against the frozen schema, wrapped in a one-row
/// matrix, and handed to the model. Degraded inputs lower confidence but do
/// not fail the call; they are listed in the result instead.
///
/// # Errors
///
/// Returns [`HuellaError::UnknownFeature`] for a request naming a feature
/// outside the schema, or [`HuellaError::SchemaMismatch`] if the schema
/// width is internally inconsistent.
pub fn predict_with<M: Estimator>(
    model: &M,
    schema: &FeatureSchema,
    request: &InferenceRequest,
) -> Result<Prediction> {
    let (row, degraded_features) = assemble_row(schema, request)?;

    let row_len = row.len();
    let x = Matrix::from_vec(1, schema.width(), row)
        .map_err(|_| HuellaError::SchemaMismatch {
            expected: schema.width(),
            actual: row_len,
        })?;

    let predictions = model.predict(&x);
    Ok(Prediction {
        value: predictions[0],
        degraded_features,
    })
}
