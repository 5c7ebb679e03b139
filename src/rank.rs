//! Feature importance ranking.
//!
//! Pairs the model's per-column importance scores with the schema's derived
//! column names and keeps them sorted once, descending. Ranking never
//! aggregates one-hot columns back to their source feature; `machine_type_A`
//! and `machine_type_B` rank independently, and consumers that need the
//! source feature map back through the schema.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::encoding::FeatureSchema;
use crate::error::{HuellaError, Result};

/// One ranked entry: a derived column name and its importance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    /// Derived column name (numeric feature or `{feature}_{category}`).
    pub feature: String,
    /// Normalized importance score.
    pub importance: f32,
}

/// Importance scores for every encoded column, sorted descending.
///
/// # Examples
///
/// ```
/// use huella::encoding::FeatureSchema;
/// use huella::rank::ImportanceTable;
///
/// let schema = FeatureSchema::new(
///     vec!["machine_hours".to_string()],
///     vec![("machine_type".to_string(), vec!["A".to_string(), "B".to_string()])],
/// );
/// let table = ImportanceTable::from_scores(&schema, &[0.2, 0.7, 0.1]).unwrap();
///
/// let top = table.top_k(2).unwrap();
/// assert_eq!(top[0].feature, "machine_type_A");
/// assert_eq!(top[1].feature, "machine_hours");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceTable {
    entries: Vec<FeatureImportance>,
}

impl ImportanceTable {
    /// Pairs scores with the schema's derived column names and sorts.
    ///
    /// Ties keep encoded column order; the result is deterministic for a
    /// deterministic model.
    ///
    /// # Errors
    ///
    /// Returns [`HuellaError::SchemaMismatch`] if the score count differs
    /// from the schema width — the scores cannot be trusted to line up with
    /// any column in that case.
    pub fn from_scores(schema: &FeatureSchema, scores: &[f32]) -> Result<Self> {
        if scores.len() != schema.width() {
            return Err(HuellaError::SchemaMismatch {
                expected: schema.width(),
                actual: scores.len(),
            });
        }

        let mut entries: Vec<FeatureImportance> = schema
            .column_names()
            .into_iter()
            .zip(scores.iter().copied())
            .map(|(feature, importance)| FeatureImportance {
                feature,
                importance,
            })
            .collect();

        // Stable sort: equal scores stay in encoded column order.
        entries.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(Ordering::Equal)
        });

        Ok(Self { entries })
    }

    /// Returns the `k` highest-scoring entries.
    ///
    /// # Errors
    ///
    /// Returns [`HuellaError::InvalidRange`] if `k` is zero or exceeds the
    /// table length.
    pub fn top_k(&self, k: usize) -> Result<&[FeatureImportance]> {
        if k == 0 || k > self.entries.len() {
            return Err(HuellaError::InvalidRange {
                requested: k,
                len: self.entries.len(),
            });
        }
        Ok(&self.entries[..k])
    }

    /// Returns all entries, sorted descending.
    #[must_use]
    pub fn entries(&self) -> &[FeatureImportance] {
        &self.entries
    }

    /// Returns the number of ranked columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, FeatureImportance> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ImportanceTable {
    type Item = &'a FeatureImportance;
    type IntoIter = std::slice::Iter<'a, FeatureImportance>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
