//! End-to-end emission prediction pipeline.
//!
//! [`EmissionPipeline::fit`] runs the whole training flow — encode, train,
//! rank — and freezes its outputs into one immutable context object. After
//! construction the pipeline only answers queries: predictions from raw
//! input, importance rankings, and per-feature suggestions. Nothing in the
//! query path can change the schema, the forest, or the ranking.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encoding::{FeatureSchema, FrameEncoder};
use crate::error::{HuellaError, Result};
use crate::frame::ProcessFrame;
use crate::infer::{predict_with, InferenceRequest, Prediction};
use crate::primitives::Vector;
use crate::rank::{FeatureImportance, ImportanceTable};
use crate::suggest::SuggestionCatalog;
use crate::tree::RandomForestRegressor;

/// Forest training configuration.
///
/// # Examples
///
/// ```
/// use huella::pipeline::TrainConfig;
///
/// let config = TrainConfig::new().with_n_estimators(25).with_seed(7);
/// assert_eq!(config.n_estimators, 25);
/// assert_eq!(TrainConfig::default().n_estimators, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Number of trees in the forest.
    pub n_estimators: usize,
    /// Optional depth limit for every tree.
    pub max_depth: Option<usize>,
    /// Base seed for bootstrap sampling.
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            seed: 42,
        }
    }
}

impl TrainConfig {
    /// Creates the default configuration: 100 trees, unlimited depth,
    /// seed 42.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of trees.
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Sets the depth limit for every tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the base seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// A fitted prediction pipeline: frozen schema, trained forest, ranked
/// importances, and a suggestion catalog.
///
/// # Examples
///
/// ```
/// use huella::prelude::*;
///
/// let frame = ProcessFrame::new(vec![
///     (
///         "machine_hours".to_string(),
///         FeatureColumn::Numeric(Vector::from_vec(vec![2.0, 4.0, 6.0, 8.0])),
///     ),
///     (
///         "machine_type".to_string(),
///         FeatureColumn::Categorical(vec![
///             "A".to_string(),
///             "A".to_string(),
///             "B".to_string(),
///             "B".to_string(),
///         ]),
///     ),
/// ])
/// .unwrap();
/// let target = Vector::from_vec(vec![120.0, 150.0, 280.0, 310.0]);
///
/// let config = TrainConfig::new().with_n_estimators(10);
/// let pipeline = EmissionPipeline::fit(&frame, &target, &config).unwrap();
///
/// let request = InferenceRequest::new()
///     .with_value("machine_hours", 5.0)
///     .with_value("machine_type", "A");
/// let prediction = pipeline.predict(&request).unwrap();
/// assert!(prediction.value >= 120.0 && prediction.value <= 310.0);
/// ```
#[derive(Debug, Clone)]
pub struct EmissionPipeline {
    schema: FeatureSchema,
    forest: RandomForestRegressor,
    importance: ImportanceTable,
    catalog: SuggestionCatalog,
}

impl EmissionPipeline {
    /// Trains the full pipeline from a feature frame and target vector.
    ///
    /// Encodes the frame, freezes the schema, fits the forest, and ranks
    /// column importances — all in one pass, so a constructed pipeline is
    /// always internally consistent. The built-in suggestion catalog is
    /// attached; swap it with [`EmissionPipeline::with_catalog`].
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is empty, the target length differs
    /// from the row count, training fails, or the importance scores do not
    /// line up with the schema width ([`HuellaError::SchemaMismatch`]).
    pub fn fit(features: &ProcessFrame, target: &Vector<f32>, config: &TrainConfig) -> Result<Self> {
        let mut encoder = FrameEncoder::new();
        let (matrix, schema) = encoder.fit_transform(features)?;

        if target.len() != matrix.n_rows() {
            return Err(HuellaError::dimension_mismatch(
                "target length",
                matrix.n_rows(),
                target.len(),
            ));
        }
        if matrix.n_cols() != schema.width() {
            return Err(HuellaError::SchemaMismatch {
                expected: schema.width(),
                actual: matrix.n_cols(),
            });
        }

        let mut forest =
            RandomForestRegressor::new(config.n_estimators).with_random_state(config.seed);
        if let Some(max_depth) = config.max_depth {
            forest = forest.with_max_depth(max_depth);
        }
        forest.fit(&matrix, target)?;

        let scores = forest
            .feature_importances()
            .ok_or_else(|| HuellaError::Other("Forest reported no importances after fit".into()))?;
        let importance = ImportanceTable::from_scores(&schema, &scores)?;

        Ok(Self {
            schema,
            forest,
            importance,
            catalog: SuggestionCatalog::new(),
        })
    }

    /// Loads a CSV dataset, splits off the target column, and trains.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the target column is
    /// missing or categorical, or training fails.
    pub fn from_csv_path<P: AsRef<Path>>(
        path: P,
        target_column: &str,
        config: &TrainConfig,
    ) -> Result<Self> {
        let mut frame = ProcessFrame::from_csv_path(path)?;
        let target = frame.take_numeric_column(target_column)?;
        Self::fit(&frame, &target, config)
    }

    /// Replaces the suggestion catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: SuggestionCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Returns the frozen feature schema.
    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Returns the trained forest.
    #[must_use]
    pub fn forest(&self) -> &RandomForestRegressor {
        &self.forest
    }

    /// Returns the full importance ranking.
    #[must_use]
    pub fn importance(&self) -> &ImportanceTable {
        &self.importance
    }

    /// Returns the suggestion catalog.
    #[must_use]
    pub fn catalog(&self) -> &SuggestionCatalog {
        &self.catalog
    }

    /// Predicts emissions from raw user input.
    ///
    /// The input row is assembled against the frozen training schema;
    /// missing or malformed values degrade (and are reported in the
    /// [`Prediction`]) rather than fail.
    ///
    /// # Errors
    ///
    /// Returns [`HuellaError::UnknownFeature`] if the request names a
    /// feature outside the training set.
    pub fn predict(&self, request: &InferenceRequest) -> Result<Prediction> {
        predict_with(&self.forest, &self.schema, request)
    }

    /// Returns the `k` most important encoded columns.
    ///
    /// # Errors
    ///
    /// Returns [`HuellaError::InvalidRange`] if `k` is zero or exceeds the
    /// number of encoded columns.
    pub fn top_k(&self, k: usize) -> Result<&[FeatureImportance]> {
        self.importance.top_k(k)
    }

    /// Returns the advice text for a source feature.
    ///
    /// Never fails; features without an entry get the fixed fallback text.
    #[must_use]
    pub fn suggest(&self, feature: &str) -> &str {
        self.catalog.resolve(feature)
    }

    /// Returns advice for the source features behind the top `k` encoded
    /// columns.
    ///
    /// One-hot columns map back to their source feature first, so
    /// `machine_type_A` yields the `machine_type` advice. Sources repeated
    /// among the top columns are collapsed, keeping rank order; the result
    /// can therefore be shorter than `k`.
    ///
    /// # Errors
    ///
    /// Returns [`HuellaError::InvalidRange`] if `k` is zero or exceeds the
    /// number of encoded columns.
    pub fn top_suggestions(&self, k: usize) -> Result<Vec<(String, String)>> {
        let top = self.importance.top_k(k)?;

        let mut out: Vec<(String, String)> = Vec::with_capacity(top.len());
        for entry in top {
            let source = self
                .schema
                .source_feature(&entry.feature)
                .unwrap_or(entry.feature.as_str());
            if out.iter().any(|(feature, _)| feature == source) {
                continue;
            }
            out.push((source.to_string(), self.catalog.resolve(source).to_string()));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::frame::FeatureColumn;
    use crate::suggest::NO_SUGGESTION;

    use super::*;

    fn training_data() -> (ProcessFrame, Vector<f32>) {
        let frame = ProcessFrame::new(vec![
            (
                "machine_hours".to_string(),
                FeatureColumn::Numeric(Vector::from_vec(vec![
                    2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0,
                ])),
            ),
            (
                "machine_type".to_string(),
                FeatureColumn::Categorical(vec![
                    "A".to_string(),
                    "A".to_string(),
                    "A".to_string(),
                    "A".to_string(),
                    "B".to_string(),
                    "B".to_string(),
                    "B".to_string(),
                    "B".to_string(),
                ]),
            ),
        ])
        .unwrap();
        let target = Vector::from_vec(vec![
            110.0, 120.0, 130.0, 140.0, 300.0, 310.0, 320.0, 330.0,
        ]);
        (frame, target)
    }

    fn small_config() -> TrainConfig {
        TrainConfig::new().with_n_estimators(15)
    }

    #[test]
    fn test_fit_builds_consistent_pipeline() {
        let (frame, target) = training_data();
        let pipeline = EmissionPipeline::fit(&frame, &target, &small_config()).unwrap();

        assert_eq!(pipeline.schema().width(), 3);
        assert_eq!(pipeline.importance().len(), 3);
        assert!(pipeline.forest().is_fitted());

        let sum: f32 = pipeline.importance().iter().map(|e| e.importance).sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_fit_target_length_mismatch_fails() {
        let (frame, _) = training_data();
        let short_target = Vector::from_vec(vec![1.0, 2.0]);
        let result = EmissionPipeline::fit(&frame, &short_target, &small_config());
        assert!(matches!(
            result,
            Err(HuellaError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_predict_full_request() {
        let (frame, target) = training_data();
        let pipeline = EmissionPipeline::fit(&frame, &target, &small_config()).unwrap();

        let request = InferenceRequest::new()
            .with_value("machine_hours", 3.5)
            .with_value("machine_type", "A");
        let prediction = pipeline.predict(&request).unwrap();

        assert!(!prediction.is_degraded());
        assert!(prediction.value >= 110.0 && prediction.value <= 330.0);
    }

    #[test]
    fn test_predict_degraded_request_succeeds() {
        let (frame, target) = training_data();
        let pipeline = EmissionPipeline::fit(&frame, &target, &small_config()).unwrap();

        let request = InferenceRequest::new().with_value("machine_hours", 3.5);
        let prediction = pipeline.predict(&request).unwrap();

        assert!(prediction.is_degraded());
        assert_eq!(prediction.degraded_features, vec!["machine_type"]);
        assert!(prediction.value.is_finite());
    }

    #[test]
    fn test_predict_unknown_feature_fails() {
        let (frame, target) = training_data();
        let pipeline = EmissionPipeline::fit(&frame, &target, &small_config()).unwrap();

        let request = InferenceRequest::new().with_value("paint_color", "red");
        assert!(matches!(
            pipeline.predict(&request),
            Err(HuellaError::UnknownFeature { .. })
        ));

        // The pipeline survives the rejected request.
        let ok = InferenceRequest::new()
            .with_value("machine_hours", 4.0)
            .with_value("machine_type", "B");
        assert!(pipeline.predict(&ok).is_ok());
    }

    #[test]
    fn test_same_seed_reproduces_predictions() {
        let (frame, target) = training_data();
        let config = small_config().with_seed(42);

        let first = EmissionPipeline::fit(&frame, &target, &config).unwrap();
        let second = EmissionPipeline::fit(&frame, &target, &config).unwrap();

        let request = InferenceRequest::new()
            .with_value("machine_hours", 5.5)
            .with_value("machine_type", "B");
        assert_eq!(
            first.predict(&request).unwrap(),
            second.predict(&request).unwrap()
        );
        assert_eq!(first.importance().entries(), second.importance().entries());
    }

    #[test]
    fn test_top_k_and_invalid_range() {
        let (frame, target) = training_data();
        let pipeline = EmissionPipeline::fit(&frame, &target, &small_config()).unwrap();

        assert_eq!(pipeline.top_k(3).unwrap().len(), 3);
        assert!(matches!(
            pipeline.top_k(0),
            Err(HuellaError::InvalidRange { .. })
        ));
        assert!(matches!(
            pipeline.top_k(10),
            Err(HuellaError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_suggest_known_and_unknown() {
        let (frame, target) = training_data();
        let pipeline = EmissionPipeline::fit(&frame, &target, &small_config()).unwrap();

        assert!(pipeline.suggest("machine_hours").contains("runtime"));
        assert_eq!(pipeline.suggest("not_a_feature"), NO_SUGGESTION);
    }

    #[test]
    fn test_top_suggestions_map_to_source_features() {
        let (frame, target) = training_data();
        let pipeline = EmissionPipeline::fit(&frame, &target, &small_config()).unwrap();

        let suggestions = pipeline.top_suggestions(3).unwrap();
        assert!(!suggestions.is_empty());
        for (feature, advice) in &suggestions {
            // Sources, never derived column names.
            assert!(feature == "machine_hours" || feature == "machine_type");
            assert_ne!(advice, NO_SUGGESTION);
        }
    }

    #[test]
    fn test_with_catalog_overrides_advice() {
        let (frame, target) = training_data();
        let catalog = SuggestionCatalog::empty().with_suggestion("machine_hours", "Idle less.");
        let pipeline = EmissionPipeline::fit(&frame, &target, &small_config())
            .unwrap()
            .with_catalog(catalog);

        assert_eq!(pipeline.suggest("machine_hours"), "Idle less.");
        assert_eq!(pipeline.suggest("machine_type"), NO_SUGGESTION);
    }

    #[test]
    fn test_train_config_builders() {
        let config = TrainConfig::new()
            .with_n_estimators(7)
            .with_max_depth(3)
            .with_seed(9);
        assert_eq!(config.n_estimators, 7);
        assert_eq!(config.max_depth, Some(3));
        assert_eq!(config.seed, 9);

        let default = TrainConfig::default();
        assert_eq!(default.n_estimators, 100);
        assert_eq!(default.max_depth, None);
        assert_eq!(default.seed, 42);
    }
}
