//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use huella::prelude::*;
//! ```

pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::Estimator;
pub use crate::error::{HuellaError, Result};
pub use crate::frame::{FeatureColumn, ProcessFrame};
pub use crate::encoding::{CategoricalGroup, FeatureSchema, FrameEncoder};
pub use crate::tree::{DecisionTreeRegressor, RandomForestRegressor};
pub use crate::metrics::{mae, mse, r_squared, rmse};
pub use crate::rank::{FeatureImportance, ImportanceTable};
pub use crate::infer::{assemble_row, predict_with, InferenceRequest, Prediction, RawValue};
pub use crate::suggest::{SuggestionCatalog, NO_SUGGESTION};
pub use crate::pipeline::{EmissionPipeline, TrainConfig};
