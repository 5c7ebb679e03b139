//! Huella: CO2 emission prediction for manufacturing process data.
//!
//! Huella trains a random forest on mixed numeric/categorical process data
//! and then answers three questions about it: what will this configuration
//! emit, which features drive emissions, and what should the operator change.
//!
//! The load-bearing idea is schema consistency. Training freezes a
//! [`encoding::FeatureSchema`] describing the one-hot encoded feature space,
//! and every later prediction assembles its input row against that schema —
//! same columns, same order, same width — instead of re-deriving a layout
//! from whatever the caller sent. Missing or malformed inputs degrade to a
//! neutral encoding and are reported as metadata; only a feature name the
//! model has never seen rejects a request.
//!
//! # Quick Start
//!
//! ```
//! use huella::prelude::*;
//!
//! // Process records: runtime hours plus a machine class.
//! let frame = ProcessFrame::new(vec![
//!     (
//!         "machine_hours".to_string(),
//!         FeatureColumn::Numeric(Vector::from_vec(vec![2.0, 4.0, 6.0, 8.0])),
//!     ),
//!     (
//!         "machine_type".to_string(),
//!         FeatureColumn::Categorical(vec![
//!             "A".to_string(),
//!             "A".to_string(),
//!             "B".to_string(),
//!             "B".to_string(),
//!         ]),
//!     ),
//! ])
//! .unwrap();
//! let co2 = Vector::from_vec(vec![120.0, 150.0, 280.0, 310.0]);
//!
//! // Train: encode, freeze the schema, fit the forest, rank importances.
//! let config = TrainConfig::new().with_n_estimators(10);
//! let pipeline = EmissionPipeline::fit(&frame, &co2, &config).unwrap();
//!
//! // Predict from raw input.
//! let request = InferenceRequest::new()
//!     .with_value("machine_hours", 5.0)
//!     .with_value("machine_type", "B");
//! let prediction = pipeline.predict(&request).unwrap();
//! assert!(prediction.value >= 120.0 && prediction.value <= 310.0);
//! assert!(!prediction.is_degraded());
//!
//! // Rank drivers and look up advice.
//! let top = pipeline.top_k(2).unwrap();
//! assert_eq!(top.len(), 2);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`frame`]: Typed column storage and CSV ingestion
//! - [`encoding`]: One-hot encoding and the frozen feature schema
//! - [`tree`]: Decision tree and random forest regressors
//! - [`rank`]: Feature importance ranking
//! - [`infer`]: Raw-input row assembly and prediction
//! - [`suggest`]: Emission-reduction suggestion lookup
//! - [`pipeline`]: End-to-end training and query context
//! - [`metrics`]: Regression metrics
//! - [`traits`]: The `Estimator` seam between encoding and models

pub mod encoding;
pub mod error;
pub mod frame;
pub mod infer;
pub mod metrics;
pub mod pipeline;
pub mod prelude;
pub mod primitives;
pub mod rank;
pub mod suggest;
pub mod traits;
pub mod tree;
