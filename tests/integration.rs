//! End-to-end tests: dataset in, predictions and suggestions out.

use std::io::Write;

use huella::prelude::*;

/// Eight process records over three machine types and two materials.
fn process_frame() -> (ProcessFrame, Vector<f32>) {
    let frame = ProcessFrame::new(vec![
        (
            "machine_hours".to_string(),
            FeatureColumn::Numeric(Vector::from_vec(vec![
                2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0,
            ])),
        ),
        (
            "energy_consumption".to_string(),
            FeatureColumn::Numeric(Vector::from_vec(vec![
                80.0, 95.0, 110.0, 125.0, 260.0, 275.0, 290.0, 305.0,
            ])),
        ),
        (
            "machine_type".to_string(),
            FeatureColumn::Categorical(
                ["lathe", "lathe", "mill", "mill", "press", "press", "lathe", "mill"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
        ),
        (
            "material_type".to_string(),
            FeatureColumn::Categorical(
                ["steel", "steel", "aluminum", "steel", "aluminum", "steel", "aluminum", "steel"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
        ),
    ])
    .unwrap();

    let co2 = Vector::from_vec(vec![
        140.0, 155.0, 180.0, 195.0, 410.0, 425.0, 310.0, 330.0,
    ]);
    (frame, co2)
}

#[test]
fn training_freezes_expected_schema() {
    let (frame, co2) = process_frame();
    let config = TrainConfig::new().with_n_estimators(10);
    let pipeline = EmissionPipeline::fit(&frame, &co2, &config).unwrap();

    // Numeric columns first in frame order, then groups alphabetically with
    // sorted categories.
    assert_eq!(
        pipeline.schema().column_names(),
        vec![
            "machine_hours",
            "energy_consumption",
            "machine_type_lathe",
            "machine_type_mill",
            "machine_type_press",
            "material_type_aluminum",
            "material_type_steel",
        ]
    );
    assert_eq!(pipeline.schema().width(), 7);
}

#[test]
fn partial_input_assembles_against_frozen_schema() {
    let frame = ProcessFrame::new(vec![
        (
            "machine_type".to_string(),
            FeatureColumn::Categorical(vec!["A".to_string(), "B".to_string(), "A".to_string()]),
        ),
        (
            "machine_hours".to_string(),
            FeatureColumn::Numeric(Vector::from_vec(vec![4.0, 9.5, 6.0])),
        ),
    ])
    .unwrap();

    let mut encoder = FrameEncoder::new();
    let (_, schema) = encoder.fit_transform(&frame).unwrap();
    assert_eq!(
        schema.column_names(),
        vec!["machine_hours", "machine_type_A", "machine_type_B"]
    );

    // Only hours provided: the categorical group stays zero and is reported.
    let request = InferenceRequest::new().with_value("machine_hours", 5.0);
    let (row, degraded) = assemble_row(&schema, &request).unwrap();
    assert_eq!(row, vec![5.0, 0.0, 0.0]);
    assert_eq!(degraded, vec!["machine_type"]);

    // Text "5" coerces cleanly; label "C" was never seen, so its group is
    // zero and only machine_type is flagged.
    let request = InferenceRequest::new()
        .with_value("machine_hours", "5")
        .with_value("machine_type", "C");
    let (row, degraded) = assemble_row(&schema, &request).unwrap();
    assert_eq!(row, vec![5.0, 0.0, 0.0]);
    assert_eq!(degraded, vec!["machine_type"]);
}

#[test]
fn pipeline_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<EmissionPipeline>();
    assert_send_sync::<FeatureSchema>();
    assert_send_sync::<InferenceRequest>();

    // Concurrent readers share one fitted pipeline with no locking.
    let (frame, co2) = process_frame();
    let config = TrainConfig::new().with_n_estimators(8);
    let pipeline = EmissionPipeline::fit(&frame, &co2, &config).unwrap();

    std::thread::scope(|scope| {
        for hours in [2.0f32, 5.0, 8.0] {
            let pipeline = &pipeline;
            scope.spawn(move || {
                let request = InferenceRequest::new()
                    .with_value("machine_hours", hours)
                    .with_value("energy_consumption", 150.0)
                    .with_value("machine_type", "mill")
                    .with_value("material_type", "steel");
                let prediction = pipeline.predict(&request).unwrap();
                assert!(prediction.value.is_finite());
            });
        }
    });
}

#[test]
fn prediction_flow_with_full_and_degraded_input() {
    let (frame, co2) = process_frame();
    let config = TrainConfig::new().with_n_estimators(20);
    let pipeline = EmissionPipeline::fit(&frame, &co2, &config).unwrap();

    let full = InferenceRequest::new()
        .with_value("machine_hours", 5.5)
        .with_value("energy_consumption", 200.0)
        .with_value("machine_type", "mill")
        .with_value("material_type", "steel");
    let prediction = pipeline.predict(&full).unwrap();
    assert!(!prediction.is_degraded());
    assert!(prediction.value >= 140.0 && prediction.value <= 425.0);

    // Unseen machine type plus a missing material: both degrade, neither fails.
    let degraded = InferenceRequest::new()
        .with_value("machine_hours", 5.5)
        .with_value("energy_consumption", 200.0)
        .with_value("machine_type", "laser");
    let prediction = pipeline.predict(&degraded).unwrap();
    assert!(prediction.value.is_finite());
    assert_eq!(
        prediction.degraded_features,
        vec!["machine_type", "material_type"]
    );
}

#[test]
fn unknown_feature_rejects_without_poisoning_pipeline() {
    let (frame, co2) = process_frame();
    let config = TrainConfig::new().with_n_estimators(10);
    let pipeline = EmissionPipeline::fit(&frame, &co2, &config).unwrap();

    let bad = InferenceRequest::new()
        .with_value("machine_hours", 5.0)
        .with_value("paint_color", "red");
    match pipeline.predict(&bad) {
        Err(HuellaError::UnknownFeature { feature }) => assert_eq!(feature, "paint_color"),
        other => panic!("Expected UnknownFeature, got {other:?}"),
    }

    let good = InferenceRequest::new()
        .with_value("machine_hours", 5.0)
        .with_value("energy_consumption", 120.0)
        .with_value("machine_type", "mill")
        .with_value("material_type", "steel");
    assert!(pipeline.predict(&good).is_ok());
}

#[test]
fn ranking_and_suggestions_flow() {
    let (frame, co2) = process_frame();
    let config = TrainConfig::new().with_n_estimators(20);
    let pipeline = EmissionPipeline::fit(&frame, &co2, &config).unwrap();

    let table = pipeline.importance();
    assert_eq!(table.len(), 7);
    let scores: Vec<f32> = table.iter().map(|e| e.importance).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert!((scores.iter().sum::<f32>() - 1.0).abs() < 1e-5);

    let top = pipeline.top_k(3).unwrap();
    assert_eq!(top.len(), 3);

    // Suggestions come back keyed by source feature, with catalog text for
    // the features the default catalog knows.
    let suggestions = pipeline.top_suggestions(3).unwrap();
    assert!(!suggestions.is_empty());
    for (feature, advice) in &suggestions {
        assert!(pipeline.schema().has_source_feature(feature));
        assert!(!advice.is_empty());
    }
}

#[test]
fn identical_seeds_give_identical_pipelines() {
    let (frame, co2) = process_frame();
    let config = TrainConfig::new().with_n_estimators(12).with_seed(42);

    let first = EmissionPipeline::fit(&frame, &co2, &config).unwrap();
    let second = EmissionPipeline::fit(&frame, &co2, &config).unwrap();

    assert_eq!(first.schema(), second.schema());
    assert_eq!(first.importance().entries(), second.importance().entries());

    let request = InferenceRequest::new()
        .with_value("machine_hours", 4.5)
        .with_value("energy_consumption", 150.0)
        .with_value("machine_type", "lathe")
        .with_value("material_type", "steel");
    assert_eq!(
        first.predict(&request).unwrap(),
        second.predict(&request).unwrap()
    );
}

#[test]
fn csv_to_prediction_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "machine_hours,machine_type,co2_emissions").unwrap();
    for (hours, kind, co2) in [
        (2.0, "lathe", 150.0),
        (4.0, "lathe", 180.0),
        (6.0, "mill", 320.0),
        (8.0, "mill", 360.0),
        (3.0, "lathe", 165.0),
        (7.0, "mill", 340.0),
    ] {
        writeln!(file, "{hours},{kind},{co2}").unwrap();
    }

    let config = TrainConfig::new().with_n_estimators(15);
    let pipeline =
        EmissionPipeline::from_csv_path(file.path(), "co2_emissions", &config).unwrap();

    assert_eq!(
        pipeline.schema().column_names(),
        vec!["machine_hours", "machine_type_lathe", "machine_type_mill"]
    );

    let request = InferenceRequest::new()
        .with_value("machine_hours", 5.0)
        .with_value("machine_type", "mill");
    let prediction = pipeline.predict(&request).unwrap();
    assert!(prediction.value >= 150.0 && prediction.value <= 360.0);
}

#[test]
fn csv_with_wrong_target_column_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "machine_hours,machine_type").unwrap();
    writeln!(file, "2.0,lathe").unwrap();

    let config = TrainConfig::default();
    assert!(EmissionPipeline::from_csv_path(file.path(), "co2_emissions", &config).is_err());
    assert!(EmissionPipeline::from_csv_path(file.path(), "machine_type", &config).is_err());
}

#[test]
fn stub_model_sees_schema_ordered_row() {
    // The inference path is generic over Estimator, so a stub can stand in
    // for the forest and reveal the exact row it received.
    struct EchoFirst;

    impl Estimator for EchoFirst {
        fn fit(&mut self, _x: &Matrix<f32>, _y: &Vector<f32>) -> Result<()> {
            Ok(())
        }

        fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
            Vector::from_vec((0..x.n_rows()).map(|i| x.row(i)[0]).collect())
        }
    }

    let schema = FeatureSchema::new(
        vec!["machine_hours".to_string()],
        vec![(
            "machine_type".to_string(),
            vec!["A".to_string(), "B".to_string()],
        )],
    );

    let request = InferenceRequest::new()
        .with_value("machine_hours", 5.0)
        .with_value("machine_type", "B");
    let prediction = predict_with(&EchoFirst, &schema, &request).unwrap();
    assert_eq!(prediction.value, 5.0);
}
