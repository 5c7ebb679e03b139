//! Console walkthrough of the full pipeline: train on synthetic process
//! data, predict a configuration, rank emission drivers, and print advice.
//!
//! Run with: `cargo run --example emissions_dashboard`

use huella::prelude::*;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Generates a plausible manufacturing dataset where machine runtime,
/// energy draw, and machine class drive CO2 output.
fn synthetic_dataset(rows: usize, seed: u64) -> (ProcessFrame, Vector<f32>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let hours_dist = Uniform::from(1.0f32..12.0);
    let energy_dist = Uniform::from(40.0f32..320.0);
    let noise_dist = Uniform::from(-15.0f32..15.0);
    let pick = Uniform::from(0usize..3);

    let machine_types = ["electric", "hybrid", "diesel"];
    let machine_penalty = [0.0, 35.0, 90.0];
    let materials = ["recycled", "aluminum", "steel"];
    let material_penalty = [0.0, 20.0, 45.0];

    let mut hours = Vec::with_capacity(rows);
    let mut energy = Vec::with_capacity(rows);
    let mut kinds = Vec::with_capacity(rows);
    let mut mats = Vec::with_capacity(rows);
    let mut co2 = Vec::with_capacity(rows);

    for _ in 0..rows {
        let h = hours_dist.sample(&mut rng);
        let e = energy_dist.sample(&mut rng);
        let k = pick.sample(&mut rng);
        let m = pick.sample(&mut rng);

        hours.push(h);
        energy.push(e);
        kinds.push(machine_types[k].to_string());
        mats.push(materials[m].to_string());
        co2.push(
            18.0 * h + 0.9 * e + machine_penalty[k] + material_penalty[m]
                + noise_dist.sample(&mut rng),
        );
    }

    let frame = ProcessFrame::new(vec![
        (
            "machine_hours".to_string(),
            FeatureColumn::Numeric(Vector::from_vec(hours)),
        ),
        (
            "energy_consumption".to_string(),
            FeatureColumn::Numeric(Vector::from_vec(energy)),
        ),
        ("machine_type".to_string(), FeatureColumn::Categorical(kinds)),
        ("material_type".to_string(), FeatureColumn::Categorical(mats)),
    ])
    .expect("synthetic frame is well-formed");

    (frame, Vector::from_vec(co2))
}

fn print_importances(pipeline: &EmissionPipeline, k: usize) {
    let top = pipeline.top_k(k).expect("k within table bounds");
    let max = top.first().map_or(1.0, |e| e.importance.max(f32::EPSILON));

    println!("Top {k} emission drivers (encoded columns):");
    for entry in top {
        let bar_len = ((entry.importance / max) * 40.0).round() as usize;
        println!(
            "  {:<28} {:>6.3} {}",
            entry.feature,
            entry.importance,
            "#".repeat(bar_len)
        );
    }
}

fn main() -> Result<()> {
    let (frame, co2) = synthetic_dataset(300, 42);

    println!(
        "Training on {} records, {} features...",
        frame.n_rows(),
        frame.n_cols()
    );
    let config = TrainConfig::new().with_n_estimators(100).with_seed(42);
    let pipeline = EmissionPipeline::fit(&frame, &co2, &config)?;

    let schema = pipeline.schema();
    println!(
        "Frozen schema: {} source features -> {} encoded columns\n",
        schema.n_source_features(),
        schema.width()
    );

    // A fully specified configuration.
    let request = InferenceRequest::new()
        .with_value("machine_hours", 7.5)
        .with_value("energy_consumption", 210.0)
        .with_value("machine_type", "diesel")
        .with_value("material_type", "steel");
    let prediction = pipeline.predict(&request)?;
    println!("Predicted CO2 emissions: {:.2} kg", prediction.value);

    // The same request with a machine class the model never saw: the
    // prediction still comes back, flagged as degraded.
    let novel = InferenceRequest::new()
        .with_value("machine_hours", 7.5)
        .with_value("energy_consumption", 210.0)
        .with_value("machine_type", "hydrogen")
        .with_value("material_type", "steel");
    let degraded = pipeline.predict(&novel)?;
    println!(
        "With unseen machine type: {:.2} kg (degraded inputs: {})\n",
        degraded.value,
        degraded.degraded_features.join(", ")
    );

    print_importances(&pipeline, 7.min(schema.width()));

    println!("\nSuggested actions:");
    for (feature, advice) in pipeline.top_suggestions(3)? {
        println!("  {feature}: {advice}");
    }

    Ok(())
}
