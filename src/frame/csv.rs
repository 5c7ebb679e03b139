//! CSV ingestion with column-kind inference.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::primitives::Vector;

use super::{FeatureColumn, ProcessFrame};

impl ProcessFrame {
    /// Loads a frame from a CSV file with a header row.
    ///
    /// Column kinds are inferred: a column where every value parses as a
    /// float becomes [`FeatureColumn::Numeric`], anything else becomes
    /// [`FeatureColumn::Categorical`]. Inference happens once at load; the
    /// encoder trusts the declared kind from then on.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, a record has the wrong
    /// width, or the header is missing or duplicated.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Loads a frame from any CSV reader with a header row.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ProcessFrame::from_csv_path`].
    ///
    /// # Examples
    ///
    /// ```
    /// use huella::frame::ProcessFrame;
    ///
    /// let csv = "machine_hours,machine_type\n4.0,A\n9.5,B\n";
    /// let frame = ProcessFrame::from_csv_reader(csv.as_bytes()).unwrap();
    /// assert_eq!(frame.shape(), (2, 2));
    /// assert!(frame.column("machine_hours").unwrap().is_numeric());
    /// assert!(frame.column("machine_type").unwrap().is_categorical());
    /// ```
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err("CSV input has no header row".into());
        }

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in rdr.records() {
            let record = record?;
            for (i, field) in record.iter().enumerate() {
                cells[i].push(field.to_string());
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, values)| (name, infer_column(values)))
            .collect();

        Self::new(columns)
    }
}

/// Declares a column numeric when every value parses as `f32`.
fn infer_column(values: Vec<String>) -> FeatureColumn {
    let parsed: Option<Vec<f32>> = values.iter().map(|v| v.parse::<f32>().ok()).collect();
    match parsed {
        Some(numbers) => FeatureColumn::Numeric(Vector::from_vec(numbers)),
        None => FeatureColumn::Categorical(values),
    }
}
