//! Read/write forecast JSON files.
//!
//! Forecast JSON is the "portable" representation of one run:
//! - fitted parameters for both models
//! - the full display series over the evaluation grid
//!
//! so external tooling (plotting scripts, spreadsheets) can consume the
//! series without re-running the estimators.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::pipeline::RunOutput;
use crate::domain::{
    AbvMethod, ForecastConfig, LogisticFitParams, LogisticSeries, MeasurementSet, MonodFit,
    MonodSeries, PointPrediction,
};
use crate::error::AppError;

/// On-disk schema of an exported forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastFile {
    pub tool: String,
    pub volume_l: f64,
    pub yeast_mass_g: f64,
    pub predict_end_days: f64,
    pub abv_method: AbvMethod,
    pub seed: u64,
    pub samples: MeasurementSet,
    pub logistic_fit: Option<LogisticFitParams>,
    pub monod_fit: MonodFit,
    pub logistic: Option<LogisticSeries>,
    pub monod: MonodSeries,
    pub point: Option<PointPrediction>,
}

/// Write a forecast JSON file.
pub fn write_forecast_json(
    path: &Path,
    run: &RunOutput,
    config: &ForecastConfig,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::io(format!(
            "Failed to create forecast JSON '{}': {e}",
            path.display()
        ))
    })?;

    let doc = ForecastFile {
        tool: "fermcast".to_string(),
        volume_l: config.volume_l,
        yeast_mass_g: config.yeast_mass_g,
        predict_end_days: config.predict_end_days,
        abv_method: config.abv_method,
        seed: config.search.seed,
        samples: run.set,
        logistic_fit: run.logistic_fit,
        monod_fit: run.monod_fit,
        logistic: run.logistic.clone(),
        monod: run.monod.clone(),
        point: run.point,
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::io(format!("Failed to write forecast JSON: {e}")))?;

    Ok(())
}

/// Read a forecast JSON file.
pub fn read_forecast_json(path: &Path) -> Result<ForecastFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::io(format!(
            "Failed to open forecast JSON '{}': {e}",
            path.display()
        ))
    })?;
    let doc: ForecastFile = serde_json::from_reader(file)
        .map_err(|e| AppError::io(format!("Invalid forecast JSON: {e}")))?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_forecast;
    use crate::domain::MeasurementSample;

    #[test]
    fn forecast_survives_a_disk_round_trip() {
        let set = MeasurementSet::from_samples(&[
            MeasurementSample {
                time_days: 0.0,
                sg: 1.100,
            },
            MeasurementSample {
                time_days: 3.0,
                sg: 1.060,
            },
        ])
        .unwrap();
        let config = ForecastConfig::new(20.0, 5.0, 10.0);
        let run = run_forecast(&set, &config).unwrap();

        let dir = std::env::temp_dir();
        let path = dir.join("fermcast-io-test.json");
        write_forecast_json(&path, &run, &config).unwrap();
        let doc = read_forecast_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(doc.tool, "fermcast");
        assert_eq!(doc.monod_fit, run.monod_fit);
        assert_eq!(doc.monod.t.len(), run.monod.t.len());
        assert_eq!(doc.samples, run.set);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_forecast_json(Path::new("/nonexistent/fermcast.json")).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
