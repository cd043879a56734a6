//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - measured inputs (`MeasurementSample`, the tagged `MeasurementSet`)
//! - fitted parameters (`LogisticFitParams`, `MonodFitParams`)
//! - simulation and display outputs (`SimulationTrace`, series types)
//! - run configuration (`ForecastConfig`, search knobs)

pub mod types;

pub use types::*;
