//! Mathematical utilities: grid generation and linear interpolation.

pub mod grid;

pub use grid::*;
