//! Monod kinetics simulation.

pub mod monod;

pub use monod::*;
