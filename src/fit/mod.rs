//! Curve fitting for sparse gravity readings.
//!
//! Responsibilities:
//!
//! - closed-form and searched fits of the empirical logistic SG(t) shape
//! - heuristic estimation of Monod kinetic parameters against the simulator
//!
//! Both searches are bounded-budget heuristics: a deterministic coarse grid
//! followed by seeded randomized refinement, always retaining the lowest
//! weighted SSE seen. Neither is guaranteed globally optimal, only bounded
//! and reproducible for a given seed.

pub mod logistic;
pub mod monod;

pub use logistic::*;
pub use monod::*;
