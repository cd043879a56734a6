//! `fermcast` library crate.
//!
//! The binary (`fermcast`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future GUI front-ends, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod convert;
pub mod domain;
pub mod duration;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod query;
pub mod recipe;
pub mod report;
pub mod sim;
