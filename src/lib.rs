//! Binning (blocking) error analysis for a one-dimensional Metropolis random walk.
//!
//! The walk in [`metropolis`] samples a quadratic well and records two
//! streams, the correlated positions and an independent uniform control. The
//! analyzer in [`stats`] turns each finished stream into a mean, a naive error,
//! a blocked error and an autocorrelation time estimate.

pub mod core;
pub mod distributions;
pub mod error;
pub mod estimate;
pub mod io;
pub mod metropolis;
pub mod series;
pub mod simulation;
pub mod stats;

pub use error::BinningError;
pub use estimate::Estimate;
pub use series::{FrozenSeries, SampleSeries};
pub use stats::{analyze, BinningAnalyzer, BinningStats};
