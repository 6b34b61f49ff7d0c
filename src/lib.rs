//! Lazy k-nearest-neighbour classification over mixed nominal and numeric
//! attributes.
//!
//! The classifier lives in [`classifiers::lazy`]; [`streams`] reads ARFF data,
//! [`tasks`] runs holdout evaluations and [`ui`] backs the `kenn` binary.

pub mod classifiers;
pub mod core;
pub mod error;
pub mod evaluation;
pub mod logging;
pub mod streams;
pub mod tasks;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod ui;
pub mod utils;

pub use error::KnnError;
