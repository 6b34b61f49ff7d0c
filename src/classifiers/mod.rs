mod classifier;
pub mod lazy;

pub use classifier::Classifier;
