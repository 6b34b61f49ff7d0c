pub mod learner_params;
pub mod schema;

pub use learner_params::KnnParams;
