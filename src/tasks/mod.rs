mod batch_prediction;
mod holdout_evaluator;

pub use batch_prediction::{PredictionError, RowPrediction, predict_rows};
pub use holdout_evaluator::{HoldoutEvaluator, split_instances};
