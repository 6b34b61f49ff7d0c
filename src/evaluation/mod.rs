mod confusion_matrix;
mod report;

pub use confusion_matrix::ConfusionMatrix;
pub use report::EvaluationReport;
