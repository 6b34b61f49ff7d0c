use crate::classifiers::Classifier;
use crate::core::instances::AttributeValue;
use crate::error::KnnError;
use crate::streams::{ArffFileStream, Stream};
use serde::Serialize;
use std::io;
use tracing::info;

/// Label predicted for one data row of a query file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowPrediction {
    /// 1-based data row in the query file.
    pub row: usize,
    pub prediction: AttributeValue,
}

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("query data does not share the learner's schema")]
    SchemaMismatch,

    #[error("failed to read query row: {0}")]
    Read(#[source] io::Error),

    #[error("failed to classify query row {row}: {source}")]
    Classify {
        row: usize,
        #[source]
        source: KnnError,
    },
}

/// Labels every data row of `queries`, in file order.
///
/// The first row that cannot be parsed or classified aborts the run, so the
/// returned predictions always line up one-to-one with the file's rows.
pub fn predict_rows(
    learner: &dyn Classifier,
    queries: &mut ArffFileStream,
) -> Result<Vec<RowPrediction>, PredictionError> {
    let expected = learner.header();
    let found = queries.header();
    if expected.kinds() != found.kinds() || expected.class_index() != found.class_index() {
        return Err(PredictionError::SchemaMismatch);
    }

    let mut predictions = Vec::new();
    while let Some(next) = queries.next_row() {
        let (row, query) = next.map_err(PredictionError::Read)?;
        let prediction = learner
            .predict(&query)
            .map_err(|source| PredictionError::Classify { row, source })?;
        predictions.push(RowPrediction { row, prediction });
    }
    info!(rows = predictions.len(), "query rows classified");
    Ok(predictions)
}
