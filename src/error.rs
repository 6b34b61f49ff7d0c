use crate::core::attributes::AttributeKind;

/// Error type for all fallible operations of the nearest-neighbour classifier.
///
/// Every variant is a deterministic function of the inputs; nothing is retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KnnError {
    /// Returned when k is zero or negative.
    #[error("k must be >= 1, got {k}")]
    InvalidK {
        /// The rejected k value.
        k: i64,
    },

    /// Returned when the inverse-distance epsilon is non-finite or non-positive.
    #[error("epsilon must be finite and positive, got {epsilon}")]
    InvalidEpsilon {
        /// The rejected epsilon value.
        epsilon: f64,
    },

    /// Returned when a metric name is not recognised.
    #[error("unknown distance metric '{0}' (expected manhattan or euclidean)")]
    UnknownMetric(String),

    /// Returned when a weighting name is not recognised.
    #[error("unknown vote weighting '{0}' (expected uniform or inverse-distance)")]
    UnknownWeighting(String),

    /// Returned when the class index does not point at a schema column.
    #[error("class index {class_index} is out of range for {n_attributes} attributes")]
    MissingClassColumn {
        /// Declared class column.
        class_index: usize,
        /// Number of columns in the schema.
        n_attributes: usize,
    },

    /// Returned when predicting before any training set was stored.
    #[error("classifier has not been trained")]
    Untrained,

    /// Returned when training on an empty set of instances.
    #[error("training set is empty")]
    EmptyTrainingSet,

    /// Returned when an instance has a different number of columns than the schema.
    #[error("instance has {found} values but the schema declares {expected} attributes")]
    ArityMismatch {
        /// Columns declared by the schema.
        expected: usize,
        /// Values carried by the instance.
        found: usize,
    },

    /// Returned when a value's type disagrees with its column's declared kind.
    #[error("attribute #{index} is {expected} but the instance holds a {found} value")]
    KindMismatch {
        /// Offending column.
        index: usize,
        /// Kind declared by the schema.
        expected: AttributeKind,
        /// Kind carried by the instance.
        found: AttributeKind,
    },

    /// Returned when a nominal value is outside its column's declared domain.
    #[error("value '{value}' is not in the domain of nominal attribute #{index}")]
    UnknownNominalValue {
        /// Offending column.
        index: usize,
        /// The rejected token.
        value: String,
    },

    /// Returned when a numeric value is NaN or infinite.
    #[error("non-finite value at attribute #{index}")]
    NonFiniteValue {
        /// Offending column.
        index: usize,
    },

    /// Returned when a value is missing where one is required.
    #[error("missing value at attribute #{index}")]
    MissingValue {
        /// Offending column.
        index: usize,
    },
}

impl KnnError {
    /// True for errors caused by the classifier's configuration or schema declaration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            KnnError::InvalidK { .. }
                | KnnError::InvalidEpsilon { .. }
                | KnnError::UnknownMetric(_)
                | KnnError::UnknownWeighting(_)
                | KnnError::MissingClassColumn { .. }
        )
    }

    /// True for errors caused by an instance that does not fit the schema.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(
            self,
            KnnError::ArityMismatch { .. }
                | KnnError::KindMismatch { .. }
                | KnnError::UnknownNominalValue { .. }
                | KnnError::NonFiniteValue { .. }
                | KnnError::MissingValue { .. }
        )
    }
}
