use crate::classifiers::lazy::distance::Metric;
use crate::classifiers::lazy::vote::{DEFAULT_EPSILON, Weighting};
use crate::error::KnnError;

/// Classifier settings, fixed for the lifetime of a classifier.
///
/// # Example
///
/// ```
/// use kenn::classifiers::lazy::{KnnConfig, Metric, Weighting};
///
/// let config = KnnConfig::new(5)
///     .with_metric(Metric::Euclidean)
///     .with_weighting(Weighting::InverseDistance)
///     .with_normalize(true);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KnnConfig {
    k: usize,
    metric: Metric,
    weighting: Weighting,
    normalize: bool,
    epsilon: f64,
}

impl KnnConfig {
    /// Defaults: Manhattan metric, uniform votes, no normalisation, `epsilon = 1e-3`.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            metric: Metric::Manhattan,
            weighting: Weighting::Uniform,
            normalize: false,
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns an error if k < 1 or epsilon is non-finite / non-positive.
    pub fn validate(&self) -> Result<(), KnnError> {
        if self.k < 1 {
            return Err(KnnError::InvalidK { k: self.k as i64 });
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(KnnError::InvalidEpsilon {
                epsilon: self.epsilon,
            });
        }
        Ok(())
    }
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self::new(1)
    }
}
