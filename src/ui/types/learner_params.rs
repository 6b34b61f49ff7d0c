use crate::classifiers::lazy::{DEFAULT_EPSILON, KnnConfig, Metric, Weighting};
use crate::error::KnnError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_k() -> i64 {
    1
}

fn default_metric() -> String {
    Metric::default().to_string()
}

fn default_weighting() -> String {
    Weighting::default().to_string()
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

/// Learner parameters as accepted on the command line.
///
/// Kept loosely typed so that bad values reach [`KnnParams::into_config`] and
/// fail there with the classifier's own configuration errors.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KnnParams {
    #[serde(default = "default_k")]
    #[schemars(
        title = "Neighbours",
        description = "Number of nearest neighbours consulted (k >= 1)",
        range(min = 1)
    )]
    pub k: i64,

    #[serde(default = "default_metric")]
    #[schemars(
        title = "Metric",
        description = "Distance metric",
        extend("enum" = ["manhattan", "euclidean"])
    )]
    pub metric: String,

    #[serde(default = "default_weighting")]
    #[schemars(
        title = "Weighting",
        description = "How neighbours vote",
        extend("enum" = ["uniform", "inverse-distance"])
    )]
    pub weighting: String,

    #[serde(default)]
    #[schemars(
        title = "Normalize",
        description = "Min-max scale numeric attributes to the training set's range"
    )]
    pub normalize: bool,

    #[serde(default = "default_epsilon")]
    #[schemars(
        title = "Epsilon",
        description = "Added to distances before inverting them for inverse-distance votes (> 0)"
    )]
    pub epsilon: f64,
}

impl Default for KnnParams {
    fn default() -> Self {
        Self {
            k: default_k(),
            metric: default_metric(),
            weighting: default_weighting(),
            normalize: false,
            epsilon: default_epsilon(),
        }
    }
}

impl KnnParams {
    /// Defaults as a JSON object, the base that CLI overrides are applied onto.
    pub fn default_value() -> Value {
        serde_json::to_value(Self::default()).unwrap_or(Value::Null)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn into_config(self) -> Result<KnnConfig, KnnError> {
        if self.k < 1 {
            return Err(KnnError::InvalidK { k: self.k });
        }
        let k = usize::try_from(self.k).map_err(|_| KnnError::InvalidK { k: self.k })?;

        let config = KnnConfig::new(k)
            .with_metric(Metric::parse(&self.metric)?)
            .with_weighting(Weighting::parse(&self.weighting)?)
            .with_normalize(self.normalize)
            .with_epsilon(self.epsilon);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_convert_to_default_config() {
        let cfg = KnnParams::default().into_config().unwrap();
        assert_eq!(cfg, KnnConfig::default());
    }

    #[test]
    fn default_value_is_flat_object() {
        let v = KnnParams::default_value();
        assert_eq!(v["k"], 1);
        assert_eq!(v["metric"], "manhattan");
        assert_eq!(v["weighting"], "uniform");
        assert_eq!(v["normalize"], false);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let p = KnnParams::from_value(json!({"k": 5, "metric": "Euclidean"})).unwrap();
        assert_eq!(p.k, 5);
        assert!(!p.normalize);
        let cfg = p.into_config().unwrap();
        assert_eq!(cfg.k(), 5);
        assert_eq!(cfg.metric(), Metric::Euclidean);
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(KnnParams::from_value(json!({"neighbours": 3})).is_err());
    }

    #[test]
    fn non_positive_k_is_invalid() {
        for k in [0, -4] {
            let p = KnnParams {
                k,
                ..KnnParams::default()
            };
            assert_eq!(p.into_config(), Err(KnnError::InvalidK { k }));
        }
    }

    #[test]
    fn unknown_names_are_configuration_errors() {
        let p = KnnParams {
            metric: "chebyshev".into(),
            ..KnnParams::default()
        };
        assert_eq!(
            p.into_config(),
            Err(KnnError::UnknownMetric("chebyshev".into()))
        );

        let p = KnnParams {
            weighting: "quadratic".into(),
            ..KnnParams::default()
        };
        let err = p.into_config().unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn zero_epsilon_is_invalid() {
        let p = KnnParams {
            epsilon: 0.0,
            weighting: "inverse-distance".into(),
            ..KnnParams::default()
        };
        assert_eq!(
            p.into_config(),
            Err(KnnError::InvalidEpsilon { epsilon: 0.0 })
        );
    }
}
