use crate::core::instances::{AttributeValue, Instance};
use crate::error::KnnError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Distance metric, fixed once per classifier.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Metric {
    /// Sum of absolute per-column differences.
    #[default]
    Manhattan,
    /// Square root of the summed squared per-column differences.
    Euclidean,
}

impl Metric {
    /// Parses a metric name, failing with [`KnnError::UnknownMetric`] instead of
    /// falling back to a default.
    pub fn parse(name: &str) -> Result<Metric, KnnError> {
        name.trim()
            .parse()
            .map_err(|_| KnnError::UnknownMetric(name.to_string()))
    }
}

/// Distance between `a` and `b`, skipping the class column.
///
/// Nominal columns contribute 0 when equal and 1 otherwise, under either metric.
/// Numeric columns contribute `|a - b|` (Manhattan) or `(a - b)^2` (Euclidean,
/// rooted once at the end). Inputs are expected to be normalised already when
/// normalisation is enabled.
pub fn distance(a: &Instance, b: &Instance, metric: Metric, class_index: usize) -> f64 {
    let mut acc = 0.0;
    for (index, (x, y)) in a.values().iter().zip(b.values()).enumerate() {
        if index == class_index {
            continue;
        }
        acc += match (x, y) {
            (AttributeValue::Numeric(x), AttributeValue::Numeric(y)) => {
                let d = x - y;
                match metric {
                    Metric::Manhattan => d.abs(),
                    Metric::Euclidean => d * d,
                }
            }
            _ if x == y => 0.0,
            _ => 1.0,
        };
    }

    match metric {
        Metric::Manhattan => acc,
        Metric::Euclidean => acc.sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn row(values: Vec<AttributeValue>) -> Instance {
        Instance::new(values)
    }

    #[test]
    fn identical_instances_are_at_zero() {
        let a = row(vec!["red".into(), 2.5.into(), (-1.0).into(), "yes".into()]);
        assert_eq!(distance(&a, &a, Metric::Manhattan, 3), 0.0);
        assert_eq!(distance(&a, &a, Metric::Euclidean, 3), 0.0);
    }

    #[test]
    fn both_metrics_are_symmetric() {
        let a = row(vec!["red".into(), 2.5.into(), 7.0.into(), "yes".into()]);
        let b = row(vec!["blue".into(), (-1.0).into(), 4.0.into(), "no".into()]);
        for metric in [Metric::Manhattan, Metric::Euclidean] {
            assert_abs_diff_eq!(
                distance(&a, &b, metric, 3),
                distance(&b, &a, metric, 3),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn mixed_columns_hand_computed() {
        // nominal mismatch (1) + |2.5 - (-1)| (3.5) + |7 - 4| (3)
        let a = row(vec!["red".into(), 2.5.into(), 7.0.into(), "yes".into()]);
        let b = row(vec!["blue".into(), (-1.0).into(), 4.0.into(), "no".into()]);
        assert_abs_diff_eq!(distance(&a, &b, Metric::Manhattan, 3), 7.5, epsilon = 1e-12);
        // sqrt(1 + 12.25 + 9)
        assert_abs_diff_eq!(
            distance(&a, &b, Metric::Euclidean, 3),
            22.25_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn class_column_never_contributes() {
        let a = row(vec![1.0.into(), "yes".into()]);
        let b = row(vec![1.0.into(), "no".into()]);
        assert_eq!(distance(&a, &b, Metric::Manhattan, 1), 0.0);

        let a = row(vec![100.0.into(), 1.0.into()]);
        let b = row(vec![100.0.into(), 9.0.into()]);
        assert_eq!(distance(&a, &b, Metric::Euclidean, 1), 0.0);
    }

    #[test]
    fn all_nominal_euclidean_is_root_of_manhattan() {
        let a = row(vec!["a".into(), "b".into(), "c".into(), "d".into(), "x".into()]);
        let b = row(vec!["a".into(), "z".into(), "z".into(), "z".into(), "y".into()]);
        let manhattan = distance(&a, &b, Metric::Manhattan, 4);
        let euclidean = distance(&a, &b, Metric::Euclidean, 4);
        assert_abs_diff_eq!(manhattan, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(euclidean, manhattan.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn class_column_in_the_middle_is_skipped() {
        let a = row(vec![0.0.into(), "yes".into(), 0.0.into()]);
        let b = row(vec![3.0.into(), "no".into(), 4.0.into()]);
        assert_abs_diff_eq!(distance(&a, &b, Metric::Euclidean, 1), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(distance(&a, &b, Metric::Manhattan, 1), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn parse_accepts_known_names_in_any_case() {
        assert_eq!(Metric::parse("manhattan"), Ok(Metric::Manhattan));
        assert_eq!(Metric::parse(" Euclidean "), Ok(Metric::Euclidean));
        assert_eq!(Metric::Euclidean.to_string(), "euclidean");
    }

    #[test]
    fn parse_rejects_unknown_metric() {
        assert_eq!(
            Metric::parse("chebyshev"),
            Err(KnnError::UnknownMetric("chebyshev".into()))
        );
    }
}
