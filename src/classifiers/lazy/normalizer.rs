use crate::core::attributes::AttributeKind;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{AttributeValue, Instance};
use crate::error::KnnError;
use std::borrow::Cow;

/// Scale used for a column whose training values are all identical.
///
/// Every value of such a column maps onto the same point, so the column never
/// separates two instances after normalisation. This departs from the variant
/// that divides by a huge finite range (`f64::MAX`): that one only makes values
/// nearly equal, while a zero scale makes them exactly equal, query values
/// outside the training range included.
pub const DEGENERATE_SCALE: f64 = 0.0;

/// `normalized = (raw + offset) * scale` for one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnScaling {
    pub scale: f64,
    pub offset: f64,
}

impl ColumnScaling {
    #[inline]
    pub fn apply(&self, raw: f64) -> f64 {
        (raw + self.offset) * self.scale
    }

    pub fn is_degenerate(&self) -> bool {
        self.scale == DEGENERATE_SCALE
    }
}

/// Per-column scaling fitted once per training set.
///
/// Nominal columns and the class column carry no scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationParameters {
    columns: Vec<Option<ColumnScaling>>,
}

impl NormalizationParameters {
    /// Computes `scale = 1 / (max - min)` and `offset = -min` for every numeric,
    /// non-class column of `training`.
    pub fn fit(header: &InstanceHeader, training: &[Instance]) -> Result<Self, KnnError> {
        if training.is_empty() {
            return Err(KnnError::EmptyTrainingSet);
        }

        let class_index = header.class_index();
        let mut bounds: Vec<Option<(f64, f64)>> = vec![None; header.number_of_attributes()];

        for instance in training {
            for (index, value) in instance.values().iter().enumerate() {
                if index == class_index || header.attribute_kind(index) != Some(AttributeKind::Numeric) {
                    continue;
                }
                let AttributeValue::Numeric(v) = *value else {
                    continue;
                };
                let slot = &mut bounds[index];
                *slot = match *slot {
                    None => Some((v, v)),
                    Some((min, max)) => Some((min.min(v), max.max(v))),
                };
            }
        }

        let columns = bounds
            .into_iter()
            .map(|b| {
                b.map(|(min, max)| {
                    let range = max - min;
                    ColumnScaling {
                        scale: if range == 0.0 {
                            DEGENERATE_SCALE
                        } else {
                            1.0 / range
                        },
                        offset: -min,
                    }
                })
            })
            .collect();

        Ok(NormalizationParameters { columns })
    }

    pub fn column(&self, index: usize) -> Option<ColumnScaling> {
        self.columns.get(index).copied().flatten()
    }

    pub fn number_of_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns a rescaled copy of `instance`; nominal and class values are copied as is.
    pub fn apply(&self, instance: &Instance) -> Instance {
        instance
            .values()
            .iter()
            .enumerate()
            .map(|(index, value)| match (value, self.column(index)) {
                (AttributeValue::Numeric(v), Some(scaling)) => {
                    AttributeValue::Numeric(scaling.apply(*v))
                }
                _ => value.clone(),
            })
            .collect()
    }
}

/// Normalises `instance` under `params`, or borrows it untouched when
/// normalisation is disabled.
pub fn normalize<'a>(
    instance: &'a Instance,
    params: Option<&NormalizationParameters>,
) -> Cow<'a, Instance> {
    match params {
        Some(params) => Cow::Owned(params.apply(instance)),
        None => Cow::Borrowed(instance),
    }
}
