use crate::core::attributes::AttributeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell of an instance, tagged once by its column's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Numeric(f64),
    Nominal(String),
    /// Unknown value, written `?` in ARFF. Only legal as the label of a query.
    Missing,
}

impl AttributeValue {
    pub fn nominal(token: impl Into<String>) -> AttributeValue {
        AttributeValue::Nominal(token.into())
    }

    /// Kind of the carried value, `None` when missing.
    pub fn kind(&self) -> Option<AttributeKind> {
        match self {
            AttributeValue::Numeric(_) => Some(AttributeKind::Numeric),
            AttributeValue::Nominal(_) => Some(AttributeKind::Nominal),
            AttributeValue::Missing => None,
        }
    }

    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            AttributeValue::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_nominal(&self) -> Option<&str> {
        match self {
            AttributeValue::Nominal(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, AttributeValue::Missing)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Numeric(v) => write!(f, "{v}"),
            AttributeValue::Nominal(s) => f.write_str(s),
            AttributeValue::Missing => f.write_str("?"),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Numeric(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Nominal(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_variant() {
        assert_eq!(
            AttributeValue::Numeric(1.5).kind(),
            Some(AttributeKind::Numeric)
        );
        assert_eq!(
            AttributeValue::nominal("red").kind(),
            Some(AttributeKind::Nominal)
        );
        assert_eq!(AttributeValue::Missing.kind(), None);
    }

    #[test]
    fn display_matches_arff_tokens() {
        assert_eq!(AttributeValue::Numeric(85.0).to_string(), "85");
        assert_eq!(AttributeValue::nominal("sunny").to_string(), "sunny");
        assert_eq!(AttributeValue::Missing.to_string(), "?");
    }

    #[test]
    fn accessors_reject_other_variants() {
        assert_eq!(AttributeValue::from(2.0).as_nominal(), None);
        assert_eq!(AttributeValue::from("x").as_numeric(), None);
        assert_eq!(AttributeValue::from("x").as_nominal(), Some("x"));
    }
}
