use super::NominalAttribute;
use std::fmt;
use std::sync::Arc;

pub type AttributeRef = Arc<dyn Attribute + Send + Sync>;

/// How a column is compared: by equality (nominal) or by magnitude (numeric).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Numeric,
    Nominal,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Numeric => f.write_str("numeric"),
            AttributeKind::Nominal => f.write_str("nominal"),
        }
    }
}

pub trait Attribute: Send + Sync {
    fn name(&self) -> String;

    fn kind(&self) -> AttributeKind;

    fn arff_representation(&self) -> String;

    fn as_nominal(&self) -> Option<&NominalAttribute> {
        None
    }
}
