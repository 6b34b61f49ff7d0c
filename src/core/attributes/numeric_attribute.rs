use crate::core::attributes::{Attribute, AttributeKind};

#[derive(Debug, Clone)]
pub struct NumericAttribute {
    pub name: String,
}

impl NumericAttribute {
    pub fn new(name: String) -> NumericAttribute {
        NumericAttribute { name }
    }
}

impl Attribute for NumericAttribute {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> AttributeKind {
        AttributeKind::Numeric
    }

    fn arff_representation(&self) -> String {
        format!("@attribute {} numeric", self.name)
    }
}
