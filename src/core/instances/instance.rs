use crate::core::instances::AttributeValue;

/// One data row: a value per schema column, label included at the class column.
///
/// Instances never change after construction; normalisation produces new ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    values: Vec<AttributeValue>,
}

impl Instance {
    pub fn new(values: Vec<AttributeValue>) -> Instance {
        Instance { values }
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    pub fn value_at_index(&self, index: usize) -> Option<&AttributeValue> {
        self.values.get(index)
    }

    pub fn number_of_attributes(&self) -> usize {
        self.values.len()
    }

    pub fn class_value(&self, class_index: usize) -> Option<&AttributeValue> {
        self.values
            .get(class_index)
            .filter(|value| !value.is_missing())
    }

    pub fn into_values(self) -> Vec<AttributeValue> {
        self.values
    }
}

impl FromIterator<AttributeValue> for Instance {
    fn from_iter<I: IntoIterator<Item = AttributeValue>>(iter: I) -> Self {
        Instance::new(iter.into_iter().collect())
    }
}
