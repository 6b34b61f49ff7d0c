use crate::core::attributes::{Attribute, AttributeKind, AttributeRef, NominalAttribute};
use crate::core::instances::{AttributeValue, Instance};
use crate::error::KnnError;
use std::fmt;
use std::sync::Arc;

/// What an instance is being checked for: stored training rows must carry a label,
/// queries may leave it missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceRole {
    Training,
    Query,
}

pub struct InstanceHeader {
    relation_name: String,
    pub attributes: Vec<AttributeRef>,
    class_index: usize,
}

impl InstanceHeader {
    pub fn new(
        relation_name: String,
        attributes: Vec<AttributeRef>,
        class_index: usize,
    ) -> InstanceHeader {
        InstanceHeader {
            relation_name,
            attributes,
            class_index,
        }
    }

    pub fn class_attribute(&self) -> Option<&dyn Attribute> {
        self.attribute_at_index(self.class_index)
    }

    pub fn number_of_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn attribute_at_index(&self, index: usize) -> Option<&dyn Attribute> {
        self.attributes.get(index).map(|a| a.as_ref() as &dyn Attribute)
    }

    pub fn attribute_kind(&self, index: usize) -> Option<AttributeKind> {
        self.attributes.get(index).map(|a| a.kind())
    }

    /// Column kinds in schema order.
    pub fn kinds(&self) -> Vec<AttributeKind> {
        self.attributes.iter().map(|a| a.kind()).collect()
    }

    pub fn index_of_attribute(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|attr| attr.name() == name)
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    /// Fails when the class index does not name a column.
    pub fn validate(&self) -> Result<(), KnnError> {
        if self.class_index >= self.attributes.len() {
            return Err(KnnError::MissingClassColumn {
                class_index: self.class_index,
                n_attributes: self.attributes.len(),
            });
        }
        Ok(())
    }

    /// Checks that `instance` has one value per column, each of the declared kind.
    ///
    /// Numeric values must be finite and nominal values must belong to their
    /// column's domain when the column declares one. A missing value is only
    /// accepted at the class column of a query.
    pub fn check_instance(&self, instance: &Instance, role: InstanceRole) -> Result<(), KnnError> {
        if instance.number_of_attributes() != self.attributes.len() {
            return Err(KnnError::ArityMismatch {
                expected: self.attributes.len(),
                found: instance.number_of_attributes(),
            });
        }

        for (index, (attr, value)) in self.attributes.iter().zip(instance.values()).enumerate() {
            let expected = attr.kind();
            match value {
                AttributeValue::Missing => {
                    if index == self.class_index && role == InstanceRole::Query {
                        continue;
                    }
                    return Err(KnnError::MissingValue { index });
                }
                AttributeValue::Numeric(v) => {
                    if expected != AttributeKind::Numeric {
                        return Err(KnnError::KindMismatch {
                            index,
                            expected,
                            found: AttributeKind::Numeric,
                        });
                    }
                    if !v.is_finite() {
                        return Err(KnnError::NonFiniteValue { index });
                    }
                }
                AttributeValue::Nominal(token) => {
                    if expected != AttributeKind::Nominal {
                        return Err(KnnError::KindMismatch {
                            index,
                            expected,
                            found: AttributeKind::Nominal,
                        });
                    }
                    if let Some(domain) = self.nominal_domain(index)
                        && !domain.values.is_empty()
                        && !domain.contains(token)
                    {
                        return Err(KnnError::UnknownNominalValue {
                            index,
                            value: token.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn nominal_domain(&self, index: usize) -> Option<&NominalAttribute> {
        self.attributes
            .get(index)
            .and_then(|a| a.as_nominal())
    }

    pub fn number_of_classes(&self) -> usize {
        self.nominal_domain(self.class_index)
            .map(|nominal| nominal.values.len())
            .unwrap_or(0)
    }
}

impl fmt::Debug for InstanceHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceHeader")
            .field("relation_name", &self.relation_name)
            .field("class_index", &self.class_index)
            .field("n_attributes", &self.attributes.len())
            .finish()
    }
}

/// Shorthand used by tests and the ARFF reader to assemble a schema.
pub fn header_ref(
    relation_name: &str,
    attributes: Vec<AttributeRef>,
    class_index: usize,
) -> Arc<InstanceHeader> {
    Arc::new(InstanceHeader::new(
        relation_name.to_string(),
        attributes,
        class_index,
    ))
}
