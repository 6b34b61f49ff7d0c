mod attribute;
mod nominal_attribute;
mod numeric_attribute;

pub use attribute::{Attribute, AttributeKind, AttributeRef};
pub use nominal_attribute::NominalAttribute;
pub use numeric_attribute::NumericAttribute;
