mod attribute_value;
mod instance;

pub use attribute_value::AttributeValue;
pub use instance::Instance;
