use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::io::Error;
use std::sync::Arc;

pub trait Stream {
    fn header(&self) -> Arc<InstanceHeader>;

    fn has_more_instances(&self) -> bool;

    fn next_instance(&mut self) -> Option<Instance>;

    fn restart(&mut self) -> Result<(), Error>;
}

/// Drains `stream` into memory, in stream order.
pub fn read_all(stream: &mut dyn Stream) -> Vec<Instance> {
    let mut instances = Vec::new();
    while stream.has_more_instances() {
        match stream.next_instance() {
            Some(instance) => instances.push(instance),
            None => break,
        }
    }
    instances
}
