use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::streams::Stream;
use std::io::Error;
use std::sync::Arc;

/// Replays an in-memory list of instances under a fixed header.
#[derive(Debug)]
pub struct MemoryStream {
    header: Arc<InstanceHeader>,
    instances: Vec<Instance>,
    position: usize,
}

impl MemoryStream {
    pub fn new(header: Arc<InstanceHeader>, instances: Vec<Instance>) -> Self {
        Self {
            header,
            instances,
            position: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Stream for MemoryStream {
    fn header(&self) -> Arc<InstanceHeader> {
        Arc::clone(&self.header)
    }

    fn has_more_instances(&self) -> bool {
        self.position < self.instances.len()
    }

    fn next_instance(&mut self) -> Option<Instance> {
        let instance = self.instances.get(self.position)?.clone();
        self.position += 1;
        Some(instance)
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.position = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::{AttributeRef, NumericAttribute};
    use crate::core::instance_header::header_ref;
    use crate::streams::read_all;

    fn stream_of(n: usize) -> MemoryStream {
        let header = header_ref(
            "mem",
            vec![
                Arc::new(NumericAttribute::new("x".into())) as AttributeRef,
                Arc::new(NumericAttribute::new("y".into())) as AttributeRef,
            ],
            1,
        );
        let rows = (0..n)
            .map(|i| Instance::new(vec![(i as f64).into(), 0.0.into()]))
            .collect();
        MemoryStream::new(header, rows)
    }

    #[test]
    fn replays_in_order_and_restarts() {
        let mut s = stream_of(3);
        assert_eq!(s.len(), 3);
        let first = read_all(&mut s);
        assert_eq!(first.len(), 3);
        assert_eq!(first[2].value_at_index(0).and_then(|v| v.as_numeric()), Some(2.0));
        assert!(!s.has_more_instances());
        assert!(s.next_instance().is_none());

        s.restart().unwrap();
        assert_eq!(read_all(&mut s), first);
    }

    #[test]
    fn empty_stream_has_nothing() {
        let mut s = stream_of(0);
        assert!(s.is_empty());
        assert!(!s.has_more_instances());
        assert!(s.next_instance().is_none());
    }
}
