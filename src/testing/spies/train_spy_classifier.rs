use crate::classifiers::Classifier;
use crate::classifiers::lazy::VoteTally;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::error::KnnError;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub struct TrainSpyHandle {
    calls: Arc<AtomicU64>,
    instances: Arc<AtomicU64>,
}

impl TrainSpyHandle {
    /// Number of `train` calls.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Instances received by the most recent `train` call.
    pub fn last_training_size(&self) -> u64 {
        self.instances.load(Ordering::Relaxed)
    }
}

/// Records what it is trained on and votes like an oracle.
pub struct TrainSpyClassifier {
    header: Arc<InstanceHeader>,
    calls: Arc<AtomicU64>,
    instances: Arc<AtomicU64>,
}

impl TrainSpyClassifier {
    pub fn new(header: Arc<InstanceHeader>) -> (Self, TrainSpyHandle) {
        let calls = Arc::new(AtomicU64::new(0));
        let instances = Arc::new(AtomicU64::new(0));
        (
            Self {
                header,
                calls: Arc::clone(&calls),
                instances: Arc::clone(&instances),
            },
            TrainSpyHandle { calls, instances },
        )
    }
}

impl Classifier for TrainSpyClassifier {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn train(&mut self, instances: Vec<Instance>) -> Result<(), KnnError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.instances
            .store(instances.len() as u64, Ordering::Relaxed);
        Ok(())
    }

    fn get_votes_for_instance(&self, inst: &Instance) -> Result<VoteTally, KnnError> {
        let mut votes = VoteTally::new();
        if let Some(label) = inst.class_value(self.header.class_index()) {
            votes.add(label, 1.0);
        }
        Ok(votes)
    }
}
