use crate::classifiers::Classifier;
use crate::classifiers::lazy::VoteTally;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::error::KnnError;
use std::sync::Arc;

/// Votes for the label the instance already carries.
pub struct OracleClassifier {
    header: Arc<InstanceHeader>,
}

impl OracleClassifier {
    pub fn new(header: Arc<InstanceHeader>) -> Self {
        Self { header }
    }
}

impl Classifier for OracleClassifier {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn train(&mut self, _instances: Vec<Instance>) -> Result<(), KnnError> {
        Ok(())
    }

    fn get_votes_for_instance(&self, instance: &Instance) -> Result<VoteTally, KnnError> {
        let mut votes = VoteTally::new();
        if let Some(label) = instance.class_value(self.header.class_index()) {
            votes.add(label, 1.0);
        }
        Ok(votes)
    }
}
