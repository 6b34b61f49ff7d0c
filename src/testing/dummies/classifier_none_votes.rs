use crate::classifiers::Classifier;
use crate::classifiers::lazy::VoteTally;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::error::KnnError;
use std::sync::Arc;

/// Accepts any training set and never casts a vote.
pub struct ClassifierNoneVotes {
    header: Arc<InstanceHeader>,
}

impl ClassifierNoneVotes {
    pub fn new(header: Arc<InstanceHeader>) -> Self {
        Self { header }
    }
}

impl Classifier for ClassifierNoneVotes {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn train(&mut self, _instances: Vec<Instance>) -> Result<(), KnnError> {
        Ok(())
    }

    fn get_votes_for_instance(&self, _instance: &Instance) -> Result<VoteTally, KnnError> {
        Ok(VoteTally::new())
    }
}
