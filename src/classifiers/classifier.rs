use crate::classifiers::lazy::VoteTally;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{AttributeValue, Instance};
use crate::error::KnnError;

pub trait Classifier {
    fn header(&self) -> &InstanceHeader;

    /// Replaces whatever the classifier learned before with `instances`.
    fn train(&mut self, instances: Vec<Instance>) -> Result<(), KnnError>;

    fn get_votes_for_instance(&self, instance: &Instance) -> Result<VoteTally, KnnError>;

    fn predict(&self, instance: &Instance) -> Result<AttributeValue, KnnError> {
        let votes = self.get_votes_for_instance(instance)?;
        votes.winner().cloned().ok_or(KnnError::EmptyTrainingSet)
    }
}
