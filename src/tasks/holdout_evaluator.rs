use crate::classifiers::Classifier;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::error::KnnError;
use crate::evaluation::{ConfusionMatrix, EvaluationReport};
use crate::streams::{Stream, read_all};
use std::io::{Error, ErrorKind};

use cpu_time::ThreadTime;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

/// Trains a learner once on a training stream, then scores it on a separate test stream.
pub struct HoldoutEvaluator {
    learner: Box<dyn Classifier>,
    train: Box<dyn Stream>,
    test: Box<dyn Stream>,
    max_test_instances: Option<u64>,
}

impl HoldoutEvaluator {
    pub fn new(
        learner: Box<dyn Classifier>,
        train: Box<dyn Stream>,
        test: Box<dyn Stream>,
        max_test_instances: Option<u64>,
    ) -> Result<Self, Error> {
        let train_header = train.header();
        let test_header = test.header();
        ensure_same_schema(learner.header(), &train_header, "training")?;
        ensure_same_schema(learner.header(), &test_header, "test")?;

        Ok(Self {
            learner,
            train,
            test,
            max_test_instances,
        })
    }

    pub fn learner(&self) -> &dyn Classifier {
        self.learner.as_ref()
    }

    pub fn run(&mut self) -> Result<EvaluationReport, KnnError> {
        let relation = self.learner.header().relation_name().to_string();
        let class_index = self.learner.header().class_index();

        let train_start = ThreadTime::now();
        let training = read_all(self.train.as_mut());
        let train_instances = training.len() as u64;
        self.learner.train(training)?;
        let train_seconds = train_start.elapsed().as_secs_f64();
        info!(instances = train_instances, seconds = train_seconds, "training finished");

        let test_start = ThreadTime::now();
        let mut matrix = ConfusionMatrix::new();
        let mut test_instances = 0u64;
        let mut unpredicted = 0u64;

        while self.test.has_more_instances() {
            if let Some(n) = self.max_test_instances
                && test_instances >= n
            {
                break;
            }
            let Some(instance) = self.test.next_instance() else {
                break;
            };
            test_instances += 1;

            let votes = self.learner.get_votes_for_instance(&instance)?;
            let Some(predicted) = votes.winner() else {
                unpredicted += 1;
                continue;
            };

            match instance.class_value(class_index) {
                Some(actual) => matrix.add(actual, predicted),
                None => debug!(prediction = %predicted, "unlabelled test instance"),
            }
        }
        let test_seconds = test_start.elapsed().as_secs_f64();
        info!(
            instances = test_instances,
            scored = matrix.total(),
            seconds = test_seconds,
            "testing finished"
        );

        let mut report = EvaluationReport::from_matrix(
            &relation,
            train_instances,
            test_instances,
            &matrix,
            train_seconds,
            test_seconds,
        );
        if unpredicted > 0 {
            report = report.with_extra("unpredicted", unpredicted as f64);
        }
        Ok(report)
    }
}

fn ensure_same_schema(
    expected: &InstanceHeader,
    found: &InstanceHeader,
    which: &str,
) -> Result<(), Error> {
    if expected.kinds() != found.kinds() || expected.class_index() != found.class_index() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "{which} data '{}' does not match the learner's schema '{}'",
                found.relation_name(),
                expected.relation_name()
            ),
        ));
    }
    Ok(())
}

/// Shuffles `instances` with a seeded generator and splits off the first
/// `train_ratio` share for training. Both halves are non-empty.
pub fn split_instances(
    mut instances: Vec<Instance>,
    train_ratio: f64,
    seed: u64,
) -> Result<(Vec<Instance>, Vec<Instance>), Error> {
    if !(train_ratio > 0.0 && train_ratio < 1.0) {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("train ratio must be in (0, 1), got {train_ratio}"),
        ));
    }
    if instances.len() < 2 {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "need at least two instances to split",
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    instances.shuffle(&mut rng);

    let n = instances.len();
    let n_train = ((n as f64) * train_ratio).round() as usize;
    let n_train = n_train.clamp(1, n - 1);
    let test = instances.split_off(n_train);
    Ok((instances, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::lazy::{KNearestNeighbors, KnnConfig};
    use crate::core::attributes::{AttributeRef, NumericAttribute};
    use crate::core::instance_header::header_ref;
    use crate::core::instances::AttributeValue;
    use crate::streams::MemoryStream;
    use crate::testing::{
        ClassifierNoneVotes, OracleClassifier, TrainSpyClassifier, alternating_instances,
        binary_header,
    };
    use std::sync::Arc;

    fn memory(instances: Vec<Instance>) -> Box<dyn Stream> {
        Box::new(MemoryStream::new(binary_header(), instances))
    }

    #[test]
    fn ctor_rejects_mismatched_schema() {
        let other = header_ref(
            "other",
            vec![
                Arc::new(NumericAttribute::new("a".into())) as AttributeRef,
                Arc::new(NumericAttribute::new("b".into())) as AttributeRef,
            ],
            1,
        );
        let l: Box<dyn Classifier> = Box::new(OracleClassifier::new(binary_header()));
        let test: Box<dyn Stream> = Box::new(MemoryStream::new(other, vec![]));

        let err = HoldoutEvaluator::new(l, memory(alternating_instances(4)), test, None)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn oracle_scores_perfectly() {
        let l: Box<dyn Classifier> = Box::new(OracleClassifier::new(binary_header()));
        let mut h = HoldoutEvaluator::new(
            l,
            memory(alternating_instances(10)),
            memory(alternating_instances(20)),
            None,
        )
        .unwrap();

        let report = h.run().unwrap();
        assert_eq!(report.train_instances, 10);
        assert_eq!(report.test_instances, 20);
        assert_eq!(report.scored_instances, 20);
        assert_eq!(report.accuracy, 1.0);
        assert!(report.kappa > 0.99);
        assert!(report.train_seconds >= 0.0 && report.test_seconds >= 0.0);
    }

    #[test]
    fn stops_at_max_test_instances() {
        let l: Box<dyn Classifier> = Box::new(OracleClassifier::new(binary_header()));
        let mut h = HoldoutEvaluator::new(
            l,
            memory(alternating_instances(4)),
            memory(alternating_instances(50)),
            Some(7),
        )
        .unwrap();

        let report = h.run().unwrap();
        assert_eq!(report.test_instances, 7);
        assert_eq!(report.scored_instances, 7);
    }

    #[test]
    fn no_votes_keeps_metrics_nan_and_zero() {
        let l: Box<dyn Classifier> = Box::new(ClassifierNoneVotes::new(binary_header()));
        let mut h = HoldoutEvaluator::new(
            l,
            memory(alternating_instances(4)),
            memory(alternating_instances(6)),
            None,
        )
        .unwrap();

        let report = h.run().unwrap();
        assert!(report.accuracy.is_nan());
        assert_eq!(report.kappa, 0.0);
        assert_eq!(report.extras.get("unpredicted"), Some(&6.0));
    }

    #[test]
    fn trains_once_on_whole_training_stream() {
        let (spy, handle) = TrainSpyClassifier::new(binary_header());
        let l: Box<dyn Classifier> = Box::new(spy);
        let mut h = HoldoutEvaluator::new(
            l,
            memory(alternating_instances(37)),
            memory(alternating_instances(3)),
            None,
        )
        .unwrap();

        h.run().unwrap();
        assert_eq!(handle.calls(), 1);
        assert_eq!(handle.last_training_size(), 37);
    }

    #[test]
    fn unlabelled_test_rows_are_predicted_but_not_scored() {
        let l: Box<dyn Classifier> = Box::new(
            KNearestNeighbors::new(binary_header(), KnnConfig::new(1)).unwrap(),
        );
        let test = vec![
            Instance::new(vec![0.0.into(), "yes".into()]),
            Instance::new(vec![1.0.into(), AttributeValue::Missing]),
        ];
        let mut h =
            HoldoutEvaluator::new(l, memory(alternating_instances(6)), memory(test), None).unwrap();

        let report = h.run().unwrap();
        assert_eq!(report.test_instances, 2);
        assert_eq!(report.scored_instances, 1);
        assert_eq!(report.correct, 1);
    }

    #[test]
    fn empty_training_stream_fails_run() {
        let l: Box<dyn Classifier> = Box::new(
            KNearestNeighbors::new(binary_header(), KnnConfig::new(3)).unwrap(),
        );
        let mut h = HoldoutEvaluator::new(
            l,
            memory(vec![]),
            memory(alternating_instances(3)),
            None,
        )
        .unwrap();

        assert_eq!(h.run().err(), Some(KnnError::EmptyTrainingSet));
        assert_eq!(
            h.learner().predict(&alternating_instances(1)[0]),
            Err(KnnError::Untrained)
        );
    }

    #[test]
    fn split_is_seeded_and_partitions() {
        let data = alternating_instances(10);
        let (train_a, test_a) = split_instances(data.clone(), 0.7, 42).unwrap();
        let (train_b, test_b) = split_instances(data.clone(), 0.7, 42).unwrap();

        assert_eq!(train_a.len(), 7);
        assert_eq!(test_a.len(), 3);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);

        let mut all: Vec<f64> = train_a
            .iter()
            .chain(test_a.iter())
            .filter_map(|i| i.value_at_index(0).and_then(|v| v.as_numeric()))
            .collect();
        all.sort_by(f64::total_cmp);
        assert_eq!(all, (0..10).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn split_keeps_both_sides_non_empty() {
        let (train, test) = split_instances(alternating_instances(3), 0.01, 1).unwrap();
        assert_eq!(train.len(), 1);
        assert_eq!(test.len(), 2);
    }

    #[test]
    fn split_rejects_bad_input() {
        let err = split_instances(alternating_instances(10), 1.0, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = split_instances(alternating_instances(10), f64::NAN, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = split_instances(alternating_instances(1), 0.5, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
