use crate::classifiers::Classifier;
use crate::classifiers::lazy::config::KnnConfig;
use crate::classifiers::lazy::neighbor_selector::{NeighborCandidate, select};
use crate::classifiers::lazy::normalizer::{NormalizationParameters, normalize};
use crate::classifiers::lazy::vote::{VoteTally, tally};
use crate::core::instance_header::{InstanceHeader, InstanceRole};
use crate::core::instances::Instance;
use crate::error::KnnError;
use std::sync::Arc;
use tracing::{debug, trace};

enum ModelState {
    Untrained,
    Trained(TrainedModel),
}

/// Everything fixed by one `train` call. Stored instances are already normalised
/// when normalisation is enabled.
struct TrainedModel {
    instances: Vec<Instance>,
    normalization: Option<NormalizationParameters>,
}

/// Instance-based classifier: memorises the training set and labels a query by
/// a vote among its nearest stored instances.
///
/// Prediction only reads the trained model, so a trained classifier can be
/// shared between threads. Retraining needs exclusive access.
pub struct KNearestNeighbors {
    header: Arc<InstanceHeader>,
    config: KnnConfig,
    state: ModelState,
}

impl KNearestNeighbors {
    pub fn new(header: Arc<InstanceHeader>, config: KnnConfig) -> Result<Self, KnnError> {
        config.validate()?;
        header.validate()?;
        Ok(Self {
            header,
            config,
            state: ModelState::Untrained,
        })
    }

    pub fn config(&self) -> &KnnConfig {
        &self.config
    }

    pub fn is_trained(&self) -> bool {
        matches!(self.state, ModelState::Trained(_))
    }

    pub fn training_set_size(&self) -> Option<usize> {
        self.model().ok().map(|m| m.instances.len())
    }

    pub fn normalization(&self) -> Option<&NormalizationParameters> {
        self.model().ok().and_then(|m| m.normalization.as_ref())
    }

    /// Neighbours of `query`, nearest first; may exceed k when the boundary is tied.
    pub fn nearest_neighbors(&self, query: &Instance) -> Result<Vec<NeighborCandidate<'_>>, KnnError> {
        let model = self.model()?;
        self.header.check_instance(query, InstanceRole::Query)?;

        let query = normalize(query, model.normalization.as_ref());
        select(
            &query,
            &model.instances,
            self.config.k(),
            self.config.metric(),
            self.header.class_index(),
        )
    }

    fn model(&self) -> Result<&TrainedModel, KnnError> {
        match &self.state {
            ModelState::Trained(model) => Ok(model),
            ModelState::Untrained => Err(KnnError::Untrained),
        }
    }
}

impl Classifier for KNearestNeighbors {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn train(&mut self, instances: Vec<Instance>) -> Result<(), KnnError> {
        if instances.is_empty() {
            return Err(KnnError::EmptyTrainingSet);
        }
        for instance in &instances {
            self.header.check_instance(instance, InstanceRole::Training)?;
        }

        let (instances, normalization) = if self.config.normalize() {
            let params = NormalizationParameters::fit(&self.header, &instances)?;
            let normalized = instances.iter().map(|i| params.apply(i)).collect();
            (normalized, Some(params))
        } else {
            (instances, None)
        };

        debug!(
            instances = instances.len(),
            normalized = normalization.is_some(),
            k = self.config.k(),
            metric = %self.config.metric(),
            weighting = %self.config.weighting(),
            "stored training set"
        );

        self.state = ModelState::Trained(TrainedModel {
            instances,
            normalization,
        });
        Ok(())
    }

    fn get_votes_for_instance(&self, instance: &Instance) -> Result<VoteTally, KnnError> {
        let neighbors = self.nearest_neighbors(instance)?;
        trace!(
            neighbors = neighbors.len(),
            k = self.config.k(),
            "selected neighbours"
        );
        Ok(tally(
            &neighbors,
            self.config.weighting(),
            self.header.class_index(),
            self.config.epsilon(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::lazy::{Metric, Weighting};
    use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
    use crate::core::instance_header::header_ref;
    use crate::core::instances::AttributeValue;
    use approx::assert_abs_diff_eq;

    fn fruit_header() -> Arc<InstanceHeader> {
        header_ref(
            "fruit",
            vec![
                Arc::new(NumericAttribute::new("weight".into())) as AttributeRef,
                Arc::new(NumericAttribute::new("diameter".into())) as AttributeRef,
                Arc::new(NominalAttribute::with_values(
                    "colour".into(),
                    vec!["red".into(), "green".into(), "yellow".into()],
                )) as AttributeRef,
                Arc::new(NominalAttribute::with_values(
                    "kind".into(),
                    vec!["apple".into(), "lemon".into()],
                )) as AttributeRef,
            ],
            3,
        )
    }

    fn fruit(weight: f64, diameter: f64, colour: &str, kind: &str) -> Instance {
        Instance::new(vec![weight.into(), diameter.into(), colour.into(), kind.into()])
    }

    fn query(weight: f64, diameter: f64, colour: &str) -> Instance {
        Instance::new(vec![
            weight.into(),
            diameter.into(),
            colour.into(),
            AttributeValue::Missing,
        ])
    }

    fn fruits() -> Vec<Instance> {
        vec![
            fruit(150.0, 7.0, "red", "apple"),
            fruit(170.0, 7.5, "green", "apple"),
            fruit(160.0, 7.2, "red", "apple"),
            fruit(110.0, 5.5, "yellow", "lemon"),
            fruit(100.0, 5.0, "yellow", "lemon"),
            fruit(120.0, 5.8, "green", "lemon"),
        ]
    }

    fn trained(config: KnnConfig) -> KNearestNeighbors {
        let mut knn = KNearestNeighbors::new(fruit_header(), config).unwrap();
        knn.train(fruits()).unwrap();
        knn
    }

    #[test]
    fn new_rejects_bad_configuration() {
        assert!(matches!(
            KNearestNeighbors::new(fruit_header(), KnnConfig::new(0)),
            Err(KnnError::InvalidK { k: 0 })
        ));

        let header = header_ref(
            "r",
            vec![Arc::new(NumericAttribute::new("x".into())) as AttributeRef],
            3,
        );
        assert!(matches!(
            KNearestNeighbors::new(header, KnnConfig::new(1)),
            Err(KnnError::MissingClassColumn { .. })
        ));
    }

    #[test]
    fn predict_before_train_is_an_error() {
        let knn = KNearestNeighbors::new(fruit_header(), KnnConfig::new(3)).unwrap();
        assert!(!knn.is_trained());
        assert_eq!(
            knn.predict(&query(150.0, 7.0, "red")),
            Err(KnnError::Untrained)
        );
    }

    #[test]
    fn train_rejects_empty_and_mismatched_sets() {
        let mut knn = KNearestNeighbors::new(fruit_header(), KnnConfig::new(3)).unwrap();
        assert_eq!(knn.train(Vec::new()), Err(KnnError::EmptyTrainingSet));

        let mut data = fruits();
        data.push(Instance::new(vec![1.0.into(), "red".into()]));
        assert!(knn.train(data).unwrap_err().is_schema_mismatch());
        assert!(!knn.is_trained());
    }

    #[test]
    fn failed_retrain_keeps_previous_model() {
        let mut knn = trained(KnnConfig::new(1));
        let bad = vec![fruit(1.0, 1.0, "purple", "apple")];
        assert!(knn.train(bad).is_err());
        assert_eq!(knn.training_set_size(), Some(6));
    }

    #[test]
    fn predicts_majority_of_neighbours() {
        let knn = trained(KnnConfig::new(3));
        assert_eq!(
            knn.predict(&query(155.0, 7.1, "red")).unwrap(),
            AttributeValue::nominal("apple")
        );
        assert_eq!(
            knn.predict(&query(105.0, 5.2, "yellow")).unwrap(),
            AttributeValue::nominal("lemon")
        );
    }

    #[test]
    fn predict_rejects_query_with_wrong_schema() {
        let knn = trained(KnnConfig::new(3));
        let bad = Instance::new(vec!["heavy".into(), 7.0.into(), "red".into(), AttributeValue::Missing]);
        assert!(matches!(
            knn.predict(&bad),
            Err(KnnError::KindMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn training_instance_is_its_own_nearest_neighbour() {
        let knn = trained(KnnConfig::new(1).with_metric(Metric::Euclidean));
        let data = fruits();
        for (position, instance) in data.iter().enumerate() {
            let neighbors = knn.nearest_neighbors(instance).unwrap();
            assert_eq!(neighbors.len(), 1);
            assert_eq!(neighbors[0].position, position);
            assert_eq!(neighbors[0].distance, 0.0);
            assert_eq!(knn.predict(instance).unwrap(), *instance.value_at_index(3).unwrap());
        }
    }

    #[test]
    fn normalisation_stops_one_column_dominating() {
        // Weight differences dwarf diameter differences unless rescaled.
        let header = header_ref(
            "r",
            vec![
                Arc::new(NumericAttribute::new("weight".into())) as AttributeRef,
                Arc::new(NumericAttribute::new("diameter".into())) as AttributeRef,
                Arc::new(NominalAttribute::with_values(
                    "kind".into(),
                    vec!["a".into(), "b".into()],
                )) as AttributeRef,
            ],
            2,
        );
        let data = vec![
            Instance::new(vec![100.0.into(), 0.0.into(), "a".into()]),
            Instance::new(vec![140.0.into(), 10.0.into(), "b".into()]),
            Instance::new(vec![0.0.into(), 5.0.into(), "b".into()]),
        ];
        let q = Instance::new(vec![130.0.into(), 1.0.into(), AttributeValue::Missing]);

        let mut raw = KNearestNeighbors::new(Arc::clone(&header), KnnConfig::new(1)).unwrap();
        raw.train(data.clone()).unwrap();
        assert_eq!(raw.predict(&q).unwrap(), AttributeValue::nominal("b"));

        let mut scaled =
            KNearestNeighbors::new(header, KnnConfig::new(1).with_normalize(true)).unwrap();
        scaled.train(data).unwrap();
        assert!(scaled.normalization().is_some());
        assert_eq!(scaled.predict(&q).unwrap(), AttributeValue::nominal("a"));
    }

    #[test]
    fn normalisation_is_skipped_when_disabled() {
        let knn = trained(KnnConfig::new(1));
        assert!(knn.normalization().is_none());
    }

    #[test]
    fn inverse_distance_overrides_raw_majority() {
        let header = header_ref(
            "r",
            vec![
                Arc::new(NumericAttribute::new("x".into())) as AttributeRef,
                Arc::new(NominalAttribute::with_values(
                    "y".into(),
                    vec!["near".into(), "far".into()],
                )) as AttributeRef,
            ],
            1,
        );
        let data = vec![
            Instance::new(vec![0.1.into(), "near".into()]),
            Instance::new(vec![1.0.into(), "far".into()]),
            Instance::new(vec![1.1.into(), "far".into()]),
        ];
        let q = Instance::new(vec![0.0.into(), AttributeValue::Missing]);

        let mut uniform = KNearestNeighbors::new(Arc::clone(&header), KnnConfig::new(3)).unwrap();
        uniform.train(data.clone()).unwrap();
        assert_eq!(uniform.predict(&q).unwrap(), AttributeValue::nominal("far"));

        let mut weighted = KNearestNeighbors::new(
            header,
            KnnConfig::new(3).with_weighting(Weighting::InverseDistance),
        )
        .unwrap();
        weighted.train(data).unwrap();
        let votes = weighted.get_votes_for_instance(&q).unwrap();
        assert_abs_diff_eq!(votes.weight_of(&"near".into()).unwrap(), 1.0 / 0.101, epsilon = 1e-9);
        assert_eq!(weighted.predict(&q).unwrap(), AttributeValue::nominal("near"));
    }

    #[test]
    fn boundary_tie_votes_with_every_tied_neighbour() {
        let header = header_ref(
            "r",
            vec![
                Arc::new(NumericAttribute::new("x".into())) as AttributeRef,
                Arc::new(NominalAttribute::with_values(
                    "y".into(),
                    vec!["A".into(), "B".into()],
                )) as AttributeRef,
            ],
            1,
        );
        // distances from 0: A at 1, B at 2, B at 2 (tie straddles k = 2)
        let data = vec![
            Instance::new(vec![1.0.into(), "A".into()]),
            Instance::new(vec![2.0.into(), "B".into()]),
            Instance::new(vec![(-2.0).into(), "B".into()]),
        ];
        let mut knn = KNearestNeighbors::new(header, KnnConfig::new(2)).unwrap();
        knn.train(data).unwrap();

        let q = Instance::new(vec![0.0.into(), AttributeValue::Missing]);
        assert_eq!(knn.nearest_neighbors(&q).unwrap().len(), 3);
        assert_eq!(knn.predict(&q).unwrap(), AttributeValue::nominal("B"));
    }

    #[test]
    fn retraining_replaces_the_model() {
        let mut knn = trained(KnnConfig::new(1).with_normalize(true));
        let first = knn.normalization().cloned();
        knn.train(vec![fruit(10.0, 1.0, "red", "lemon"), fruit(20.0, 2.0, "red", "lemon")])
            .unwrap();
        assert_eq!(knn.training_set_size(), Some(2));
        assert_ne!(knn.normalization().cloned(), first);
        assert_eq!(
            knn.predict(&query(150.0, 7.0, "red")).unwrap(),
            AttributeValue::nominal("lemon")
        );
    }

    #[test]
    fn concurrent_predictions_agree() {
        let knn = trained(KnnConfig::new(3).with_normalize(true));
        let queries = vec![
            query(155.0, 7.1, "red"),
            query(105.0, 5.2, "yellow"),
            query(165.0, 7.4, "green"),
        ];
        let expected: Vec<AttributeValue> = queries.iter().map(|q| knn.predict(q).unwrap()).collect();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        queries
                            .iter()
                            .map(|q| knn.predict(q).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
