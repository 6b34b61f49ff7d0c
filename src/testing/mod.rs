mod dummies;
mod spies;
mod stubs;

pub use dummies::classifier_none_votes::ClassifierNoneVotes;
pub use spies::train_spy_classifier::{TrainSpyClassifier, TrainSpyHandle};
pub use stubs::oracle_classifier::OracleClassifier;

use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::{InstanceHeader, header_ref};
use crate::core::instances::Instance;
use std::sync::Arc;

/// One numeric feature and a binary `yes`/`no` class.
pub fn binary_header() -> Arc<InstanceHeader> {
    header_ref(
        "binary",
        vec![
            Arc::new(NumericAttribute::new("x".into())) as AttributeRef,
            Arc::new(NominalAttribute::with_values(
                "class".into(),
                vec!["yes".into(), "no".into()],
            )) as AttributeRef,
        ],
        1,
    )
}

/// `n` rows for [`binary_header`], alternating `yes` and `no`, with `x = i`.
pub fn alternating_instances(n: usize) -> Vec<Instance> {
    (0..n)
        .map(|i| {
            let label = if i % 2 == 0 { "yes" } else { "no" };
            Instance::new(vec![(i as f64).into(), label.into()])
        })
        .collect()
}
