use crate::classifiers::lazy::neighbor_selector::NeighborCandidate;
use crate::core::instances::AttributeValue;
use crate::error::KnnError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Added to every distance before inverting it, so an exact match cannot divide by zero.
pub const DEFAULT_EPSILON: f64 = 1e-3;

/// How much each selected neighbour's vote counts.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Weighting {
    /// One vote per neighbour.
    #[default]
    Uniform,
    /// `1 / (distance + epsilon)` per neighbour.
    InverseDistance,
}

impl Weighting {
    /// Parses a weighting name, failing with [`KnnError::UnknownWeighting`].
    pub fn parse(name: &str) -> Result<Weighting, KnnError> {
        name.trim()
            .parse()
            .map_err(|_| KnnError::UnknownWeighting(name.to_string()))
    }

    #[inline]
    pub fn vote_weight(self, distance: f64, epsilon: f64) -> f64 {
        match self {
            Weighting::Uniform => 1.0,
            Weighting::InverseDistance => 1.0 / (distance + epsilon),
        }
    }
}

/// Accumulated weight per class label, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoteTally {
    entries: Vec<(AttributeValue, f64)>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &AttributeValue, weight: f64) {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, total)) => *total += weight,
            None => self.entries.push((label.clone(), weight)),
        }
    }

    pub fn weight_of(&self, label: &AttributeValue) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, w)| *w)
    }

    /// Label with the largest tally. Among equal tallies the one added first wins,
    /// which for candidates in distance order is the nearest neighbour's label.
    pub fn winner(&self) -> Option<&AttributeValue> {
        let mut best: Option<&(AttributeValue, f64)> = None;
        for entry in &self.entries {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(label, _)| label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttributeValue, f64)> {
        self.entries.iter().map(|(l, w)| (l, *w))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds the tally for `candidates`. Every candidate votes with full weight,
/// including tied candidates past the k-th rank.
pub fn tally(
    candidates: &[NeighborCandidate<'_>],
    weighting: Weighting,
    class_index: usize,
    epsilon: f64,
) -> VoteTally {
    let mut votes = VoteTally::new();
    for candidate in candidates {
        let Some(label) = candidate.instance.class_value(class_index) else {
            continue;
        };
        votes.add(label, weighting.vote_weight(candidate.distance, epsilon));
    }
    votes
}

/// Predicted label for `candidates`, `None` when no candidate carries a label.
pub fn aggregate(
    candidates: &[NeighborCandidate<'_>],
    weighting: Weighting,
    class_index: usize,
    epsilon: f64,
) -> Option<AttributeValue> {
    tally(candidates, weighting, class_index, epsilon)
        .winner()
        .cloned()
}
