use crate::core::instances::AttributeValue;
use std::collections::{BTreeMap, BTreeSet};

/// Counts of (actual, predicted) label pairs, keyed by label text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfusionMatrix {
    counts: BTreeMap<String, BTreeMap<String, u64>>,
    total: u64,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, actual: &AttributeValue, predicted: &AttributeValue) {
        *self
            .counts
            .entry(actual.to_string())
            .or_default()
            .entry(predicted.to_string())
            .or_insert(0) += 1;
        self.total += 1;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn count(&self, actual: &str, predicted: &str) -> u64 {
        self.counts
            .get(actual)
            .and_then(|row| row.get(predicted))
            .copied()
            .unwrap_or(0)
    }

    pub fn correct(&self) -> u64 {
        self.counts
            .iter()
            .map(|(actual, row)| row.get(actual).copied().unwrap_or(0))
            .sum()
    }

    /// Every label seen as actual or predicted, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: BTreeSet<&str> = BTreeSet::new();
        for (actual, row) in &self.counts {
            labels.insert(actual);
            labels.extend(row.keys().map(String::as_str));
        }
        labels.into_iter().collect()
    }

    /// Fraction of correct predictions; NaN before anything was scored.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return f64::NAN;
        }
        self.correct() as f64 / self.total as f64
    }

    /// Cohen's kappa; 0 when chance agreement is already perfect or nothing was scored.
    pub fn kappa(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let n = self.total as f64;
        let p0 = self.correct() as f64 / n;

        let mut predicted_totals: BTreeMap<&str, u64> = BTreeMap::new();
        for row in self.counts.values() {
            for (predicted, c) in row {
                *predicted_totals.entry(predicted).or_insert(0) += c;
            }
        }

        let pe: f64 = self
            .counts
            .iter()
            .map(|(actual, row)| {
                let actual_total: u64 = row.values().sum();
                let predicted_total = predicted_totals.get(actual.as_str()).copied().unwrap_or(0);
                (actual_total as f64 / n) * (predicted_total as f64 / n)
            })
            .sum();

        if (1.0 - pe).abs() < f64::EPSILON {
            return 0.0;
        }
        (p0 - pe) / (1.0 - pe)
    }
}
