use crate::classifiers::lazy::distance::{Metric, distance};
use crate::core::instances::Instance;
use crate::error::KnnError;

/// A training instance paired with its distance to the current query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborCandidate<'a> {
    pub instance: &'a Instance,
    /// Position of the instance in the stored training set.
    pub position: usize,
    pub distance: f64,
}

/// Returns the `k` training instances nearest to `query`, ascending by distance.
///
/// Equal distances are ordered by training-set position. When the k-th
/// candidate's distance is shared by candidates ranked after it, all of them are
/// returned, so the result can be longer than `k`. With `k` larger than the
/// training set the whole set comes back sorted.
pub fn select<'a>(
    query: &Instance,
    training: &'a [Instance],
    k: usize,
    metric: Metric,
    class_index: usize,
) -> Result<Vec<NeighborCandidate<'a>>, KnnError> {
    if k == 0 {
        return Err(KnnError::InvalidK { k: 0 });
    }

    let mut candidates: Vec<NeighborCandidate<'a>> = training
        .iter()
        .enumerate()
        .map(|(position, instance)| NeighborCandidate {
            instance,
            position,
            distance: distance(query, instance, metric, class_index),
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then(a.position.cmp(&b.position))
    });

    let cutoff = boundary_cutoff(&candidates, k);
    candidates.truncate(cutoff);
    Ok(candidates)
}

/// Length of the result: `k`, extended over every candidate tied with the k-th.
fn boundary_cutoff(sorted: &[NeighborCandidate<'_>], k: usize) -> usize {
    if sorted.len() <= k {
        return sorted.len();
    }
    let boundary = sorted[k - 1].distance;
    k + sorted[k..]
        .iter()
        .take_while(|c| c.distance == boundary)
        .count()
}
