mod config;
mod distance;
mod k_nearest_neighbors;
mod neighbor_selector;
mod normalizer;
mod vote;

pub use config::KnnConfig;
pub use distance::{Metric, distance};
pub use k_nearest_neighbors::KNearestNeighbors;
pub use neighbor_selector::{NeighborCandidate, select};
pub use normalizer::{ColumnScaling, DEGENERATE_SCALE, NormalizationParameters, normalize};
pub use vote::{DEFAULT_EPSILON, VoteTally, Weighting, aggregate, tally};
