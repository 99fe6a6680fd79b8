//! Supermarket reachability per grid cell and the resulting density score.

mod counter;
mod density;
mod distance;

pub(crate) use counter::failed_queries;
pub use counter::{count_reachable, AccessibilityCounter, SupermarketCounts};
pub use density::{density, DensityCalculator, DensityResult};
pub use distance::{DistanceResponse, MatrixElement, MatrixRow, Measure, RawId, SupermarketDistanceRecord};
