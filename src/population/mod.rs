mod aggregate;
mod allocate;

pub use aggregate::{aggregate_by_district, aggregate_by_grid, AssignmentStats, FloorArea};
pub use allocate::{Allocation, DistrictPopulation, GridPopulation, PopulationAllocator};
