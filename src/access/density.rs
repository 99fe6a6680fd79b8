use crate::grid::GridId;
use super::SupermarketCounts;

/// Density score of one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityResult {
    pub grid_id: GridId,
    pub population: f64,
    pub supermarket_count: usize,
    pub density: f64,
}

/// Population per reachable supermarket.
///
/// A grid with no entry in `counts` (or an explicit zero) is divided by 1, so
/// its density equals its population. This makes an unserved cell look like a
/// very dense one instead of flagging it.
pub fn density(grid_id: &GridId, population: f64, counts: &SupermarketCounts) -> f64 {
    match counts.get(grid_id) {
        Some(&count) if count > 0 => population / count as f64,
        _ => population,
    }
}

/// Combines per-grid population with reachable-supermarket counts.
#[derive(Debug, Clone, Copy)]
pub struct DensityCalculator<'a> {
    counts: &'a SupermarketCounts,
}

impl<'a> DensityCalculator<'a> {
    pub fn new(counts: &'a SupermarketCounts) -> Self {
        Self { counts }
    }

    pub fn compute(&self, grid_id: &GridId, population: f64) -> DensityResult {
        DensityResult {
            grid_id: grid_id.clone(),
            population,
            supermarket_count: self.counts.get(grid_id).copied().unwrap_or(0),
            density: density(grid_id, population, self.counts),
        }
    }
}
