use std::collections::BTreeMap;

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::{buildings::Building, grid::{DistrictId, GridId, GridIndex}};

/// Floor area split by dwelling type, in square meters.
///
/// `area` holds every non-bungalow building (the apartment floor area).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloorArea {
    pub area: f64,
    pub area_bungalow: f64,
}

impl FloorArea {
    #[inline]
    fn add(&mut self, other: FloorArea) {
        self.area += other.area;
        self.area_bungalow += other.area_bungalow;
    }
}

/// Outcome counts of assigning buildings to grid cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentStats {
    pub assigned: usize,
    /// Buildings whose center lies in no cell (or exactly on a boundary).
    pub unassigned: usize,
}

/// Assign each building to its grid cell and sum floor area per cell.
///
/// Buildings are consumed; unassigned ones contribute nothing and are only
/// counted.
pub fn aggregate_by_grid(
    buildings: impl IntoIterator<Item = Building>,
    index: &GridIndex,
    bungalow_type: &str,
) -> (AHashMap<GridId, FloorArea>, AssignmentStats) {
    let mut areas: AHashMap<GridId, FloorArea> = AHashMap::new();
    let mut stats = AssignmentStats::default();

    for building in buildings {
        let Some(cell) = index.assign(building.center) else {
            debug!(id = %building.id, lng = building.center.x, lat = building.center.y, "building matches no grid cell");
            stats.unassigned += 1;
            continue;
        };
        stats.assigned += 1;

        let share = if building.is_bungalow(bungalow_type) {
            FloorArea { area: 0.0, area_bungalow: building.area }
        } else {
            FloorArea { area: building.area, area_bungalow: 0.0 }
        };
        areas.entry(cell.id.clone()).or_default().add(share);
    }

    if stats.unassigned > 0 {
        warn!("{} building(s) could not be assigned to any grid cell", stats.unassigned);
    }
    (areas, stats)
}

/// Sum grid-level floor area up to districts.
///
/// Returns the district totals and the number of grids with floor area but
/// no district, which are left out.
pub fn aggregate_by_district(
    grid_areas: &AHashMap<GridId, FloorArea>,
    index: &GridIndex,
) -> (BTreeMap<DistrictId, FloorArea>, usize) {
    let mut districts: BTreeMap<DistrictId, FloorArea> = BTreeMap::new();
    let mut orphans = 0;

    for cell in index.cells() {
        let Some(area) = grid_areas.get(&cell.id) else { continue };
        match &cell.district {
            Some(district) => districts.entry(district.clone()).or_default().add(*area),
            None => orphans += 1,
        }
    }

    if orphans > 0 {
        warn!("{orphans} grid(s) with floor area have no district and are left out");
    }
    (districts, orphans)
}
