use std::collections::BTreeMap;

use ahash::AHashMap;
use tracing::{debug, info};

use crate::{
    config::{AllocationPolicy, Config},
    error::{Error, Result},
    grid::{DistrictId, GridId, GridIndex},
};
use super::{aggregate_by_district, FloorArea};

/// Population totals of one district, split by dwelling type.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictPopulation {
    pub district: DistrictId,
    /// Non-bungalow floor area of the district.
    pub area: f64,
    pub area_bungalow: f64,
    pub total_population: f64,
    pub bungalow_population: f64,
    pub apartment_population: f64,
}

/// Estimated residents of one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPopulation {
    pub grid_id: GridId,
    pub district: DistrictId,
    pub area: f64,
    pub area_bungalow: f64,
    pub apartment_population: f64,
    pub bungalow_population: f64,
    pub population: f64,
}

/// Result of redistributing district totals to grid cells.
#[derive(Debug, Clone, Default)]
pub struct Allocation {
    /// In grid file order.
    pub grids: Vec<GridPopulation>,
    /// Sorted by district id.
    pub districts: Vec<DistrictPopulation>,
    /// Grids whose district has zero apartment floor area.
    pub guarded_grids: usize,
    /// Grids with floor area but no district.
    pub grids_without_district: usize,
}

impl Allocation {
    /// Per-grid population keyed by grid id.
    pub fn population_by_grid(&self) -> AHashMap<GridId, f64> {
        self.grids.iter().map(|g| (g.grid_id.clone(), g.population)).collect()
    }
}

/// Redistributes externally known district populations onto grid cells in
/// proportion to apartment floor area, plus a fixed density for bungalows.
#[derive(Debug, Clone, Copy)]
pub struct PopulationAllocator<'a> {
    policy: &'a AllocationPolicy,
    totals: &'a BTreeMap<String, f64>,
}

impl<'a> PopulationAllocator<'a> {
    pub fn new(policy: &'a AllocationPolicy, totals: &'a BTreeMap<String, f64>) -> Self {
        Self { policy, totals }
    }

    pub fn from_config(config: &'a Config) -> Self {
        Self::new(&config.allocation, &config.district_population)
    }

    /// Split a district's total into bungalow and apartment residents.
    ///
    /// Fails with `InvalidConfig` if the district has no configured total.
    pub fn split_district(&self, district: &DistrictId, area: FloorArea) -> Result<DistrictPopulation> {
        let total_population = *self.totals.get(&**district).ok_or_else(|| {
            Error::config(format!("district_population.{district}"), "no total population for district")
        })?;
        let bungalow_population = total_population * self.policy.bungalow_share;
        Ok(DistrictPopulation {
            district: district.clone(),
            area: area.area,
            area_bungalow: area.area_bungalow,
            total_population,
            bungalow_population,
            apartment_population: total_population - bungalow_population,
        })
    }

    /// Residents of a grid cell's bungalows.
    #[inline]
    pub fn bungalow_population(&self, area_bungalow: f64) -> f64 {
        area_bungalow / 100.0 * self.policy.bungalow_residents_per_100m2
    }

    /// Redistribute every district's apartment population to its grids.
    ///
    /// A grid in a district with zero apartment floor area gets zero
    /// apartment residents. No renormalization happens afterwards, so such a
    /// district's apartment total is left under-distributed.
    pub fn allocate(&self, grid_areas: &AHashMap<GridId, FloorArea>, index: &GridIndex) -> Result<Allocation> {
        let (district_areas, grids_without_district) = aggregate_by_district(grid_areas, index);

        let districts = district_areas.iter()
            .map(|(district, area)| self.split_district(district, *area))
            .collect::<Result<Vec<_>>>()?;
        let by_district = districts.iter()
            .map(|d| (d.district.clone(), d))
            .collect::<AHashMap<_, _>>();

        let mut grids = Vec::with_capacity(grid_areas.len());
        let mut guarded_grids = 0;
        for cell in index.cells() {
            let (Some(area), Some(district)) = (grid_areas.get(&cell.id), cell.district.as_ref()) else {
                continue;
            };
            let Some(summary) = by_district.get(district) else { continue };

            let apartment_population = if summary.area == 0.0 {
                guarded_grids += 1;
                debug!(grid = %cell.id, %district, "district has no apartment floor area");
                0.0
            } else {
                summary.apartment_population * (area.area / summary.area)
            };
            let bungalow_population = self.bungalow_population(area.area_bungalow);

            grids.push(GridPopulation {
                grid_id: cell.id.clone(),
                district: district.clone(),
                area: area.area,
                area_bungalow: area.area_bungalow,
                apartment_population,
                bungalow_population,
                population: apartment_population + bungalow_population,
            });
        }

        info!(
            grids = grids.len(),
            districts = districts.len(),
            guarded_grids,
            "district population distributed to grids"
        );
        Ok(Allocation { grids, districts, guarded_grids, grids_without_district })
    }
}
