use std::time::Instant;

use anyhow::Result;
use tracing::info;

use crate::{
    config::{require, Config},
    geom::CoordinateProjector,
    grid::GridIndex,
    io,
    merge::MergeStats,
    population::{aggregate_by_grid, AssignmentStats, PopulationAllocator},
};

/// Counters collected by [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PopulationStats {
    pub grids: usize,
    pub buildings: AssignmentStats,
    /// Building rows without a usable center or area.
    pub skipped_buildings: usize,
    pub districts: usize,
    pub guarded_grids: usize,
    pub grids_without_district: usize,
    pub merge: MergeStats,
    pub total_population: f64,
}

/// Estimate grid population from residential floor area and district totals.
pub fn run(config: &Config) -> Result<PopulationStats> {
    let start = Instant::now();
    let grid_path = require(&config.input.grid_file, "input.grid_file")?;
    let buildings_path = require(&config.input.residential_buildings_file, "input.residential_buildings_file")?;
    let output = require(&config.output.grid_population_file, "output.grid_population_file")?;

    let projector = CoordinateProjector::new(&config.projection.source, &config.projection.target)?;
    let cells = io::csv::read_grid_cells(grid_path, &projector)?;
    info!("[population] loaded {} grid cell(s) from {}", cells.len(), grid_path.display());

    if let Some(geocode) = &config.output.grid_geocode_file {
        io::csv::write_grid_geocode(&cells, geocode)?;
        info!("[population] wrote grid centers to {}", geocode.display());
    }
    let index = GridIndex::new(cells);

    let (buildings, skipped_buildings) = io::csv::read_buildings(buildings_path)?;
    info!("[population] loaded {} building(s) from {}", buildings.len(), buildings_path.display());

    let (areas, assignment) = aggregate_by_grid(buildings, &index, &config.allocation.bungalow_type);
    info!(
        assigned = assignment.assigned,
        unassigned = assignment.unassigned,
        grids_with_area = areas.len(),
        "[population] assigned buildings to grid cells"
    );

    let allocation = PopulationAllocator::from_config(config).allocate(&areas, &index)?;
    let total_population = allocation.grids.iter().map(|g| g.population).sum::<f64>();
    info!("[population] allocated {:.1} resident(s) across {} grid(s)", total_population, allocation.grids.len());

    if let Some(path) = &config.output.district_population_file {
        io::csv::write_district_population(&allocation.districts, path)?;
    }

    let merge = super::export_merged(
        config,
        "population",
        &allocation.population_by_grid(),
        output,
        config.output.grid_population_shape_file.as_deref(),
    )?;

    info!("[population] done in {:.2?}", start.elapsed());
    Ok(PopulationStats {
        grids: index.len(),
        buildings: assignment,
        skipped_buildings,
        districts: allocation.districts.len(),
        guarded_grids: allocation.guarded_grids,
        grids_without_district: allocation.grids_without_district,
        merge,
        total_population,
    })
}
