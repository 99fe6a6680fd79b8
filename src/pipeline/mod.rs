//! End-to-end runs, one per CLI subcommand. Each reads its inputs from the
//! paths in [`Config`](crate::config::Config), writes its outputs and returns
//! the counters it collected.

mod buildings;
mod density;
mod places;
mod population;

pub use buildings::run as run_buildings;
pub use density::{run as run_density, DensityStats};
pub use places::run as run_places;
pub use population::{run as run_population, PopulationStats};

use ahash::AHashMap;
use anyhow::Result;

use crate::{
    config::Config,
    geom::CoordinateProjector,
    grid::GridId,
    io,
    merge::{merge, GridFeature, MergeStats},
};

/// Join `values` onto the grid geometry named by the config (the grid
/// shapefile if set, else the tabular grid file, else nothing) and write the
/// CSV and optional shapefile outputs.
fn export_merged(
    config: &Config,
    field: &str,
    values: &AHashMap<GridId, f64>,
    csv_path: &std::path::Path,
    shape_path: Option<&std::path::Path>,
) -> Result<MergeStats> {
    let features = match (&config.input.grid_shape_file, &config.input.grid_file) {
        (Some(shape), _) => io::shp::read_grid_features(shape)?,
        (None, Some(grid)) => {
            let projector = CoordinateProjector::new(&config.projection.source, &config.projection.target)?;
            io::csv::read_grid_cells(grid, &projector)?.iter().map(GridFeature::from_cell).collect()
        }
        (None, None) => Vec::new(),
    };

    let (merged, stats) = merge(features, field, values);
    io::csv::write_features(&merged, csv_path)?;

    if let Some(shape_path) = shape_path {
        let written = io::shp::write_grid_features(&merged, shape_path)?;
        if let Some(source) = &config.input.grid_shape_file {
            crate::common::copy_prj(source, shape_path)?;
        }
        tracing::info!("{} grid feature(s) written to {}", written, shape_path.display());
    }
    Ok(stats)
}
