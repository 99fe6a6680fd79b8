use std::time::Instant;

use anyhow::Result;
use tracing::info;

use crate::{
    buildings::{preprocess, PreprocessStats},
    config::{require, Config},
    io,
};

/// Reduce a building footprint shapefile to the residential buildings table.
pub fn run(config: &Config) -> Result<PreprocessStats> {
    let start = Instant::now();
    let input = require(&config.input.buildings_shape_file, "input.buildings_shape_file")?;
    let output = require(&config.output.residential_buildings_file, "output.residential_buildings_file")?;

    info!("[buildings] reading footprints from {}", input.display());
    let footprints = io::shp::read_building_footprints(input)?;

    let (buildings, stats) = preprocess(footprints, &config.buildings);
    info!(
        read = stats.read,
        non_residential = stats.non_residential,
        outside_study_area = stats.outside_study_area,
        degenerate = stats.degenerate,
        kept = stats.kept,
        "[buildings] preprocessed footprints"
    );

    io::csv::write_buildings(&buildings, output)?;
    info!("[buildings] wrote {} building(s) to {} in {:.2?}", buildings.len(), output.display(), start.elapsed());
    Ok(stats)
}
