use std::time::Instant;

use ahash::AHashMap;
use anyhow::Result;
use tracing::{info, warn};

use crate::{
    access::{failed_queries, AccessibilityCounter, DensityCalculator},
    config::{require, Config},
    io,
    merge::MergeStats,
};

/// Counters collected by [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DensityStats {
    pub records: usize,
    /// Queries that returned no driving time.
    pub failed_queries: usize,
    /// Grids with at least one supermarket within the threshold.
    pub grids_with_access: usize,
    pub grids: usize,
    pub merge: MergeStats,
}

/// Flatten distance responses, count reachable supermarkets per grid and
/// divide grid population by that count.
pub fn run(config: &Config) -> Result<DensityStats> {
    let start = Instant::now();
    let counter = AccessibilityCounter::from_config(config)?;
    let raw_path = require(&config.input.grid_to_supermarket_dist_raw, "input.grid_to_supermarket_dist_raw")?;
    let population_path = require(&config.input.grid_population_file, "input.grid_population_file")?;
    let output = require(&config.output.supermarket_density_file, "output.supermarket_density_file")?;

    let records = io::json::read_distance_responses(raw_path)?
        .into_iter()
        .map(|response| response.into_record())
        .collect::<Vec<_>>();
    let failed = failed_queries(&records);
    info!("[density] flattened {} distance record(s) from {}", records.len(), raw_path.display());
    if failed > 0 {
        warn!("{} distance quer(ies) returned no driving time", failed);
    }

    if let Some(path) = &config.output.grid_to_supermarket_dist_data {
        io::csv::write_distance_records(&records, path)?;
    }

    let counts = counter.count_all(&records);
    info!(
        max_driving_time = counter.max_driving_time(),
        grids_with_access = counts.len(),
        "[density] counted reachable supermarkets"
    );

    let population = io::csv::read_grid_population(population_path)?;
    let calculator = DensityCalculator::new(&counts);
    let densities = population.iter()
        .map(|(grid_id, population)| {
            let result = calculator.compute(grid_id, *population);
            (result.grid_id, result.density)
        })
        .collect::<AHashMap<_, _>>();

    let merge = super::export_merged(
        config,
        "density",
        &densities,
        output,
        config.output.supermarket_density_shape_file.as_deref(),
    )?;

    info!("[density] done in {:.2?}", start.elapsed());
    Ok(DensityStats {
        records: records.len(),
        failed_queries: failed,
        grids_with_access: counts.len(),
        grids: population.len(),
        merge,
    })
}
