use std::time::Instant;

use anyhow::Result;
use tracing::info;

use crate::{
    config::{require, Config},
    io,
    places::{select_supermarkets, PlacesStats},
};

const SUPERMARKET_TYPE: &str = "supermarket";

/// Turn raw place-search results into the supermarket list.
pub fn run(config: &Config) -> Result<PlacesStats> {
    let start = Instant::now();
    let input = require(&config.input.existing_supermarkets_raw, "input.existing_supermarkets_raw")?;
    let output = require(&config.output.existing_supermarkets_data, "output.existing_supermarkets_data")?;

    let results = io::json::read_place_results(input)?;
    info!("[places] read {} place result(s) from {}", results.len(), input.display());

    let (supermarkets, stats) = select_supermarkets(results, SUPERMARKET_TYPE);
    io::csv::write_supermarkets(&supermarkets, output)?;

    info!("[places] wrote {} supermarket(s) to {} in {:.2?}", stats.kept, output.display(), start.elapsed());
    Ok(stats)
}
