//! CSV reading operations.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::{Context, Result};
use geo::Coord;
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReader, DataType}};
use tracing::warn;

use crate::{
    buildings::Building,
    error::Error,
    geom::CoordinateProjector,
    grid::{GridCell, GridId},
};

/// Reads a CSV file from `path` into a Polars DataFrame.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    CsvReader::new(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Values of column `name` as text; missing column is `MalformedInput`.
fn text_column(df: &DataFrame, name: &str, path: &Path) -> Result<Vec<Option<String>>> {
    if !has_column(df, name) {
        return Err(Error::malformed(path, name).into());
    }
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column.str()?.into_iter().map(|v| v.map(str::to_string)).collect())
}

/// Values of column `name` as floats; unparsable cells become `None`.
fn float_column(df: &DataFrame, name: &str, path: &Path) -> Result<Vec<Option<f64>>> {
    if !has_column(df, name) {
        return Err(Error::malformed(path, name).into());
    }
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

fn optional_text_column(df: &DataFrame, name: &str, path: &Path) -> Result<Vec<Option<String>>> {
    match has_column(df, name) {
        true => text_column(df, name, path),
        false => Ok(vec![None; df.height()]),
    }
}

/// Read the grid cell list (`id,left,right,top,bottom[,district]`, projected
/// bounds) and project each cell's corners to geographic degrees.
///
/// Rows with a null in any required column are dropped. A cell whose bounds
/// are not a proper rectangle is `MalformedInput`.
pub(crate) fn read_grid_cells(path: &Path, projector: &CoordinateProjector) -> Result<Vec<GridCell>> {
    let df = read_csv(path)?;
    let ids = text_column(&df, "id", path)?;
    let bounds = ["left", "right", "top", "bottom"].map(|name| float_column(&df, name, path));
    let [left, right, top, bottom] = bounds;
    let (left, right, top, bottom) = (left?, right?, top?, bottom?);
    let districts = optional_text_column(&df, "district", path)?;

    let mut cells = Vec::with_capacity(df.height());
    let mut dropped = 0;
    for row in 0..df.height() {
        let (Some(id), Some(l), Some(r), Some(t), Some(b)) =
            (ids[row].as_deref(), left[row], right[row], top[row], bottom[row]) else {
            dropped += 1;
            continue;
        };
        let district = districts[row].as_deref().map(Arc::<str>::from);
        let cell = GridCell::from_projected(GridId::new(id), district, [l, r, t, b], projector)?;
        if !cell.is_proper() {
            return Err(Error::malformed(path, format!("bounds of grid {}", cell.id)).into());
        }
        cells.push(cell);
    }

    if dropped > 0 {
        warn!("{} grid row(s) with missing values dropped from {}", dropped, path.display());
    }
    Ok(cells)
}

/// Read preprocessed residential buildings
/// (`id,type,center_lng,center_lat,area[,osm_id,name]`).
///
/// Rows missing a center or an area are skipped and counted.
pub(crate) fn read_buildings(path: &Path) -> Result<(Vec<Building>, usize)> {
    let df = read_csv(path)?;
    let ids = text_column(&df, "id", path)?;
    let types = text_column(&df, "type", path)?;
    let lngs = float_column(&df, "center_lng", path)?;
    let lats = float_column(&df, "center_lat", path)?;
    let areas = float_column(&df, "area", path)?;
    let osm_ids = optional_text_column(&df, "osm_id", path)?;
    let names = optional_text_column(&df, "name", path)?;

    let mut buildings = Vec::with_capacity(df.height());
    let mut skipped = 0;
    for row in 0..df.height() {
        let (Some(x), Some(y), Some(area)) = (lngs[row], lats[row], areas[row]) else {
            skipped += 1;
            continue;
        };
        buildings.push(Building {
            id: ids[row].clone().unwrap_or_else(|| row.to_string()),
            osm_id: osm_ids[row].clone(),
            name: names[row].clone(),
            ty: types[row].clone().unwrap_or_default(),
            center: Coord { x, y },
            area,
        });
    }

    if skipped > 0 {
        warn!("{} building(s) without center or area skipped in {}", skipped, path.display());
    }
    Ok((buildings, skipped))
}

/// Read the per-grid population table (`id,population`).
pub(crate) fn read_grid_population(path: &Path) -> Result<Vec<(GridId, f64)>> {
    let df = read_csv(path)?;
    let ids = text_column(&df, "id", path)?;
    let populations = float_column(&df, "population", path)?;

    ids.into_iter()
        .zip(populations)
        .map(|(id, population)| match (id, population) {
            (Some(id), Some(population)) => Ok((GridId::new(id), population)),
            (Some(id), None) => Err(Error::malformed(path, format!("population of grid {id}")).into()),
            (None, _) => Err(Error::malformed(path, "id").into()),
        })
        .collect()
}
