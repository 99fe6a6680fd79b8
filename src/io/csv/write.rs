//! CSV writing operations.

use std::{collections::BTreeMap, fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{Column, CsvWriter, NamedFrom}, series::Series};

use crate::{
    access::SupermarketDistanceRecord,
    buildings::Building,
    common::ensure_parent_dir,
    grid::GridCell,
    merge::{AttributeValue, GridFeature},
    places::Supermarket,
    population::DistrictPopulation,
};

/// Write a DataFrame to a CSV file, creating its directory if needed.
pub(crate) fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path)
        .with_context(|| format!("[io::csv::write] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(df)
        .with_context(|| format!("[io::csv::write] Failed to write CSV to {:?}", path))
}

fn frame(columns: Vec<Series>) -> Result<DataFrame> {
    DataFrame::new(columns.into_iter().map(Column::from).collect())
        .context("[io::csv::write] Failed to assemble DataFrame")
}

/// Write `id, center_lng, center_lat` for every grid cell.
pub(crate) fn write_grid_geocode(cells: &[GridCell], path: &Path) -> Result<()> {
    let mut df = frame(vec![
        Series::new("id".into(), cells.iter().map(|c| c.id.to_string()).collect::<Vec<_>>()),
        Series::new("center_lng".into(), cells.iter().map(GridCell::center_lng).collect::<Vec<_>>()),
        Series::new("center_lat".into(), cells.iter().map(GridCell::center_lat).collect::<Vec<_>>()),
    ])?;
    write_csv(&mut df, path)
}

/// Write preprocessed residential buildings.
pub(crate) fn write_buildings(buildings: &[Building], path: &Path) -> Result<()> {
    let mut df = frame(vec![
        Series::new("id".into(), buildings.iter().map(|b| b.id.clone()).collect::<Vec<_>>()),
        Series::new("osm_id".into(), buildings.iter().map(|b| b.osm_id.clone()).collect::<Vec<_>>()),
        Series::new("name".into(), buildings.iter().map(|b| b.name.clone()).collect::<Vec<_>>()),
        Series::new("type".into(), buildings.iter().map(|b| b.ty.clone()).collect::<Vec<_>>()),
        Series::new("center_lng".into(), buildings.iter().map(|b| b.center.x).collect::<Vec<_>>()),
        Series::new("center_lat".into(), buildings.iter().map(|b| b.center.y).collect::<Vec<_>>()),
        Series::new("area".into(), buildings.iter().map(|b| b.area).collect::<Vec<_>>()),
    ])?;
    write_csv(&mut df, path)
}

/// Write the per-district floor area and population summary.
pub(crate) fn write_district_population(districts: &[DistrictPopulation], path: &Path) -> Result<()> {
    let mut df = frame(vec![
        Series::new("district".into(), districts.iter().map(|d| d.district.to_string()).collect::<Vec<_>>()),
        Series::new("area".into(), districts.iter().map(|d| d.area).collect::<Vec<_>>()),
        Series::new("area_bungalow".into(), districts.iter().map(|d| d.area_bungalow).collect::<Vec<_>>()),
        Series::new("total_population".into(), districts.iter().map(|d| d.total_population).collect::<Vec<_>>()),
        Series::new("bungalow_population".into(), districts.iter().map(|d| d.bungalow_population).collect::<Vec<_>>()),
        Series::new("apartment_population".into(), districts.iter().map(|d| d.apartment_population).collect::<Vec<_>>()),
    ])?;
    write_csv(&mut df, path)
}

/// Write flattened distance records; failed queries keep null distance and time.
pub(crate) fn write_distance_records(records: &[SupermarketDistanceRecord], path: &Path) -> Result<()> {
    let mut df = frame(vec![
        Series::new("grid_id".into(), records.iter().map(|r| r.grid_id.to_string()).collect::<Vec<_>>()),
        Series::new("supermarket_id".into(), records.iter().map(|r| r.supermarket_id.clone()).collect::<Vec<_>>()),
        Series::new("status".into(), records.iter().map(|r| r.status.clone()).collect::<Vec<_>>()),
        Series::new("distance".into(), records.iter().map(|r| r.distance).collect::<Vec<_>>()),
        Series::new("driving_time".into(), records.iter().map(|r| r.driving_time).collect::<Vec<_>>()),
    ])?;
    write_csv(&mut df, path)
}

/// Write the selected supermarket list.
pub(crate) fn write_supermarkets(supermarkets: &[Supermarket], path: &Path) -> Result<()> {
    let mut df = frame(vec![
        Series::new("index".into(), supermarkets.iter().map(|s| s.index as u64).collect::<Vec<_>>()),
        Series::new("name".into(), supermarkets.iter().map(|s| s.name.clone()).collect::<Vec<_>>()),
        Series::new("addr".into(), supermarkets.iter().map(|s| s.addr.clone()).collect::<Vec<_>>()),
        Series::new("lat".into(), supermarkets.iter().map(|s| s.lat).collect::<Vec<_>>()),
        Series::new("lng".into(), supermarkets.iter().map(|s| s.lng).collect::<Vec<_>>()),
        Series::new("type".into(), supermarkets.iter().map(|s| s.ty.clone()).collect::<Vec<_>>()),
    ])?;
    write_csv(&mut df, path)
}

/// Column kind of a feature attribute: numeric unless any value is text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Number,
    Text,
}

/// Union of attribute columns across `features`, sorted by name.
pub(crate) fn attribute_columns(features: &[GridFeature]) -> BTreeMap<String, ColumnKind> {
    let mut columns = BTreeMap::new();
    for feature in features {
        for (name, value) in &feature.attributes {
            let kind = columns.entry(name.clone()).or_insert(ColumnKind::Number);
            if matches!(value, AttributeValue::Text(_)) {
                *kind = ColumnKind::Text;
            }
        }
    }
    columns
}

/// Write the attribute table of `features` (geometry dropped): `id` first,
/// then every attribute column in name order. Absent values are null.
pub(crate) fn write_features(features: &[GridFeature], path: &Path) -> Result<()> {
    let mut columns = vec![
        Series::new("id".into(), features.iter().map(|f| f.id.to_string()).collect::<Vec<_>>()),
    ];
    for (name, kind) in attribute_columns(features) {
        let values = features.iter().map(|f| f.attributes.get(&name));
        let series = match kind {
            ColumnKind::Number => Series::new(
                name.as_str().into(),
                values.map(|v| match v {
                    Some(AttributeValue::Number(x)) => Some(*x),
                    _ => None,
                }).collect::<Vec<_>>(),
            ),
            ColumnKind::Text => Series::new(
                name.as_str().into(),
                values.map(|v| match v {
                    Some(AttributeValue::Text(s)) => Some(s.clone()),
                    Some(AttributeValue::Number(x)) => Some(x.to_string()),
                    _ => None,
                }).collect::<Vec<_>>(),
            ),
        };
        columns.push(series);
    }
    let mut df = frame(columns)?;
    write_csv(&mut df, path)
}
