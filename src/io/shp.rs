//! Shapefile reading and writing.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use shapefile::{
    dbase::{FieldName, FieldValue, Record, TableWriterBuilder},
    Reader, Shape, Writer,
};
use tracing::warn;

use crate::{
    buildings::BuildingFootprint,
    common::{ensure_parent_dir, first_outer_ring, geo_to_shp, shp_to_geo},
    error::Error,
    grid::GridId,
    io::csv::{attribute_columns, ColumnKind},
    merge::{AttributeValue, GridFeature},
};

/// Reads all shapes + attribute records from a given `.shp` file path.
pub(crate) fn read_shapefile(path: &Path) -> Result<Vec<(Shape, Record)>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[io::shp] Failed to open shapefile: {}", path.display()))?;

    let mut items = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result
            .with_context(|| format!("[io::shp] Error reading shape+record from {}", path.display()))?;
        items.push((shape, record));
    }
    Ok(items)
}

fn number_text(value: f64) -> String {
    GridId::from_number(value).to_string()
}

fn attribute(value: FieldValue) -> AttributeValue {
    match value {
        FieldValue::Character(Some(s)) => AttributeValue::Text(s.trim().to_string()),
        FieldValue::Memo(s) => AttributeValue::Text(s),
        FieldValue::Logical(Some(b)) => AttributeValue::Text(b.to_string()),
        FieldValue::Numeric(Some(x)) => AttributeValue::Number(x),
        FieldValue::Float(Some(x)) => AttributeValue::Number(f64::from(x)),
        FieldValue::Integer(x) => AttributeValue::Number(f64::from(x)),
        FieldValue::Double(x) | FieldValue::Currency(x) => AttributeValue::Number(x),
        _ => AttributeValue::Null,
    }
}

fn text(value: Option<FieldValue>) -> Option<String> {
    match attribute(value?) {
        AttributeValue::Text(s) if s.is_empty() => None,
        AttributeValue::Text(s) => Some(s),
        AttributeValue::Number(x) => Some(number_text(x)),
        AttributeValue::Null => None,
    }
}

/// Read a grid shapefile: every record becomes a feature keyed by its `id`
/// field, with the remaining fields as attributes.
pub(crate) fn read_grid_features(path: &Path) -> Result<Vec<GridFeature>> {
    read_shapefile(path)?
        .into_iter()
        .map(|(shape, mut record)| -> Result<GridFeature> {
            let id = text(record.remove("id")).ok_or_else(|| Error::malformed(path, "id"))?;
            let geometry = match shape {
                Shape::Polygon(polygon) => Some(shp_to_geo(&polygon)),
                Shape::NullShape => None,
                other => bail!("[io::shp] Unsupported shape type {:?} in {}", other.shapetype(), path.display()),
            };
            let attributes = record.into_iter()
                .map(|(name, value)| (name, attribute(value)))
                .collect();
            Ok(GridFeature { id: GridId::new(id), attributes, geometry })
        })
        .collect()
}

/// Read building footprints (`osm_id`, `type`, optional `name`); the first
/// outer ring of each polygon is the footprint.
pub(crate) fn read_building_footprints(path: &Path) -> Result<Vec<BuildingFootprint>> {
    read_shapefile(path)?
        .into_iter()
        .map(|(shape, mut record)| -> Result<BuildingFootprint> {
            if record.get("type").is_none() {
                return Err(Error::malformed(path, "type").into());
            }
            let ring = match &shape {
                Shape::Polygon(polygon) => first_outer_ring(polygon).unwrap_or_default(),
                Shape::NullShape => Vec::new(),
                other => bail!("[io::shp] Unsupported shape type {:?} in {}", other.shapetype(), path.display()),
            };
            Ok(BuildingFootprint {
                osm_id: text(record.remove("osm_id")),
                name: text(record.remove("name")),
                ty: text(record.remove("type")).unwrap_or_default(),
                ring,
            })
        })
        .collect()
}

fn field_name(name: &str) -> Result<FieldName> {
    FieldName::try_from(name).map_err(|err| anyhow!("[io::shp] Invalid field name {name:?}: {err:?}"))
}

/// Write `features` as a polygon shapefile with `id` plus every attribute
/// column. Features without geometry cannot be represented and are skipped.
///
/// Returns the number of features written.
pub(crate) fn write_grid_features(features: &[GridFeature], path: &Path) -> Result<usize> {
    ensure_parent_dir(path)?;
    let columns = attribute_columns(features);

    let mut builder = TableWriterBuilder::new().add_character_field(field_name("id")?, 32);
    for (name, kind) in &columns {
        builder = match kind {
            ColumnKind::Number => builder.add_numeric_field(field_name(name)?, 20, 6),
            ColumnKind::Text => builder.add_character_field(field_name(name)?, 254),
        };
    }
    let mut writer = Writer::from_path(path, builder)
        .with_context(|| format!("[io::shp] Failed to create shapefile: {}", path.display()))?;

    let mut written = 0;
    for feature in features {
        let Some(geometry) = &feature.geometry else { continue };

        let mut record = Record::default();
        record.insert("id".to_string(), FieldValue::Character(Some(feature.id.to_string())));
        for (name, kind) in &columns {
            let value = feature.attributes.get(name);
            let field = match (kind, value) {
                (ColumnKind::Number, Some(AttributeValue::Number(x))) => FieldValue::Numeric(Some(*x)),
                (ColumnKind::Number, _) => FieldValue::Numeric(None),
                (ColumnKind::Text, Some(AttributeValue::Text(s))) => FieldValue::Character(Some(s.clone())),
                (ColumnKind::Text, Some(AttributeValue::Number(x))) => FieldValue::Character(Some(number_text(*x))),
                (ColumnKind::Text, _) => FieldValue::Character(None),
            };
            record.insert(name.clone(), field);
        }

        writer.write_shape_and_record(&geo_to_shp(geometry), &record)
            .with_context(|| format!("[io::shp] Failed to write grid {} to {}", feature.id, path.display()))?;
        written += 1;
    }

    let skipped = features.len() - written;
    if skipped > 0 {
        warn!("{} feature(s) without geometry left out of {}", skipped, path.display());
    }
    Ok(written)
}
