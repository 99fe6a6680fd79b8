//! Join computed per-grid scalars back onto grid geometry records.

use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap;
use geo::{LineString, MultiPolygon, Polygon};
use tracing::{debug, info};

use crate::grid::{GridCell, GridId};

/// A single attribute value carried by a grid feature.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Number(f64),
    Null,
}

/// A grid cell record with its attribute table row and polygon geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GridFeature {
    pub id: GridId,
    /// Attribute columns other than `id`, keyed by column name.
    pub attributes: BTreeMap<String, AttributeValue>,
    /// `None` for rows created by the join that have no source geometry.
    pub geometry: Option<MultiPolygon<f64>>,
}

impl GridFeature {
    /// Feature for a grid cell taken from the tabular grid file: projected
    /// bounds as attributes and the projected rectangle as geometry.
    pub fn from_cell(cell: &GridCell) -> Self {
        let mut attributes = BTreeMap::from([
            ("left".to_string(), AttributeValue::Number(cell.left)),
            ("right".to_string(), AttributeValue::Number(cell.right)),
            ("top".to_string(), AttributeValue::Number(cell.top)),
            ("bottom".to_string(), AttributeValue::Number(cell.bottom)),
        ]);
        if let Some(district) = &cell.district {
            attributes.insert("district".into(), AttributeValue::Text(district.to_string()));
        }

        let ring = LineString::from(vec![
            (cell.left, cell.bottom),
            (cell.left, cell.top),
            (cell.right, cell.top),
            (cell.right, cell.bottom),
            (cell.left, cell.bottom),
        ]);
        Self {
            id: cell.id.clone(),
            attributes,
            geometry: Some(MultiPolygon(vec![Polygon::new(ring, vec![])])),
        }
    }

    /// Numeric value of an attribute, if present.
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.attributes.get(field)? {
            AttributeValue::Number(x) => Some(*x),
            _ => None,
        }
    }
}

/// Counters for [`merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Geometry records that found a value.
    pub matched: usize,
    /// Geometry records filled with zero.
    pub filled: usize,
    /// Values with no geometry record, appended without geometry.
    pub unmatched_values: usize,
}

/// Outer join of `values` onto `features` by grid id, writing each value into
/// the `field` attribute.
///
/// Every feature is kept, in order; those with no value get `0`. Values whose
/// id has no feature are appended as geometry-less features, sorted by id.
pub fn merge(
    features: Vec<GridFeature>,
    field: &str,
    values: &AHashMap<GridId, f64>,
) -> (Vec<GridFeature>, MergeStats) {
    let mut stats = MergeStats::default();
    let mut seen = BTreeSet::new();

    let mut merged = features.into_iter()
        .map(|mut feature| {
            let value = match values.get(&feature.id) {
                Some(&value) => {
                    stats.matched += 1;
                    value
                }
                None => {
                    stats.filled += 1;
                    0.0
                }
            };
            seen.insert(feature.id.clone());
            feature.attributes.insert(field.to_string(), AttributeValue::Number(value));
            feature
        })
        .collect::<Vec<_>>();

    let mut orphans = values.iter()
        .filter(|(id, _)| !seen.contains(*id))
        .collect::<Vec<_>>();
    orphans.sort_by(|a, b| a.0.cmp(b.0));
    for (id, &value) in orphans {
        debug!(grid = %id, "value has no geometry record");
        stats.unmatched_values += 1;
        merged.push(GridFeature {
            id: id.clone(),
            attributes: BTreeMap::from([(field.to_string(), AttributeValue::Number(value))]),
            geometry: None,
        });
    }

    info!(
        field,
        matched = stats.matched,
        filled = stats.filled,
        unmatched_values = stats.unmatched_values,
        "merged values onto grid geometry"
    );
    (merged, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(id: &str) -> GridFeature {
        GridFeature::from_cell(&GridCell::from_geographic(id.into(), None, [0.0, 1.0, 1.0, 0.0]))
    }

    #[test]
    fn keeps_every_geometry_and_fills_zero() {
        let values = AHashMap::from_iter([(GridId::new("1"), 10.0), (GridId::new("3"), 2.5)]);
        let (merged, stats) = merge(vec![feature("1"), feature("2"), feature("3")], "population", &values);

        assert_eq!(stats, MergeStats { matched: 2, filled: 1, unmatched_values: 0 });
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.iter().map(|f| f.id.id()).collect::<Vec<_>>(), ["1", "2", "3"]);
        assert_eq!(merged[0].number("population"), Some(10.0));
        assert_eq!(merged[1].number("population"), Some(0.0));
        assert_eq!(merged[2].number("population"), Some(2.5));
        assert!(merged.iter().all(|f| f.geometry.is_some()));
        assert_eq!(merged[0].number("left"), Some(0.0));
    }

    #[test]
    fn values_without_geometry_are_appended() {
        let values = AHashMap::from_iter([(GridId::new("9"), 4.0), (GridId::new("8"), 1.0)]);
        let (merged, stats) = merge(vec![feature("1")], "density", &values);

        assert_eq!(stats, MergeStats { matched: 0, filled: 1, unmatched_values: 2 });
        assert_eq!(merged.iter().map(|f| f.id.id()).collect::<Vec<_>>(), ["1", "8", "9"]);
        assert!(merged[1].geometry.is_none());
        assert_eq!(merged[2].number("density"), Some(4.0));
    }

    #[test]
    fn empty_values_fill_everything() {
        let (merged, stats) = merge(vec![feature("1"), feature("2")], "density", &AHashMap::new());
        assert_eq!(stats.filled, 2);
        assert!(merged.iter().all(|f| f.number("density") == Some(0.0)));
    }
}
