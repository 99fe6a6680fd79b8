//! Residential building records and footprint preprocessing.

use geo::Coord;
use tracing::{debug, warn};

use crate::{config::BuildingFilter, geom};

/// A raw footprint as read from a building shapefile.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingFootprint {
    pub osm_id: Option<String>,
    pub name: Option<String>,
    pub ty: String,
    /// Exterior ring as `(lng, lat)` vertices.
    pub ring: Vec<Coord<f64>>,
}

/// A residential building reduced to its center point and floor area.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub id: String,
    pub osm_id: Option<String>,
    pub name: Option<String>,
    pub ty: String,
    pub center: Coord<f64>,
    /// Floor area in square meters.
    pub area: f64,
}

impl Building {
    /// Whether this building counts as a bungalow under `bungalow_type`.
    #[inline]
    pub fn is_bungalow(&self, bungalow_type: &str) -> bool {
        self.ty == bungalow_type
    }
}

/// Counters for [`preprocess`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessStats {
    pub read: usize,
    pub non_residential: usize,
    pub outside_study_area: usize,
    pub degenerate: usize,
    pub kept: usize,
}

/// Reduce raw footprints to residential buildings inside the study area.
///
/// Kept buildings get sequential ids in input order. Footprints with an
/// empty ring or fewer than three vertices are skipped and counted.
pub fn preprocess(
    footprints: impl IntoIterator<Item = BuildingFootprint>,
    filter: &BuildingFilter,
) -> (Vec<Building>, PreprocessStats) {
    let mut stats = PreprocessStats::default();
    let mut buildings = Vec::new();

    for footprint in footprints {
        stats.read += 1;
        if !filter.residential_types.iter().any(|ty| *ty == footprint.ty) {
            stats.non_residential += 1;
            continue;
        }

        let Some(center) = geom::ring_center(&footprint.ring) else {
            stats.degenerate += 1;
            continue;
        };

        if let Some(area) = &filter.study_area {
            if !area.contains(center.x, center.y) {
                stats.outside_study_area += 1;
                continue;
            }
        }

        let area = match geom::polygon_area(&footprint.ring) {
            Ok(area) => area,
            Err(err) => {
                debug!(osm_id = ?footprint.osm_id, %err, "skipping footprint");
                stats.degenerate += 1;
                continue;
            }
        };

        buildings.push(Building {
            id: buildings.len().to_string(),
            osm_id: footprint.osm_id,
            name: footprint.name,
            ty: footprint.ty,
            center,
            area,
        });
    }

    stats.kept = buildings.len();
    if stats.degenerate > 0 {
        warn!("{} footprint(s) skipped as degenerate geometry", stats.degenerate);
    }
    (buildings, stats)
}
