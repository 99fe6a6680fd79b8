use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile as shp;

/// Twice the signed area of a closed ring (positive when counter-clockwise).
fn signed_area2(points: impl Iterator<Item = (f64, f64)> + Clone) -> f64 {
    points.clone()
        .zip(points.skip(1))
        .map(|((x0, y0), (x1, y1))| x0 * y1 - x1 * y0)
        .sum()
}

fn closed(mut coords: Vec<Coord<f64>>) -> Vec<Coord<f64>> {
    if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
        if first != last { coords.push(first) }
    }
    coords
}

fn ring_coords(points: &[shp::Point]) -> Vec<Coord<f64>> {
    points.iter().map(|p| Coord { x: p.x, y: p.y }).collect()
}

/// Convert a shapefile polygon to a multipolygon, attaching each inner ring
/// to the outer ring that precedes it.
pub(crate) fn shp_to_geo(polygon: &shp::Polygon) -> MultiPolygon<f64> {
    let mut polygons = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes = Vec::new();

    for ring in polygon.rings() {
        let line = LineString(closed(ring_coords(ring.points())));
        match ring {
            shp::PolygonRing::Outer(_) => {
                if let Some(previous) = exterior.replace(line) {
                    polygons.push(Polygon::new(previous, std::mem::take(&mut holes)));
                }
            }
            shp::PolygonRing::Inner(_) => holes.push(line),
        }
    }
    if let Some(last) = exterior {
        polygons.push(Polygon::new(last, holes));
    }
    MultiPolygon(polygons)
}

/// First outer ring of a shapefile polygon, as written in the file.
pub(crate) fn first_outer_ring(polygon: &shp::Polygon) -> Option<Vec<Coord<f64>>> {
    polygon.rings().iter().find_map(|ring| match ring {
        shp::PolygonRing::Outer(points) => Some(ring_coords(points)),
        shp::PolygonRing::Inner(_) => None,
    })
}

/// Convert a multipolygon to a shapefile polygon: outer rings clockwise,
/// holes counter-clockwise.
pub(crate) fn geo_to_shp(multi: &MultiPolygon<f64>) -> shp::Polygon {
    fn oriented(line: &LineString<f64>, clockwise: bool) -> Vec<shp::Point> {
        let coords = closed(line.0.clone());
        let mut points = coords.iter().map(|c| shp::Point { x: c.x, y: c.y }).collect::<Vec<_>>();
        let area2 = signed_area2(coords.iter().map(|c| (c.x, c.y)));
        if (clockwise && area2 > 0.0) || (!clockwise && area2 < 0.0) {
            points.reverse();
        }
        points
    }

    let mut rings = Vec::new();
    for polygon in &multi.0 {
        rings.push(shp::PolygonRing::Outer(oriented(polygon.exterior(), true)));
        for hole in polygon.interiors() {
            rings.push(shp::PolygonRing::Inner(oriented(hole, false)));
        }
    }
    shp::Polygon::with_rings(rings)
}
