use geo::Coord;

use crate::error::{Error, Result};

/// Earth radius in meters used for the spherical-to-Cartesian conversion.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Map a geographic vertex (degrees) onto the equatorial plane of a sphere
/// with radius [`EARTH_RADIUS_M`]:
/// `x = R cos(lat) cos(lng)`, `y = R cos(lat) sin(lng)`.
#[inline]
fn to_cartesian(coord: &Coord<f64>) -> (f64, f64) {
    let (lng, lat) = (coord.x.to_radians(), coord.y.to_radians());
    (EARTH_RADIUS_M * lat.cos() * lng.cos(), EARTH_RADIUS_M * lat.cos() * lng.sin())
}

/// Drop a trailing vertex that repeats the first one.
#[inline]
pub(crate) fn open_ring(ring: &[Coord<f64>]) -> &[Coord<f64>] {
    match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// Floor area of a footprint ring in square meters.
///
/// `ring` is an ordered sequence of `(lng, lat)` vertices, implicitly closed
/// (an explicit closing vertex is accepted and ignored). Each vertex is
/// converted with [`to_cartesian`] and the planar shoelace formula is applied;
/// the result is the absolute value so ring orientation does not matter.
///
/// The conversion is a spherical approximation, not an ellipsoidal or geodesic
/// one. It is only meaningful for city-block sized rings and degrades as the
/// ring grows.
///
/// Fails with `DegenerateGeometry` when fewer than three vertices remain.
pub fn polygon_area(ring: &[Coord<f64>]) -> Result<f64> {
    let ring = open_ring(ring);
    if ring.len() < 3 {
        return Err(Error::DegenerateGeometry { points: ring.len() });
    }

    let points = ring.iter().map(to_cartesian).collect::<Vec<_>>();
    let twice_signed = points.iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.0 * b.1 - b.0 * a.1)
        .sum::<f64>();

    Ok((twice_signed / 2.0).abs())
}

/// Mean of the ring's vertices, ignoring a closing duplicate.
pub fn ring_center(ring: &[Coord<f64>]) -> Option<Coord<f64>> {
    let ring = open_ring(ring);
    if ring.is_empty() {
        return None;
    }
    let n = ring.len() as f64;
    let (sx, sy) = ring.iter().fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));
    Some(Coord { x: sx / n, y: sy / n })
}
