use std::{fmt, sync::Arc};

use geo::{Coord, Rect};

use crate::{error::Result, geom::CoordinateProjector};

/// District identifier, shared between grid cells and aggregates.
pub type DistrictId = Arc<str>;

/// Stable key for a grid cell.
///
/// Ids arrive as integers in some files and as text in others, so they are
/// normalized to their textual form (`12.0` and `"12"` are the same cell).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridId(Arc<str>);

impl GridId {
    pub fn new(id: impl AsRef<str>) -> Self {
        let id = id.as_ref().trim();
        let id = match id.strip_suffix(".0") {
            Some(int) if is_integer(int) => int,
            _ => id,
        };
        Self(Arc::from(id))
    }

    /// Build an id from a numeric value, dropping a zero fractional part.
    pub fn from_number(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < 1e15 {
            Self::new(format!("{}", value as i64))
        } else {
            Self::new(value.to_string())
        }
    }

    #[inline] pub fn id(&self) -> &str { &self.0 }
}

fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GridId {
    fn from(id: &str) -> Self { Self::new(id) }
}

/// One rectangular cell of the study grid.
///
/// `left/right/top/bottom` are in projected units; the `*_lng/*_lat` fields
/// are the same corners in geographic degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub id: GridId,
    pub district: Option<DistrictId>,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub left_lng: f64,
    pub right_lng: f64,
    pub top_lat: f64,
    pub bottom_lat: f64,
}

impl GridCell {
    /// Build a cell from projected boundaries, deriving geographic ones from
    /// the (left, top) and (right, bottom) corners.
    pub fn from_projected(
        id: GridId,
        district: Option<DistrictId>,
        [left, right, top, bottom]: [f64; 4],
        projector: &CoordinateProjector,
    ) -> Result<Self> {
        let (left_lng, top_lat) = projector.project(left, top)?;
        let (right_lng, bottom_lat) = projector.project(right, bottom)?;
        Ok(Self { id, district, left, right, top, bottom, left_lng, right_lng, top_lat, bottom_lat })
    }

    /// Build a cell whose boundaries are already geographic.
    pub fn from_geographic(
        id: GridId,
        district: Option<DistrictId>,
        [left_lng, right_lng, top_lat, bottom_lat]: [f64; 4],
    ) -> Self {
        Self {
            id, district,
            left: left_lng, right: right_lng, top: top_lat, bottom: bottom_lat,
            left_lng, right_lng, top_lat, bottom_lat,
        }
    }

    /// Whether the projected and geographic boundaries both form a proper rectangle.
    pub fn is_proper(&self) -> bool {
        self.left < self.right && self.bottom < self.top
            && self.left_lng < self.right_lng && self.bottom_lat < self.top_lat
    }

    #[inline] pub fn center_lng(&self) -> f64 { (self.left_lng + self.right_lng) / 2.0 }

    #[inline] pub fn center_lat(&self) -> f64 { (self.top_lat + self.bottom_lat) / 2.0 }

    /// Strict containment: a point on any edge is outside.
    #[inline]
    pub fn contains(&self, point: Coord<f64>) -> bool {
        point.x > self.left_lng && point.x < self.right_lng
            && point.y > self.bottom_lat && point.y < self.top_lat
    }

    /// Geographic envelope of the cell.
    pub fn geo_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord { x: self.left_lng, y: self.bottom_lat },
            Coord { x: self.right_lng, y: self.top_lat },
        )
    }
}
