mod area;
mod bbox;
mod proj;

pub use area::{polygon_area, ring_center, EARTH_RADIUS_M};
pub(crate) use bbox::BoundingBox;
pub use proj::{project, CoordinateProjector};
