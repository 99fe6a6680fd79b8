mod cell;
mod index;

pub use cell::{DistrictId, GridCell, GridId};
pub use index::{assign, GridIndex};
