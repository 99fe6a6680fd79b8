//! Format-specific reading and writing.
//!
//! - `csv` - tabular grid, building, population and result files
//! - `json` - raw distance-matrix and place-search responses
//! - `shp` - grid and building shapefiles

pub(crate) mod csv;
pub(crate) mod json;
pub(crate) mod shp;
