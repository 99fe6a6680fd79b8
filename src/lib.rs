#![doc = "Grid-level population estimation and supermarket accessibility density"]
mod access;
mod buildings;
mod common;
mod error;
mod geom;
mod grid;
mod io;
mod merge;
mod places;
mod population;

pub mod config;
pub mod logging;
pub mod pipeline;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use geom::{polygon_area, project, ring_center, CoordinateProjector, EARTH_RADIUS_M};

#[doc(inline)]
pub use grid::{assign, DistrictId, GridCell, GridId, GridIndex};

#[doc(inline)]
pub use buildings::{preprocess, Building, BuildingFootprint, PreprocessStats};

#[doc(inline)]
pub use population::{
    aggregate_by_district, aggregate_by_grid, Allocation, AssignmentStats, DistrictPopulation,
    FloorArea, GridPopulation, PopulationAllocator,
};

#[doc(inline)]
pub use access::{
    count_reachable, density, AccessibilityCounter, DensityCalculator, DensityResult,
    DistanceResponse, MatrixElement, MatrixRow, Measure, RawId, SupermarketCounts,
    SupermarketDistanceRecord,
};

#[doc(inline)]
pub use merge::{merge, AttributeValue, GridFeature, MergeStats};

#[doc(inline)]
pub use places::{select_supermarkets, LatLng, PlaceGeometry, PlaceResult, PlacesStats, Supermarket};
