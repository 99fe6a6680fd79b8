use ahash::AHashMap;
use geo::Coord;
use rstar::{RTree, AABB};

use crate::geom::BoundingBox;
use super::{GridCell, GridId};

/// Return the first cell, in slice order, that strictly contains `point`.
///
/// A point lying exactly on a cell boundary matches no cell, so buildings on
/// grid lines are dropped. `None` means "unassigned", not an error.
pub fn assign(point: Coord<f64>, cells: &[GridCell]) -> Option<&GridId> {
    cells.iter().find(|cell| cell.contains(point)).map(|cell| &cell.id)
}

/// Grid cells in file order with an R-tree over their geographic envelopes.
#[derive(Debug, Clone)]
pub struct GridIndex {
    cells: Vec<GridCell>,
    rtree: RTree<BoundingBox>,
    lookup: AHashMap<GridId, usize>,
}

impl GridIndex {
    pub fn new(cells: Vec<GridCell>) -> Self {
        let mut lookup = AHashMap::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            lookup.entry(cell.id.clone()).or_insert(i);
        }
        Self {
            rtree: RTree::bulk_load(
                cells.iter().enumerate()
                    .map(|(i, cell)| BoundingBox::new(i, cell.geo_rect()))
                    .collect()
            ),
            cells,
            lookup,
        }
    }

    #[inline] pub fn len(&self) -> usize { self.cells.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    #[inline] pub fn cells(&self) -> &[GridCell] { &self.cells }

    /// Look up a cell by id (first occurrence wins for duplicated ids).
    pub fn get(&self, id: &GridId) -> Option<&GridCell> {
        self.lookup.get(id).map(|&i| &self.cells[i])
    }

    /// Same result as [`assign`] over `cells()`, using the R-tree to narrow
    /// the candidates before picking the lowest ordinal.
    pub fn assign(&self, point: Coord<f64>) -> Option<&GridCell> {
        let envelope = AABB::from_point([point.x, point.y]);
        self.rtree.locate_in_envelope_intersecting(&envelope)
            .map(|bbox| bbox.idx())
            .filter(|&i| self.cells[i].contains(point))
            .min()
            .map(|i| &self.cells[i])
    }
}
