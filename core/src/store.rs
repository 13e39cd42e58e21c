use alloc::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// The live board together with the coordinates the player is not allowed to touch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridStore {
    grid: Grid,
    protected: BTreeSet<Coord2>,
}

impl GridStore {
    pub fn new(grid: Grid, protected: BTreeSet<Coord2>) -> Self {
        Self { grid, protected }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn bounds(&self) -> Coord2 {
        self.grid.bounds()
    }

    pub fn get(&self, coords: Coord2) -> CellType {
        self.grid.get(coords)
    }

    pub fn is_protected(&self, coords: Coord2) -> bool {
        self.protected.contains(&coords)
    }

    pub fn protected(&self) -> &BTreeSet<Coord2> {
        &self.protected
    }

    /// Player write. Protected and out of bounds coordinates are left alone.
    pub fn set(&mut self, coords: Coord2, cell: CellType) -> EditOutcome {
        if self.is_protected(coords) {
            log::trace!("ignoring write to protected cell {coords:?}");
            return EditOutcome::NoChange;
        }
        self.grid.set(coords, cell)
    }

    /// Swaps in a whole new board, keeping the protected set.
    pub fn replace(&mut self, grid: Grid) {
        self.grid = grid;
    }

    /// System write that ignores protection, used to drive input ports.
    pub(crate) fn force(&mut self, coords: Coord2, cell: CellType) -> EditOutcome {
        self.grid.set(coords, cell)
    }
}
