#![no_std]

extern crate alloc;

use core::fmt;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use pneumatic_protocol::{LetterDefinition, PuzzleDefinition};

pub use cell::*;
pub use error::*;
pub use loader::*;
pub use port::*;
pub use pressure::*;
pub use session::*;
pub use stepper::*;
pub use store::*;
pub use types::*;

mod cell;
mod error;
mod loader;
mod port;
mod pressure;
mod session;
mod stepper;
mod store;
mod types;

/// Board contents within fixed bounds. Coordinates with no cell, and anything outside the bounds, read as
/// [`CellType::Solid`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Option<CellType>>,
}

impl Grid {
    /// Creates a board with nothing on it. Dimensions below one are raised to one.
    pub fn new((width, height): Coord2) -> Self {
        let width = width.max(1) as usize;
        let height = height.max(1) as usize;
        Self {
            cells: Array2::from_elem([width, height], None),
        }
    }

    /// Builds a board from glyph rows (see [`CellType::glyph`]); `' '` and `'.'` leave the cell undefined.
    pub fn from_glyph_rows(rows: &[&str]) -> Option<Self> {
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new((width as Coord, rows.len() as Coord));

        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                if matches!(glyph, ' ' | '.') {
                    continue;
                }
                grid.set((x as Coord, y as Coord), CellType::from_glyph(glyph)?);
            }
        }

        Some(grid)
    }

    pub fn bounds(&self) -> Coord2 {
        let (width, height) = self.cells.dim();
        (width as Coord, height as Coord)
    }

    pub fn contains(&self, (x, y): Coord2) -> bool {
        let (width, height) = self.bounds();
        (0..width).contains(&x) && (0..height).contains(&y)
    }

    fn index_of(&self, coords: Coord2) -> Option<[usize; 2]> {
        self.contains(coords)
            .then(|| [coords.0 as usize, coords.1 as usize])
    }

    /// The explicitly defined cell at `coords`, if any.
    pub fn cell(&self, coords: Coord2) -> Option<CellType> {
        self.index_of(coords).and_then(|index| self.cells[index])
    }

    pub fn get(&self, coords: Coord2) -> CellType {
        self.cell(coords).unwrap_or(CellType::Solid)
    }

    /// Writes a cell without any protection checks. Out of bounds writes are dropped.
    pub fn set(&mut self, coords: Coord2, cell: CellType) -> EditOutcome {
        let Some(index) = self.index_of(coords) else {
            return EditOutcome::NoChange;
        };

        if self.cells[index] == Some(cell) {
            EditOutcome::NoChange
        } else {
            self.cells[index] = Some(cell);
            EditOutcome::Changed
        }
    }

    /// Every defined cell, in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, CellType)> + '_ {
        self.cells
            .indexed_iter()
            .filter_map(|((x, y), cell)| cell.map(|cell| ((x as Coord, y as Coord), cell)))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.bounds())
    }
}

impl Index<Coord2> for Grid {
    type Output = CellType;

    fn index(&self, coords: Coord2) -> &Self::Output {
        match self.index_of(coords) {
            Some(index) => self.cells[index].as_ref().unwrap_or(&CellType::Solid),
            None => &CellType::Solid,
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.bounds();
        for y in 0..height {
            for x in 0..width {
                let glyph = self.cell((x, y)).map_or(' ', CellType::glyph);
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    NoChange,
    Changed,
}

impl EditOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    NoChange,
    Ticked,
    Passed,
    Failed,
}

impl StepOutcome {
    pub const fn has_update(self) -> bool {
        use StepOutcome::*;
        match self {
            NoChange => false,
            Ticked => true,
            Passed => true,
            Failed => true,
        }
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}
