use alloc::collections::btree_map::Entry;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Pressure of every conducting cell on a board. Cells that block conduction have no entry and read as zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PressureField {
    values: Array2<Option<Pressure>>,
    /// `(horizontal, vertical)` lane pressures, bridges only.
    lanes: Array2<Option<(Pressure, Pressure)>>,
    component_count: usize,
}

impl PressureField {
    /// A field with no entries, as seen on a board with no conducting cells.
    pub fn empty((width, height): Coord2) -> Self {
        let dim = [width.max(1) as usize, height.max(1) as usize];
        Self {
            values: Array2::from_elem(dim, None),
            lanes: Array2::from_elem(dim, None),
            component_count: 0,
        }
    }

    fn index_of(&self, (x, y): Coord2) -> Option<[usize; 2]> {
        let (width, height) = self.values.dim();
        let x = usize::try_from(x).ok().filter(|&x| x < width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < height)?;
        Some([x, y])
    }

    /// The computed value at `coords`, `None` for cells that take no part in conduction.
    pub fn value(&self, coords: Coord2) -> Option<Pressure> {
        self.index_of(coords).and_then(|index| self.values[index])
    }

    pub fn get(&self, coords: Coord2) -> Pressure {
        self.value(coords).unwrap_or(0)
    }

    /// `(horizontal, vertical)` lane pressures when `coords` holds a bridge.
    pub fn lanes(&self, coords: Coord2) -> Option<(Pressure, Pressure)> {
        self.index_of(coords).and_then(|index| self.lanes[index])
    }

    /// Pressure the cell presents to a neighbour connected along `axis`.
    pub fn along(&self, coords: Coord2, axis: Axis) -> Pressure {
        match (self.lanes(coords), axis) {
            (Some((horizontal, _)), Axis::Horizontal) => horizontal,
            (Some((_, vertical)), Axis::Vertical) => vertical,
            (None, _) => self.get(coords),
        }
    }

    /// Number of connected components found, lanes of a bridge counting separately.
    pub fn component_count(&self) -> usize {
        self.component_count
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Pressure)> + '_ {
        self.values
            .indexed_iter()
            .filter_map(|((x, y), value)| value.map(|value| ((x as Coord, y as Coord), value)))
    }
}

/// A conduction node. Open cells are a single node, bridges carry one node per axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Lane {
    Whole,
    Along(Axis),
}

impl Lane {
    const fn slot(self) -> usize {
        match self {
            Self::Whole | Self::Along(Axis::Horizontal) => 0,
            Self::Along(Axis::Vertical) => 1,
        }
    }

    const fn connects(self, axis: Axis) -> bool {
        match self {
            Self::Whole => true,
            Self::Along(lane_axis) => matches!(
                (lane_axis, axis),
                (Axis::Horizontal, Axis::Horizontal) | (Axis::Vertical, Axis::Vertical)
            ),
        }
    }

    fn nodes_of(cell: CellType) -> &'static [Lane] {
        match cell {
            CellType::Bridge => &[Lane::Along(Axis::Horizontal), Lane::Along(Axis::Vertical)],
            cell if cell.conducts() => &[Lane::Whole],
            _ => &[],
        }
    }

    /// The node a cell offers to a connection arriving along `axis`.
    fn entered_along(cell: CellType, axis: Axis) -> Option<Lane> {
        match cell {
            CellType::Bridge => Some(Lane::Along(axis)),
            cell if cell.conducts() => Some(Lane::Whole),
            _ => None,
        }
    }
}

const fn nd((x, y): Coord2) -> [usize; 2] {
    [x as usize, y as usize]
}

/// Derives the pressure field of a board.
///
/// Conducting nodes are flood-filled into 4-connected components, each node visited once. Every node of a component
/// gets `sign(positive - negative)` where the counts are the source cells inside it. A bridge reports the sign of the
/// sum of its two lanes. Component ids are keyed by node, so the fill only touches cells that conduct.
pub fn compute(grid: &Grid) -> PressureField {
    let mut component: BTreeMap<(Coord2, usize), usize> = BTreeMap::new();
    let mut totals: Vec<Pressure> = Vec::new();
    let mut to_visit = VecDeque::new();

    for (start, cell) in grid.iter() {
        for &lane in Lane::nodes_of(cell) {
            let Entry::Vacant(entry) = component.entry((start, lane.slot())) else {
                continue;
            };

            let id = totals.len();
            entry.insert(id);
            to_visit.push_back((start, lane));

            let (mut positive, mut negative) = (0i64, 0i64);
            while let Some((coords, lane)) = to_visit.pop_front() {
                match grid.get(coords).source() {
                    1 => positive += 1,
                    -1 => negative += 1,
                    _ => {}
                }

                for (next, axis) in grid.iter_neighbors(coords) {
                    if !lane.connects(axis) {
                        continue;
                    }
                    let Some(next_lane) = Lane::entered_along(grid.get(next), axis) else {
                        continue;
                    };
                    if let Entry::Vacant(entry) = component.entry((next, next_lane.slot())) {
                        entry.insert(id);
                        to_visit.push_back((next, next_lane));
                    }
                }
            }

            totals.push(sign(positive - negative));
        }
    }

    let mut field = PressureField::empty(grid.bounds());
    field.component_count = totals.len();
    let total_of = |node: (Coord2, usize)| {
        component
            .get(&node)
            .and_then(|&id| totals.get(id).copied())
            .unwrap_or(0)
    };

    for &(coords, slot) in component.keys() {
        if slot != 0 {
            continue;
        }
        match grid.get(coords) {
            CellType::Bridge => {
                let (horizontal, vertical) = (total_of((coords, 0)), total_of((coords, 1)));
                field.lanes[nd(coords)] = Some((horizontal, vertical));
                field.values[nd(coords)] = Some(sign(i64::from(horizontal) + i64::from(vertical)));
            }
            _ => field.values[nd(coords)] = Some(total_of((coords, 0))),
        }
    }

    log::trace!("pressure field: {} component(s)", field.component_count);
    field
}
