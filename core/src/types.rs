use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = i32;

/// Two-dimensional coordinates `(x, y)`, `x` growing right and `y` growing down.
pub type Coord2 = (Coord, Coord);

/// Signed pressure, always one of `-1`, `0`, `+1`.
pub type Pressure = i8;

/// Expected pressure at one tick, `None` meaning "don't care".
pub type Signal = Option<Pressure>;

/// Port label, the letter the port was drawn with.
pub type Label = char;

/// Collapses any count difference into `-1`, `0` or `+1`.
pub const fn sign(value: i64) -> Pressure {
    if value > 0 {
        1
    } else if value < 0 {
        -1
    } else {
        0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// The two cells adjacent to `coords` along this axis, lower coordinate first.
    pub const fn neighbors(self, (x, y): Coord2) -> [Coord2; 2] {
        match self {
            Self::Horizontal => [(x - 1, y), (x + 1, y)],
            Self::Vertical => [(x, y - 1), (x, y + 1)],
        }
    }
}

const DISPLACEMENTS: [(Coord, Coord, Axis); 4] = [
    (0, -1, Axis::Vertical),
    (-1, 0, Axis::Horizontal),
    (1, 0, Axis::Horizontal),
    (0, 1, Axis::Vertical),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (Coord, Coord), bounds: Coord2) -> Option<Coord2> {
    let next_x = coords.0.checked_add(delta.0)?;
    let next_y = coords.1.checked_add(delta.1)?;

    if (0..bounds.0).contains(&next_x) && (0..bounds.1).contains(&next_y) {
        Some((next_x, next_y))
    } else {
        None
    }
}

/// Iterates the in-bounds 4-neighbours of a cell together with the axis connecting them.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = (Coord2, Axis);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let &(dx, dy, axis) = DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, (dx, dy), self.bounds) {
                return Some((next_item, axis));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn corner_has_two_neighbors() {
        let neighbors: Vec<_> = NeighborIter::new((0, 0), (3, 3)).collect();

        assert_eq!(
            neighbors,
            [((1, 0), Axis::Horizontal), ((0, 1), Axis::Vertical)]
        );
    }

    #[test]
    fn interior_has_four_neighbors() {
        assert_eq!(NeighborIter::new((1, 1), (3, 3)).count(), 4);
    }

    #[test]
    fn sign_collapses_counts() {
        assert_eq!(sign(5), 1);
        assert_eq!(sign(0), 0);
        assert_eq!(sign(-2), -1);
    }
}
