use alloc::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};

use crate::*;

/// Tunables of the per-tick transition rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepRules {
    /// A shuttle moves once the pressure difference across it exceeds this.
    pub shuttle_threshold: Pressure,
    pub thin_shuttle_threshold: Pressure,
}

impl Default for StepRules {
    fn default() -> Self {
        Self {
            shuttle_threshold: 0,
            thin_shuttle_threshold: 0,
        }
    }
}

impl StepRules {
    fn threshold_for(&self, cell: CellType) -> Pressure {
        match cell {
            CellType::ThinShuttle => self.thin_shuttle_threshold,
            _ => self.shuttle_threshold,
        }
    }
}

/// Advances the board by one tick. Every cell is decided from the board as it was before the tick.
pub fn advance(grid: &Grid, rules: &StepRules) -> Grid {
    advance_pinned(grid, rules, &BTreeSet::new())
}

/// Like [`advance`], but mobile cells never move into a `pinned` coordinate.
pub fn advance_pinned(grid: &Grid, rules: &StepRules, pinned: &BTreeSet<Coord2>) -> Grid {
    use CellType::*;

    let field = compute(grid);
    let mut next = grid.clone();
    // target -> origin, `None` once a second shuttle asks for the same target
    let mut claims: BTreeMap<Coord2, Option<Coord2>> = BTreeMap::new();

    for (coords, cell) in grid.iter() {
        match cell {
            Solid | Empty | Positive | Negative | ThinSolid | Bridge => {}
            Shuttle | ThinShuttle => {
                let Some(target) = shuttle_target(grid, &field, coords, rules.threshold_for(cell))
                else {
                    continue;
                };
                if pinned.contains(&target) {
                    continue;
                }
                claims
                    .entry(target)
                    .and_modify(|origin| *origin = None)
                    .or_insert(Some(coords));
            }
            ButtonUp => {
                let pushed = grid
                    .iter_neighbors(coords)
                    .any(|(neighbor, axis)| field.along(neighbor, axis) != 0);
                if pushed {
                    next.set(coords, ButtonDown);
                }
            }
            ButtonDown => {
                next.set(coords, ButtonUp);
            }
        }
    }

    for (target, origin) in claims {
        let Some(origin) = origin else {
            log::trace!("shuttles collide at {target:?}, none move");
            continue;
        };
        log::trace!("shuttle {origin:?} -> {target:?}");
        next.set(target, grid.get(origin));
        next.set(origin, Empty);
    }

    next
}

/// Where a shuttle at `coords` wants to go, if anywhere.
///
/// Along each axis the shuttle feels `before - after`, the pressure on its lower side minus the pressure on its
/// higher side. It is pushed towards the lower pressure along the axis with the strongest difference; equal
/// differences on both axes cancel out. The destination must be empty.
fn shuttle_target(
    grid: &Grid,
    field: &PressureField,
    coords: Coord2,
    threshold: Pressure,
) -> Option<Coord2> {
    let mut best: Option<(i16, Coord2)> = None;
    let mut tied = false;

    for axis in Axis::ALL {
        let [before, after] = axis.neighbors(coords);
        let difference =
            i16::from(field.along(before, axis)) - i16::from(field.along(after, axis));
        if difference.abs() <= i16::from(threshold) {
            continue;
        }

        let target = if difference > 0 { after } else { before };
        match best {
            Some((strength, _)) if strength == difference.abs() => tied = true,
            Some((strength, _)) if strength > difference.abs() => {}
            _ => {
                best = Some((difference.abs(), target));
                tied = false;
            }
        }
    }

    let (_, target) = best.filter(|_| !tied)?;
    (grid.cell(target) == Some(CellType::Empty)).then_some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(rows: &[&str]) -> Grid {
        advance(&Grid::from_glyph_rows(rows).unwrap(), &StepRules::default())
    }

    fn glyphs(rows: &[&str]) -> Grid {
        Grid::from_glyph_rows(rows).unwrap()
    }

    #[test]
    fn static_cells_copy_unchanged() {
        let rows = ["#_+-=B", "______"];

        assert_eq!(step(&rows), glyphs(&rows));
    }

    #[test]
    fn shuttle_is_pushed_away_from_pressure() {
        // column: positive, open, shuttle, open
        let grid = glyphs(&["+", "_", "S", "_"]);

        let next = advance(&grid, &StepRules::default());

        assert_eq!(next, glyphs(&["+", "_", "_", "S"]));
        // nothing left to move into
        assert_eq!(advance(&next, &StepRules::default()), next);
    }

    #[test]
    fn shuttle_is_pulled_towards_negative_side_horizontally() {
        assert_eq!(step(&["-_S_"]), glyphs(&["-S__"]));
    }

    #[test]
    fn thin_shuttle_moves_like_shuttle() {
        assert_eq!(step(&["+s_"]), glyphs(&["+_s"]));
    }

    #[test]
    fn shuttle_blocked_by_solid_or_mobile_cells() {
        assert_eq!(step(&["+S#"]), glyphs(&["+S#"]));
        assert_eq!(step(&["+SS_"]), glyphs(&["+SS_"]));
        assert_eq!(step(&["+S."]), glyphs(&["+S."]));
    }

    #[test]
    fn threshold_holds_shuttle_until_difference_is_large_enough() {
        let grid = glyphs(&["+_S_"]);
        let rules = StepRules {
            shuttle_threshold: 1,
            ..StepRules::default()
        };

        assert_eq!(advance(&grid, &rules), grid);
        assert_eq!(advance(&glyphs(&["+S-"]), &rules), glyphs(&["+S-"]));
        // positive on the left, negative reaching the open cell on the right: a difference of two
        let squeezed = glyphs(&["+_S_", "###-"]);
        assert_eq!(advance(&squeezed, &rules), glyphs(&["+__S", "###-"]));
    }

    #[test]
    fn thin_and_thick_shuttles_use_their_own_threshold() {
        let grid = glyphs(&["+S_", "###", "+s_"]);
        let thick_held = StepRules {
            shuttle_threshold: 1,
            thin_shuttle_threshold: 0,
        };
        let thin_held = StepRules {
            shuttle_threshold: 0,
            thin_shuttle_threshold: 1,
        };

        assert_eq!(advance(&grid, &thick_held), glyphs(&["+S_", "###", "+_s"]));
        assert_eq!(advance(&grid, &thin_held), glyphs(&["+_S", "###", "+s_"]));
    }

    #[test]
    fn equal_push_on_both_axes_cancels() {
        // isolated sources above and to the left push right and down equally
        let grid = glyphs(&["#+#", "+S_", "#_#"]);

        assert_eq!(advance(&grid, &StepRules::default()), grid);
    }

    #[test]
    fn colliding_shuttles_both_stay() {
        let grid = glyphs(&["+S_S+"]);

        assert_eq!(advance(&grid, &StepRules::default()), grid);
    }

    #[test]
    fn pinned_cells_are_never_entered() {
        let grid = glyphs(&["+S_"]);

        let next = advance_pinned(&grid, &StepRules::default(), &BTreeSet::from([(2, 0)]));

        assert_eq!(next, grid);
    }

    #[test]
    fn button_presses_for_one_tick() {
        let grid = glyphs(&["+u"]);

        let pressed = advance(&grid, &StepRules::default());
        assert_eq!(pressed, glyphs(&["+d"]));

        let released = advance(&pressed, &StepRules::default());
        assert_eq!(released, glyphs(&["+u"]));
    }

    #[test]
    fn button_ignores_neutral_neighbors() {
        assert_eq!(step(&["_u"]), glyphs(&["_u"]));
    }

    #[test]
    fn button_reads_bridge_lane_facing_it() {
        // the bridge's vertical lane carries the source, its horizontal lane faces the button
        assert_eq!(step(&[" + ", " Bu"]), glyphs(&[" + ", " Bu"]));
        assert_eq!(step(&["+Bu"]), glyphs(&["+Bd"]));
    }
}
