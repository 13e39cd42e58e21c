use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;

use crate::*;

/// A validated puzzle: its starting board and the ports attached to it.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedPuzzle {
    name: String,
    store: GridStore,
    ports: Vec<Port>,
}

impl LoadedPuzzle {
    /// Checks that every port sits on the board and no label is used twice.
    pub fn new(name: String, store: GridStore, ports: Vec<Port>) -> Result<Self> {
        let mut labels = BTreeSet::new();
        for port in &ports {
            let (x, y) = port.position();
            if !store.grid().contains((x, y)) {
                return Err(LoadError::OutOfBounds {
                    x: i64::from(x),
                    y: i64::from(y),
                });
            }
            if !labels.insert(port.label()) {
                return Err(LoadError::DuplicatePort {
                    letter: port.label(),
                });
            }
        }

        Ok(Self { name, store, ports })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &GridStore {
        &self.store
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub(crate) fn into_parts(self) -> (String, GridStore, Vec<Port>) {
        (self.name, self.store, self.ports)
    }
}

/// What a letter resolves to once its signal text has been read.
enum Resolved {
    Cell(CellType),
    Input(Vec<Pressure>),
    Output(Vec<Signal>),
}

fn resolve(letter: char, definition: &LetterDefinition) -> Result<Resolved> {
    let signal = |text: &str| {
        parse_signal(text).map_err(|character| LoadError::InvalidSignal { letter, character })
    };

    Ok(match definition {
        LetterDefinition::Solid => Resolved::Cell(CellType::Solid),
        LetterDefinition::Open => Resolved::Cell(CellType::Empty),
        // "don't care" has no meaning for a source, hold it neutral instead
        LetterDefinition::In(text) => Resolved::Input(
            signal(text)?
                .into_iter()
                .map(|value| value.unwrap_or(0))
                .collect(),
        ),
        LetterDefinition::Out(text) => Resolved::Output(signal(text)?),
    })
}

/// Largest board, in cells, a puzzle may declare.
pub const MAX_BOARD_AREA: u64 = 1 << 20;

fn dimension(value: u32) -> Result<Coord> {
    Coord::try_from(value)
        .ok()
        .filter(|&value| value > 0)
        .ok_or(LoadError::InvalidDimensions)
}

/// Turns a puzzle definition into its starting board and ports.
///
/// Every cell drawn by the puzzle is protected from painting. Port cells start out empty and are labelled with the
/// letter they are drawn with. Any problem rejects the whole puzzle.
pub fn load_puzzle(definition: &PuzzleDefinition) -> Result<LoadedPuzzle> {
    let bounds = (dimension(definition.width())?, dimension(definition.height())?);
    if u64::from(definition.width()) * u64::from(definition.height()) > MAX_BOARD_AREA {
        return Err(LoadError::InvalidDimensions);
    }

    let mut letters = BTreeMap::new();
    for (letter, letter_definition) in &definition.defns {
        if letters
            .insert(*letter, resolve(*letter, letter_definition)?)
            .is_some()
        {
            return Err(LoadError::DuplicateDefinition { letter: *letter });
        }
    }

    let mut grid = Grid::new(bounds);
    let mut protected = BTreeSet::new();
    let mut ports = Vec::new();
    let mut used = BTreeSet::new();

    for ((x, y), letter) in definition.cells() {
        let coords = match (Coord::try_from(x), Coord::try_from(y)) {
            (Ok(cx), Ok(cy)) if grid.contains((cx, cy)) => (cx, cy),
            _ => {
                return Err(LoadError::OutOfBounds {
                    x: x as i64,
                    y: y as i64,
                });
            }
        };
        let resolved = letters
            .get(&letter)
            .ok_or(LoadError::UndefinedLetter { letter, x, y })?;

        let cell = match resolved {
            Resolved::Cell(cell) => *cell,
            Resolved::Input(signal) => {
                ports.push(Port::Input(InputPort {
                    label: letter,
                    position: coords,
                    signal: signal.clone(),
                }));
                CellType::Empty
            }
            Resolved::Output(required) => {
                ports.push(Port::Output(OutputPort {
                    label: letter,
                    position: coords,
                    required: required.clone(),
                }));
                CellType::Empty
            }
        };

        grid.set(coords, cell);
        protected.insert(coords);
        used.insert(letter);
    }

    for (letter, resolved) in &letters {
        if !used.contains(letter) && !matches!(resolved, Resolved::Cell(_)) {
            log::warn!(
                "{}: port {letter:?} is defined but never placed on the grid",
                definition.name
            );
        }
    }

    log::debug!(
        "loaded {:?}: {}x{}, {} port(s), {} protected cell(s)",
        definition.name,
        bounds.0,
        bounds.1,
        ports.len(),
        protected.len()
    );
    LoadedPuzzle::new(definition.name.clone(), GridStore::new(grid, protected), ports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn definition(grid: &[&str], defns: Vec<(char, LetterDefinition)>) -> PuzzleDefinition {
        PuzzleDefinition {
            name: "test".to_string(),
            dimensions: (4, 2),
            grid: grid.iter().map(|row| row.to_string()).collect(),
            defns,
        }
    }

    #[test]
    fn builds_board_ports_and_protection() {
        let def = definition(
            &["a## ", " oc"],
            vec![
                ('a', LetterDefinition::In("+ -".to_string())),
                ('#', LetterDefinition::Solid),
                ('o', LetterDefinition::Open),
                ('c', LetterDefinition::Out(" +".to_string())),
            ],
        );

        let puzzle = load_puzzle(&def).unwrap();

        let store = puzzle.store();
        assert_eq!(store.bounds(), (4, 2));
        assert_eq!(store.get((0, 0)), CellType::Empty);
        assert_eq!(store.get((1, 0)), CellType::Solid);
        assert_eq!(store.grid().cell((3, 0)), None);
        assert_eq!(store.get((1, 1)), CellType::Empty);
        assert_eq!(store.protected().len(), 5);
        assert!(!store.is_protected((0, 1)));

        assert_eq!(
            puzzle.ports(),
            [
                Port::Input(InputPort {
                    label: 'a',
                    position: (0, 0),
                    signal: vec![1, 0, -1],
                }),
                Port::Output(OutputPort {
                    label: 'c',
                    position: (2, 1),
                    required: vec![None, Some(1)],
                }),
            ]
        );
    }

    #[test]
    fn rejects_undefined_letter() {
        let def = definition(&["ab"], vec![('a', LetterDefinition::Open)]);

        assert_eq!(
            load_puzzle(&def),
            Err(LoadError::UndefinedLetter {
                letter: 'b',
                x: 1,
                y: 0
            })
        );
    }

    #[test]
    fn rejects_bad_signal_character() {
        let def = definition(&["a"], vec![('a', LetterDefinition::Out("+?".to_string()))]);

        assert_eq!(
            load_puzzle(&def),
            Err(LoadError::InvalidSignal {
                letter: 'a',
                character: '?'
            })
        );
    }

    #[test]
    fn rejects_empty_dimensions() {
        let mut def = definition(&["a"], vec![('a', LetterDefinition::Open)]);
        def.dimensions = (0, 3);

        assert_eq!(load_puzzle(&def), Err(LoadError::InvalidDimensions));
    }

    #[test]
    fn rejects_oversized_board_with_few_cells() {
        let mut def = definition(
            &["ac"],
            vec![
                ('a', LetterDefinition::In("+".to_string())),
                ('c', LetterDefinition::Out("+".to_string())),
            ],
        );
        def.dimensions = (200_000, 200_000);
        assert_eq!(load_puzzle(&def), Err(LoadError::InvalidDimensions));

        def.dimensions = (1 << 10, 1 << 10);
        assert!(load_puzzle(&def).is_ok());
    }

    #[test]
    fn rejects_cells_outside_board() {
        let def = definition(&["o", "", "o"], vec![('o', LetterDefinition::Open)]);

        assert_eq!(load_puzzle(&def), Err(LoadError::OutOfBounds { x: 0, y: 2 }));

        let wide = definition(&["ooooo"], vec![('o', LetterDefinition::Open)]);
        assert_eq!(load_puzzle(&wide), Err(LoadError::OutOfBounds { x: 4, y: 0 }));
    }

    #[test]
    fn rejects_repeated_definitions_and_ports() {
        let twice = definition(
            &["o"],
            vec![('o', LetterDefinition::Open), ('o', LetterDefinition::Solid)],
        );
        assert_eq!(
            load_puzzle(&twice),
            Err(LoadError::DuplicateDefinition { letter: 'o' })
        );

        let two_cells = definition(&["aa"], vec![('a', LetterDefinition::In("+".to_string()))]);
        assert_eq!(
            load_puzzle(&two_cells),
            Err(LoadError::DuplicatePort { letter: 'a' })
        );
    }

    #[test]
    fn port_outside_store_is_rejected() {
        let store = GridStore::new(Grid::new((2, 2)), BTreeSet::new());
        let port = Port::Output(OutputPort {
            label: 'x',
            position: (2, 0),
            required: vec![],
        });

        assert_eq!(
            LoadedPuzzle::new("x".to_string(), store, vec![port]),
            Err(LoadError::OutOfBounds { x: 2, y: 0 })
        );
    }
}
