use thiserror::Error;

use crate::*;

/// Reasons a puzzle definition is refused. Nothing is installed when loading fails.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Board dimensions must be positive and cover at most {} cells", crate::MAX_BOARD_AREA)]
    InvalidDimensions,
    #[error("Grid letter {letter:?} at ({x}, {y}) has no definition")]
    UndefinedLetter { letter: char, x: usize, y: usize },
    #[error("Letter {letter:?} is defined more than once")]
    DuplicateDefinition { letter: char },
    #[error("Signal for {letter:?} contains {character:?}, expected one of '+', '-', '0' or ' '")]
    InvalidSignal { letter: char, character: char },
    #[error("Cell ({x}, {y}) lies outside the board")]
    OutOfBounds { x: i64, y: i64 },
    #[error("Port {letter:?} appears more than once")]
    DuplicatePort { letter: Label },
}

pub type Result<T> = core::result::Result<T, LoadError>;
