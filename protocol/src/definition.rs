use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// What a grid letter stands for. Serialized as `"solid"`, `"open"`, `{"in": ".."}` or `{"out": ".."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterDefinition {
    Solid,
    Open,
    /// Scripted input, one signal character per tick.
    In(String),
    /// Graded output, one expected signal character per tick.
    Out(String),
}

/// A puzzle as it appears in a puzzle file, before any validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleDefinition {
    pub name: String,
    /// `(width, height)`
    pub dimensions: (u32, u32),
    /// One string per row, one character per cell, `' '` meaning no cell.
    pub grid: Vec<String>,
    pub defns: Vec<(char, LetterDefinition)>,
}

impl PuzzleDefinition {
    pub fn width(&self) -> u32 {
        self.dimensions.0
    }

    pub fn height(&self) -> u32 {
        self.dimensions.1
    }

    pub fn definition(&self, letter: char) -> Option<&LetterDefinition> {
        self.defns
            .iter()
            .find(|(defined, _)| *defined == letter)
            .map(|(_, defn)| defn)
    }

    /// Every non-space grid character with its `(x, y)` position, row-major.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), char)> + '_ {
        self.grid.iter().enumerate().flat_map(|(y, row)| {
            row.chars()
                .enumerate()
                .filter(|&(_, ch)| ch != ' ')
                .map(move |(x, ch)| ((x, y), ch))
        })
    }
}
