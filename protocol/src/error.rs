use thiserror::Error;

/// Errors produced while reading the textual puzzle format. Line numbers are 1-based.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected a puzzle name in brackets")]
    ExpectedName { line: usize },
    #[error("line {line}: expected dimensions as <width>x<height>")]
    InvalidDimensions { line: usize },
    #[error("line {line}: grid rows must end with '|'")]
    InvalidGridRow { line: usize },
    #[error("puzzle starting at line {line} has no '---+' grid terminator")]
    UnterminatedGrid { line: usize },
    #[error("line {line}: expected '<letter>: solid|open|in[..]|out[..]'")]
    InvalidDefinition { line: usize },
}

pub type Result<T> = core::result::Result<T, ParseError>;
