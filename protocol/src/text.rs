use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::iter::Peekable;

use crate::*;

type Lines<'a> = Peekable<core::iter::Enumerate<core::str::Lines<'a>>>;

/// Reads every puzzle block of a puzzle file.
///
/// ```text
/// [name]
/// 6x3
///  a  |
/// bbbb|
/// ---+
/// a: in[0++0]
/// b: solid
/// ```
///
/// Blank lines between blocks, and inside the grid, are ignored. Signal contents are taken verbatim and validated when
/// the puzzle is loaded.
pub fn parse_puzzles(text: &str) -> Result<Vec<PuzzleDefinition>> {
    let mut lines: Lines = text.lines().enumerate().peekable();
    let mut puzzles = Vec::new();

    while skip_blank(&mut lines) {
        let Some(header) = lines.next() else {
            break;
        };
        puzzles.push(parse_puzzle(header, &mut lines)?);
    }

    log::debug!("parsed {} puzzle(s)", puzzles.len());
    Ok(puzzles)
}

/// Advances past blank lines, returning whether anything is left.
fn skip_blank(lines: &mut Lines) -> bool {
    while let Some((_, line)) = lines.peek() {
        if !line.trim().is_empty() {
            return true;
        }
        lines.next();
    }
    false
}

fn parse_puzzle((name_idx, name_line): (usize, &str), lines: &mut Lines) -> Result<PuzzleDefinition> {
    let start = name_idx + 1;
    let name = parse_name(name_line).ok_or(ParseError::ExpectedName { line: start })?;

    skip_blank(lines);
    let (dim_idx, dim_line) = lines
        .next()
        .ok_or(ParseError::InvalidDimensions { line: start + 1 })?;
    let dimensions =
        parse_dimensions(dim_line).ok_or(ParseError::InvalidDimensions { line: dim_idx + 1 })?;

    let mut grid = Vec::new();
    loop {
        let Some((idx, line)) = lines.next() else {
            return Err(ParseError::UnterminatedGrid { line: start });
        };
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        if is_terminator(trimmed) {
            break;
        }
        let row = trimmed
            .strip_suffix('|')
            .ok_or(ParseError::InvalidGridRow { line: idx + 1 })?;
        grid.push(row.to_string());
    }

    let mut defns = Vec::new();
    while skip_blank(lines) {
        let Some((idx, line)) = lines.peek().copied() else {
            break;
        };
        if !looks_like_definition(line) {
            break;
        }
        lines.next();
        defns.push(parse_definition(line).ok_or(ParseError::InvalidDefinition { line: idx + 1 })?);
    }

    Ok(PuzzleDefinition {
        name,
        dimensions,
        grid,
        defns,
    })
}

fn parse_name(line: &str) -> Option<String> {
    let name = line.trim().strip_prefix('[')?.strip_suffix(']')?;
    if name.is_empty() || name.contains(']') {
        None
    } else {
        Some(name.to_string())
    }
}

fn parse_dimensions(line: &str) -> Option<(u32, u32)> {
    let (width, height) = line.trim().split_once('x')?;
    Some((parse_integer(width)?, parse_integer(height)?))
}

fn parse_integer(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn is_terminator(line: &str) -> bool {
    line.strip_suffix('+')
        .is_some_and(|dashes| !dashes.is_empty() && dashes.bytes().all(|b| b == b'-'))
}

fn looks_like_definition(line: &str) -> bool {
    let mut chars = line.chars();
    matches!((chars.next(), chars.next()), (Some(letter), Some(':')) if letter != '|')
}

fn parse_definition(line: &str) -> Option<(char, LetterDefinition)> {
    let mut chars = line.chars();
    let letter = chars.next()?;
    let rest = chars.as_str().strip_prefix(':')?.trim_start().trim_end();

    let defn = match rest {
        "solid" => LetterDefinition::Solid,
        "open" => LetterDefinition::Open,
        _ => {
            if let Some(signal) = rest.strip_prefix("in") {
                LetterDefinition::In(parse_bracketed(signal)?)
            } else if let Some(signal) = rest.strip_prefix("out") {
                LetterDefinition::Out(parse_bracketed(signal)?)
            } else {
                return None;
            }
        }
    };

    Some((letter, defn))
}

fn parse_bracketed(text: &str) -> Option<String> {
    let signal = text.trim_start().strip_prefix('[')?.strip_suffix(']')?;
    if signal.is_empty() {
        None
    } else {
        Some(signal.to_string())
    }
}
