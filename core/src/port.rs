use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// A scripted source: the port cell is forced to `signal[t]` before tick `t`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPort {
    pub label: Label,
    pub position: Coord2,
    pub signal: Vec<Pressure>,
}

impl InputPort {
    /// Scripted value for `tick`, neutral once the script has run out.
    pub fn value_at(&self, tick: usize) -> Pressure {
        self.signal.get(tick).copied().unwrap_or(0)
    }
}

/// A graded sample point: after tick `t` the pressure here must match `required[t]` when that is defined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPort {
    pub label: Label,
    pub position: Coord2,
    pub required: Vec<Signal>,
}

impl OutputPort {
    pub fn expected_at(&self, tick: usize) -> Signal {
        self.required.get(tick).copied().flatten()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Port {
    Input(InputPort),
    Output(OutputPort),
}

impl Port {
    pub fn label(&self) -> Label {
        match self {
            Self::Input(input) => input.label,
            Self::Output(output) => output.label,
        }
    }

    pub fn position(&self) -> Coord2 {
        match self {
            Self::Input(input) => input.position,
            Self::Output(output) => output.position,
        }
    }

    /// Number of ticks this port has something to say about.
    pub fn len(&self) -> usize {
        match self {
            Self::Input(input) => input.signal.len(),
            Self::Output(output) => output.required.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads a signal string, one tick per character: `+`, `-`, `0`, or `' '` for "don't care".
///
/// Returns the first unrecognized character on failure.
pub fn parse_signal(text: &str) -> core::result::Result<Vec<Signal>, char> {
    text.chars()
        .map(|ch| match ch {
            '+' => Ok(Some(1)),
            '-' => Ok(Some(-1)),
            '0' => Ok(Some(0)),
            ' ' => Ok(None),
            other => Err(other),
        })
        .collect()
}
