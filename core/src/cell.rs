use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a board coordinate can hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Solid,
    #[serde(alias = "nothing")]
    Empty,
    Positive,
    Negative,
    Shuttle,
    ThinShuttle,
    ThinSolid,
    Bridge,
    ButtonUp,
    /// A button held down for a single tick after being pressed.
    ButtonDown,
}

impl CellType {
    pub const ALL: [CellType; 10] = [
        Self::Solid,
        Self::Empty,
        Self::Positive,
        Self::Negative,
        Self::Shuttle,
        Self::ThinShuttle,
        Self::ThinSolid,
        Self::Bridge,
        Self::ButtonUp,
        Self::ButtonDown,
    ];

    /// Whether pressure flows through this cell in every direction.
    pub const fn conducts(self) -> bool {
        matches!(
            self,
            Self::Empty | Self::Positive | Self::Negative | Self::ButtonDown
        )
    }

    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::Shuttle | Self::ThinShuttle)
    }

    /// Pressure injected into the surrounding component.
    pub const fn source(self) -> Pressure {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
            _ => 0,
        }
    }

    /// The cell an input port is forced to for a given scripted value.
    pub const fn from_pressure(pressure: Pressure) -> Self {
        match sign(pressure as i64) {
            1 => Self::Positive,
            -1 => Self::Negative,
            _ => Self::Empty,
        }
    }

    pub const fn glyph(self) -> char {
        match self {
            Self::Solid => '#',
            Self::Empty => '_',
            Self::Positive => '+',
            Self::Negative => '-',
            Self::Shuttle => 'S',
            Self::ThinShuttle => 's',
            Self::ThinSolid => '=',
            Self::Bridge => 'B',
            Self::ButtonUp => 'u',
            Self::ButtonDown => 'd',
        }
    }

    pub const fn from_glyph(glyph: char) -> Option<Self> {
        Some(match glyph {
            '#' => Self::Solid,
            '_' => Self::Empty,
            '+' => Self::Positive,
            '-' => Self::Negative,
            'S' => Self::Shuttle,
            's' => Self::ThinShuttle,
            '=' => Self::ThinSolid,
            'B' => Self::Bridge,
            'u' => Self::ButtonUp,
            'd' => Self::ButtonDown,
            _ => return None,
        })
    }
}
