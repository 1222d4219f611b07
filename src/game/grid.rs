//! Grid dimensions supported by the game and their `NxN` game-mode encoding.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Side length of the square grid. Only 4×4, 5×5 and 6×6 boards exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GridSize {
    /// 16 squares.
    #[default]
    Four,
    /// 25 squares.
    Five,
    /// 36 squares.
    Six,
}

/// Raised when a value does not name one of the supported grid sizes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported game mode `{0}` (expected 4, 5 or 6)")]
pub struct InvalidGridSize(pub String);

impl GridSize {
    /// Every supported size, smallest first.
    pub const ALL: [GridSize; 3] = [GridSize::Four, GridSize::Five, GridSize::Six];

    /// Length of one side of the grid.
    pub fn side(self) -> u8 {
        match self {
            GridSize::Four => 4,
            GridSize::Five => 5,
            GridSize::Six => 6,
        }
    }

    /// Number of squares on the board, which is also the last target value.
    pub fn squares(self) -> u32 {
        let side = u32::from(self.side());
        side * side
    }

    /// Game-mode label stored alongside ranking records (e.g. `"4x4"`).
    pub fn game_mode(self) -> String {
        let side = self.side();
        format!("{side}x{side}")
    }
}

impl TryFrom<u8> for GridSize {
    type Error = InvalidGridSize;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(GridSize::Four),
            5 => Ok(GridSize::Five),
            6 => Ok(GridSize::Six),
            other => Err(InvalidGridSize(other.to_string())),
        }
    }
}

impl From<GridSize> for u8 {
    fn from(value: GridSize) -> Self {
        value.side()
    }
}

impl FromStr for GridSize {
    type Err = InvalidGridSize;

    /// Accepts either the bare side length (`"5"`) or the full label (`"5x5"`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let side = match trimmed.split_once(['x', 'X']) {
            Some((rows, cols)) if rows == cols => rows,
            Some(_) => return Err(InvalidGridSize(value.to_owned())),
            None => trimmed,
        };

        side.parse::<u8>()
            .map_err(|_| InvalidGridSize(value.to_owned()))
            .and_then(|side| {
                GridSize::try_from(side).map_err(|_| InvalidGridSize(value.to_owned()))
            })
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.game_mode())
    }
}
