use serde::{Deserialize, Serialize};

/// Player-facing game status.
///
/// The discriminants double as the compact integer form used by callers that cannot
/// carry a tagged value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum GameStatus {
    InProgress = 1,
    SteppedOnMine = 2,
    Victory = 3,
}

impl GameStatus {
    /// `true` once no further move can change the board.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::SteppedOnMine | Self::Victory)
    }

    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Internal lifecycle of a board. `Ready` is the only state without mines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    Ready,
    Active,
    Lost,
    Won,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Lost | Self::Won)
    }

    pub const fn status(self) -> GameStatus {
        match self {
            Self::Ready | Self::Active => GameStatus::InProgress,
            Self::Lost => GameStatus::SteppedOnMine,
            Self::Won => GameStatus::Victory,
        }
    }
}
