use minesweeper_engine::GameStatus;
use serde::{Deserialize, Serialize};

pub use minesweeper_engine::Pos;

/// Player-visible cell. Unrevealed mines are indistinguishable from safe cells.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "state")]
pub enum Cell {
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "flagged")]
    Flagged,
    #[serde(rename = "revealed")]
    Revealed { adjacent: u8 },
    #[serde(rename = "mine")]
    Mine,
}

impl From<minesweeper_engine::Cell> for Cell {
    fn from(cell: minesweeper_engine::Cell) -> Self {
        match cell {
            minesweeper_engine::Cell {
                is_revealed: true,
                is_mine: true,
                ..
            } => Self::Mine,
            minesweeper_engine::Cell {
                is_revealed: true,
                adjacent_mines,
                ..
            } => Self::Revealed {
                adjacent: adjacent_mines,
            },
            minesweeper_engine::Cell {
                is_flagged: true, ..
            } => Self::Flagged,
            _ => Self::Hidden,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct GameParams {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            mines: 20,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateResponse {
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CellUpdate {
    pub pos: Pos,
    pub value: Cell,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MoveResponse {
    pub status: GameStatus,
    pub updates: Vec<CellUpdate>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct StatusResponse {
    pub status: GameStatus,
    pub code: u8,
    pub mines_placed: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BoardView {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
    pub mines_left: isize,
    pub status: GameStatus,
    pub field: Vec<Vec<Cell>>,
}
