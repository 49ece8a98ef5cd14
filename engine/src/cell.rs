use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum RevealedState {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

/// Owned storage for one grid position. Never handed out; callers get [`Cell`] copies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Tile {
    pub mine: bool,
    pub adjacent: u8,
    pub revealed: RevealedState,
}

/// Snapshot of a single cell as seen by the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    /// Number of mined neighbors, zero for mines and for boards without mines placed.
    pub adjacent_mines: u8,
}

impl From<&Tile> for Cell {
    fn from(tile: &Tile) -> Self {
        Self {
            is_mine: tile.mine,
            is_revealed: tile.revealed == RevealedState::Revealed,
            is_flagged: tile.revealed == RevealedState::Flagged,
            adjacent_mines: tile.adjacent,
        }
    }
}
