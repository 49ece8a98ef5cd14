use serde::{Deserialize, Serialize};

use crate::{BoardError, Result};

/// Board dimensions and mine count for one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
}

impl BoardConfig {
    pub fn new(width: usize, height: usize, mines: usize) -> Result<Self> {
        let config = Self {
            width,
            height,
            mines,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that both dimensions are positive and that at least one cell stays free of
    /// mines.
    pub fn validate(&self) -> Result<()> {
        match self.width.checked_mul(self.height) {
            Some(total) if self.width > 0 && self.height > 0 && self.mines < total => Ok(()),
            _ => Err(BoardError::InvalidConfiguration {
                width: self.width,
                height: self.height,
                mines: self.mines,
            }),
        }
    }

    pub const fn total_cells(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    pub const fn safe_cells(&self) -> usize {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            mines: 20,
        }
    }
}
