use rand::Rng;
use tracing::debug;

use crate::{BoardConfig, Neighbors, Pos};

/// Which cells around the first reveal are kept free of mines.
///
/// Only neighbors inside the board count, so a corner or edge start keeps its
/// neighborhood clear on boards denser than `width * height - 9` mines allow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SafeZone {
    /// Only the revealed cell itself.
    Cell,
    /// The revealed cell and all of its in-bounds neighbors.
    Neighborhood,
}

impl SafeZone {
    /// Picks the widest zone that still leaves room for every mine.
    pub fn for_start(config: &BoardConfig, start: Pos) -> Self {
        let neighborhood = 1 + Neighbors::new(start, config.width, config.height).count();
        if config.total_cells() - neighborhood >= config.mines {
            Self::Neighborhood
        } else {
            Self::Cell
        }
    }
}

/// Returns a row-major mine mask with exactly `config.mines` mines, chosen uniformly among
/// the cells outside the safe zone around `start`.
///
/// `config` must be valid and `start` in bounds.
pub fn generate_mines<R: Rng>(config: &BoardConfig, start: Pos, rng: &mut R) -> Vec<bool> {
    let width = config.width;
    let mut excluded = vec![false; config.total_cells()];
    excluded[start.x + start.y * width] = true;

    let zone = SafeZone::for_start(config, start);
    if zone == SafeZone::Neighborhood {
        for pos in Neighbors::new(start, width, config.height) {
            excluded[pos.x + pos.y * width] = true;
        }
    } else {
        debug!(
            "Board {}x{} with {} mines is too dense to clear the neighborhood of ({}, {})",
            config.width, config.height, config.mines, start.x, start.y
        );
    }

    let mut candidates_left = excluded.iter().filter(|&&excluded| !excluded).count();
    let mut mines_left = config.mines;
    let mut mines = vec![false; excluded.len()];

    // Selection sampling: each candidate is picked with probability mines_left / candidates_left.
    for (mine, &excluded) in mines.iter_mut().zip(&excluded) {
        if excluded {
            continue;
        }
        if mines_left > 0 && rng.random_range(0..candidates_left) < mines_left {
            *mine = true;
            mines_left -= 1;
        }
        candidates_left -= 1;
    }

    debug!(
        "Placed {} mines on {}x{} board, safe zone {:?} around ({}, {})",
        config.mines - mines_left,
        config.width,
        config.height,
        zone,
        start.x,
        start.y
    );
    mines
}
