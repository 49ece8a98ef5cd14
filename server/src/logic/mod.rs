use std::{env, sync::Arc, time::Instant};

use dashmap::DashMap;
use minesweeper_engine::{Board, BoardConfig, BoardError, GameStatus};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::model::{BoardView, Cell, CellUpdate, GameParams, MoveResponse, Pos, StatusResponse};

pub type Games = Arc<DashMap<String, Arc<Mutex<Game>>>>;

/// One single-player session: the board plus bookkeeping for expiry.
pub struct Game {
    board: Board,
    created_at: Instant,
    last_activity: Instant,
}

fn max_board_cells() -> usize {
    env::var("MAX_BOARD_CELLS")
        .unwrap_or_else(|_| "10000".to_string())
        .parse()
        .unwrap_or(10_000)
}

impl Game {
    #[instrument(level = "trace")]
    pub fn new(params: GameParams) -> Result<Self, BoardError> {
        info!(
            "Creating new game: {}x{} with {} mines",
            params.width, params.height, params.mines
        );

        let config = BoardConfig::new(params.width, params.height, params.mines)?;
        if config.total_cells() > max_board_cells() {
            warn!(
                "Rejecting board of {} cells, limit is {}",
                config.total_cells(),
                max_board_cells()
            );
            return Err(BoardError::InvalidConfiguration {
                width: params.width,
                height: params.height,
                mines: params.mines,
            });
        }

        let now = Instant::now();
        Ok(Self {
            board: Board::new(config)?,
            created_at: now,
            last_activity: now,
        })
    }

    pub fn view(&self) -> BoardView {
        let config = self.board.config();
        BoardView {
            width: config.width,
            height: config.height,
            mines: config.mines,
            mines_left: self.board.mines_left(),
            status: self.board.status(),
            field: self
                .board
                .cells()
                .map(|(_, cell)| cell.into())
                .collect::<Vec<Cell>>()
                .chunks(config.width)
                .map(|chunk| chunk.to_vec())
                .collect(),
        }
    }

    pub fn status(&self) -> StatusResponse {
        let status = self.board.status();
        StatusResponse {
            status,
            code: status.code(),
            mines_placed: self.board.mines_placed(),
        }
    }

    pub fn cell(&self, pos: Pos) -> Result<Cell, BoardError> {
        Ok(self.board.cell_at(pos)?.into())
    }

    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn place_mines(&mut self, pos: Pos) -> Result<StatusResponse, BoardError> {
        self.last_activity = Instant::now();
        self.board.place_mines(pos)?;
        debug!("Mines placed around ({}, {})", pos.x, pos.y);
        Ok(self.status())
    }

    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn reveal(&mut self, pos: Pos) -> Result<MoveResponse, BoardError> {
        self.last_activity = Instant::now();

        let mut changed = Vec::new();
        let status = self
            .board
            .reveal_into(pos, &mut rand::rng(), &mut changed)?;
        if status == GameStatus::SteppedOnMine {
            changed.extend(self.board.reveal_all_mines());
        }

        debug!(
            "Reveal at ({}, {}) uncovered {} cells, status {:?}",
            pos.x,
            pos.y,
            changed.len(),
            status
        );
        Ok(MoveResponse {
            status,
            updates: self.updates(&changed)?,
        })
    }

    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn flag(&mut self, pos: Pos) -> Result<MoveResponse, BoardError> {
        self.last_activity = Instant::now();

        let before = self.board.cell_at(pos)?;
        let status = self.board.toggle_flag(pos)?;
        let changed = if self.board.cell_at(pos)? != before {
            vec![pos]
        } else {
            debug!("Flag at ({}, {}) changed nothing", pos.x, pos.y);
            Vec::new()
        };

        Ok(MoveResponse {
            status,
            updates: self.updates(&changed)?,
        })
    }

    pub fn should_cleanup(
        &self,
        inactive_timeout_secs: u64,
        finished_timeout_secs: u64,
        active_timeout_secs: u64,
    ) -> bool {
        let idle = self.last_activity.elapsed().as_secs();
        let timeout = if self.board.is_finished() {
            finished_timeout_secs
        } else {
            inactive_timeout_secs
        };

        idle >= timeout || self.created_at.elapsed().as_secs() >= active_timeout_secs
    }

    fn updates(&self, positions: &[Pos]) -> Result<Vec<CellUpdate>, BoardError> {
        positions
            .iter()
            .map(|&pos| {
                Ok(CellUpdate {
                    pos,
                    value: self.cell(pos)?,
                })
            })
            .collect()
    }
}
