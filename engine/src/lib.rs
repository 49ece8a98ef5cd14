//! Minesweeper Board Engine
//!
//! A single-player minesweeper board: mine generation, reveal with flood fill, flags and
//! game status. Mines are placed lazily on the first reveal so that the first move is
//! always safe, and when the board has room for it the cells around that move are kept
//! clear as well.
//!
//! ```rust
//! use minesweeper_engine::{Board, BoardConfig, GameStatus, Pos};
//!
//! let mut board = Board::new(BoardConfig::new(10, 10, 20)?)?;
//! assert!(!board.mines_placed());
//!
//! let status = board.reveal(Pos::new(0, 0))?;
//! assert_ne!(status, GameStatus::SteppedOnMine);
//! assert_eq!(board.cell_at(Pos::new(0, 0))?.adjacent_mines, 0);
//!
//! board.toggle_flag(Pos::new(9, 9))?;
//! # Ok::<(), minesweeper_engine::BoardError>(())
//! ```

mod board;
mod cell;
mod config;
mod error;
mod generator;
mod status;
mod types;

pub use board::Board;
pub use cell::Cell;
pub use config::BoardConfig;
pub use error::{BoardError, Result};
pub use generator::{SafeZone, generate_mines};
pub use status::{EngineState, GameStatus};
pub use types::{Neighbors, Pos};
