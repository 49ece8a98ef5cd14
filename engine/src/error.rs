use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Invalid board configuration: {width}x{height} with {mines} mines")]
    InvalidConfiguration {
        width: usize,
        height: usize,
        mines: usize,
    },
    #[error("Coordinates ({x}, {y}) are outside the board")]
    OutOfBounds { x: usize, y: usize },
    #[error("Mines have already been placed on this board")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, BoardError>;
