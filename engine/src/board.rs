use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, info};

use crate::{
    BoardConfig, BoardError, Cell, EngineState, GameStatus, Neighbors, Pos, Result,
    cell::{RevealedState, Tile},
    generator::generate_mines,
};

/// Complete state of one game session.
///
/// Mines are not placed until the first reveal (or an explicit [`Board::place_mines`]),
/// which guarantees that the first revealed cell is safe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    config: BoardConfig,
    tiles: Vec<Tile>,
    revealed: usize,
    flagged: usize,
    state: EngineState,
    triggered_mine: Option<Pos>,
}

impl Board {
    pub fn new(config: BoardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tiles: vec![Tile::default(); config.total_cells()],
            revealed: 0,
            flagged: 0,
            state: EngineState::Ready,
            triggered_mine: None,
        })
    }

    /// Builds an already armed board with mines at fixed positions. Duplicate positions
    /// count once.
    pub fn from_mines(width: usize, height: usize, mines: &[Pos]) -> Result<Self> {
        let mut board = Self::new(BoardConfig::new(width, height, 0)?)?;
        let mut mask = vec![false; board.tiles.len()];
        for &pos in mines {
            mask[board.index_of(pos)?] = true;
        }

        board.config = BoardConfig::new(width, height, mask.iter().filter(|&&m| m).count())?;
        board.arm(&mask);
        Ok(board)
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn mines_placed(&self) -> bool {
        !self.state.is_ready()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Number of revealed non-mine cells.
    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged
    }

    /// Mines minus flags; negative when the player has over-flagged.
    pub fn mines_left(&self) -> isize {
        self.config.mines as isize - self.flagged as isize
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<Pos> {
        self.triggered_mine
    }

    pub fn cell_at(&self, pos: Pos) -> Result<Cell> {
        let index = self.index_of(pos)?;
        Ok(Cell::from(&self.tiles[index]))
    }

    /// Row-major view over every cell.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        let width = self.config.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| (Pos::new(i % width, i / width), Cell::from(tile)))
    }

    pub fn neighbors(&self, pos: Pos) -> Neighbors {
        Neighbors::new(pos, self.config.width, self.config.height)
    }

    pub fn place_mines(&mut self, start: Pos) -> Result<()> {
        self.place_mines_with_rng(start, &mut rand::rng())
    }

    pub fn place_mines_with_rng<R: Rng>(&mut self, start: Pos, rng: &mut R) -> Result<()> {
        self.index_of(start)?;
        if self.mines_placed() {
            return Err(BoardError::AlreadyInitialized);
        }

        let mask = generate_mines(&self.config, start, rng);
        self.arm(&mask);
        Ok(())
    }

    pub fn reveal(&mut self, pos: Pos) -> Result<GameStatus> {
        self.reveal_with_rng(pos, &mut rand::rng())
    }

    pub fn reveal_with_rng<R: Rng>(&mut self, pos: Pos, rng: &mut R) -> Result<GameStatus> {
        self.reveal_into(pos, rng, &mut Vec::new())
    }

    /// Reveals `pos`, appending every cell uncovered by this call to `updates`.
    ///
    /// Places mines first when this is the first reveal of the game, using `pos` as the
    /// safe cell. Revealed and flagged cells are left alone, and a finished board is
    /// never modified.
    pub fn reveal_into<R: Rng>(
        &mut self,
        pos: Pos,
        rng: &mut R,
        updates: &mut Vec<Pos>,
    ) -> Result<GameStatus> {
        let index = self.index_of(pos)?;
        if self.is_finished() || self.tiles[index].revealed != RevealedState::Hidden {
            return Ok(self.status());
        }

        if self.state.is_ready() {
            self.place_mines_with_rng(pos, rng)?;
        }

        if self.tiles[index].mine {
            self.tiles[index].revealed = RevealedState::Revealed;
            updates.push(pos);
            self.triggered_mine = Some(pos);
            self.state = EngineState::Lost;
            info!("Stepped on mine at ({}, {})", pos.x, pos.y);
            return Ok(self.status());
        }

        self.flood_reveal(index, updates);
        self.check_victory();
        Ok(self.status())
    }

    /// Flips the flag on a hidden cell. Revealed cells and finished boards are unchanged.
    pub fn toggle_flag(&mut self, pos: Pos) -> Result<GameStatus> {
        let index = self.index_of(pos)?;
        if self.is_finished() {
            return Ok(self.status());
        }

        let tile = &mut self.tiles[index];
        match tile.revealed {
            RevealedState::Hidden => {
                tile.revealed = RevealedState::Flagged;
                self.flagged += 1;
                debug!("Cell ({}, {}) flagged", pos.x, pos.y);
            }
            RevealedState::Flagged => {
                tile.revealed = RevealedState::Hidden;
                self.flagged -= 1;
                debug!("Cell ({}, {}) unflagged", pos.x, pos.y);
            }
            RevealedState::Revealed => {}
        }

        self.check_victory();
        Ok(self.status())
    }

    /// Uncovers every mine for end-of-game display and returns their positions. Does not
    /// change the status and does nothing while the game is still running.
    pub fn reveal_all_mines(&mut self) -> Vec<Pos> {
        if !self.is_finished() {
            return Vec::new();
        }

        let width = self.config.width;
        let mut uncovered = Vec::new();
        for (i, tile) in self.tiles.iter_mut().enumerate() {
            if !tile.mine || tile.revealed == RevealedState::Revealed {
                continue;
            }
            if tile.revealed == RevealedState::Flagged {
                self.flagged -= 1;
            }
            tile.revealed = RevealedState::Revealed;
            uncovered.push(Pos::new(i % width, i / width));
        }
        uncovered
    }

    fn index_of(&self, pos: Pos) -> Result<usize> {
        if pos.x < self.config.width && pos.y < self.config.height {
            Ok(pos.x + pos.y * self.config.width)
        } else {
            Err(BoardError::OutOfBounds { x: pos.x, y: pos.y })
        }
    }

    fn pos_of(&self, index: usize) -> Pos {
        Pos::new(index % self.config.width, index / self.config.width)
    }

    fn arm(&mut self, mask: &[bool]) {
        for (tile, &mine) in self.tiles.iter_mut().zip(mask) {
            tile.mine = mine;
        }

        for index in 0..self.tiles.len() {
            if self.tiles[index].mine {
                continue;
            }
            let adjacent = self
                .neighbors(self.pos_of(index))
                .filter(|&pos| mask[pos.x + pos.y * self.config.width])
                .count();
            self.tiles[index].adjacent = adjacent as u8;
        }

        self.state = EngineState::Active;
    }

    /// Reveals the safe cell at `start` and, if it has no mined neighbors, the whole blank
    /// region around it together with its numbered border.
    fn flood_reveal(&mut self, start: usize, updates: &mut Vec<Pos>) {
        let mut visited = vec![false; self.tiles.len()];
        let mut to_visit = VecDeque::from([start]);
        visited[start] = true;

        while let Some(index) = to_visit.pop_front() {
            let pos = self.pos_of(index);
            let tile = &mut self.tiles[index];
            debug_assert!(!tile.mine, "flood fill reached a mine at {pos:?}");
            tile.revealed = RevealedState::Revealed;
            let adjacent = tile.adjacent;
            self.revealed += 1;
            updates.push(pos);

            if adjacent != 0 {
                continue;
            }

            for neighbor in self.neighbors(pos) {
                let neighbor_index = neighbor.x + neighbor.y * self.config.width;
                if visited[neighbor_index]
                    || self.tiles[neighbor_index].revealed != RevealedState::Hidden
                {
                    continue;
                }
                visited[neighbor_index] = true;
                to_visit.push_back(neighbor_index);
            }
        }
    }

    fn check_victory(&mut self) {
        if self.state == EngineState::Active && self.revealed == self.config.safe_cells() {
            self.state = EngineState::Won;
            info!(
                "Board {}x{} cleared",
                self.config.width, self.config.height
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;

    fn board(width: usize, height: usize, mines: &[(usize, usize)]) -> Board {
        let mines: Vec<Pos> = mines.iter().map(|&p| p.into()).collect();
        Board::from_mines(width, height, &mines).unwrap()
    }

    #[test]
    fn new_board_is_ready_and_blank() {
        let board = Board::new(BoardConfig::new(4, 3, 5).unwrap()).unwrap();

        assert_eq!(board.status(), GameStatus::InProgress);
        assert_eq!(board.state(), EngineState::Ready);
        assert!(!board.mines_placed());
        assert!(board.cells().all(|(_, cell)| cell == Cell::default()));
        assert_eq!(board.cells().count(), 12);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = BoardConfig {
            width: 2,
            height: 2,
            mines: 4,
        };
        assert!(matches!(
            Board::new(config),
            Err(BoardError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn from_mines_computes_adjacency() {
        let board = board(3, 3, &[(0, 0), (2, 2)]);

        assert_eq!(board.config().mines, 2);
        assert!(board.cell_at(Pos::new(0, 0)).unwrap().is_mine);
        assert_eq!(board.cell_at(Pos::new(0, 0)).unwrap().adjacent_mines, 0);
        assert_eq!(board.cell_at(Pos::new(1, 1)).unwrap().adjacent_mines, 2);
        assert_eq!(board.cell_at(Pos::new(2, 0)).unwrap().adjacent_mines, 0);
        assert_eq!(board.cell_at(Pos::new(1, 0)).unwrap().adjacent_mines, 1);
    }

    #[test]
    fn from_mines_rejects_out_of_bounds_and_full_boards() {
        assert_eq!(
            Board::from_mines(2, 2, &[Pos::new(2, 0)]),
            Err(BoardError::OutOfBounds { x: 2, y: 0 })
        );
        let all: Vec<Pos> = (0..4).map(|i| Pos::new(i % 2, i / 2)).collect();
        assert!(matches!(
            Board::from_mines(2, 2, &all),
            Err(BoardError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn place_mines_twice_is_an_error() {
        let mut board = Board::new(BoardConfig::default()).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);

        board.place_mines_with_rng(Pos::new(0, 0), &mut rng).unwrap();
        let before = board.clone();

        assert_eq!(
            board.place_mines_with_rng(Pos::new(5, 5), &mut rng),
            Err(BoardError::AlreadyInitialized)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn place_mines_checks_bounds_first() {
        let mut board = Board::new(BoardConfig::default()).unwrap();

        assert_eq!(
            board.place_mines(Pos::new(10, 0)),
            Err(BoardError::OutOfBounds { x: 10, y: 0 })
        );
        assert!(!board.mines_placed());
    }

    #[test]
    fn first_reveal_places_mines_around_it() {
        let mut board = Board::new(BoardConfig::new(8, 8, 10).unwrap()).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);

        let status = board.reveal_with_rng(Pos::new(3, 3), &mut rng).unwrap();

        assert_ne!(status, GameStatus::SteppedOnMine);
        assert!(board.mines_placed());
        let start = board.cell_at(Pos::new(3, 3)).unwrap();
        assert!(start.is_revealed);
        assert_eq!(start.adjacent_mines, 0);
        assert_eq!(board.cells().filter(|(_, cell)| cell.is_mine).count(), 10);
    }

    #[test]
    fn reveal_hits_mine_and_records_it() {
        let mut board = board(2, 2, &[(0, 0)]);

        let status = board.reveal(Pos::new(0, 0)).unwrap();

        assert_eq!(status, GameStatus::SteppedOnMine);
        assert_eq!(board.state(), EngineState::Lost);
        assert_eq!(board.triggered_mine(), Some(Pos::new(0, 0)));
        assert!(board.cell_at(Pos::new(0, 0)).unwrap().is_revealed);
    }

    #[test]
    fn reveal_flood_fill_opens_zero_region() {
        let mut board = board(3, 3, &[(2, 2)]);
        let mut updates = Vec::new();

        let status = board
            .reveal_into(Pos::new(0, 0), &mut rand::rng(), &mut updates)
            .unwrap();

        assert_eq!(status, GameStatus::Victory);
        assert_eq!(updates.len(), 8);
        assert_eq!(board.cell_at(Pos::new(1, 1)).unwrap().adjacent_mines, 1);
        assert!(!board.cell_at(Pos::new(2, 2)).unwrap().is_revealed);
    }

    #[test]
    fn flood_fill_stops_at_flags_and_numbers() {
        // Column of mines at x = 2 splits the board.
        let mut board = board(5, 3, &[(2, 0), (2, 1), (2, 2)]);
        board.toggle_flag(Pos::new(0, 2)).unwrap();

        let status = board.reveal(Pos::new(0, 0)).unwrap();

        assert_eq!(status, GameStatus::InProgress);
        let revealed: Vec<Pos> = board
            .cells()
            .filter(|(_, cell)| cell.is_revealed)
            .map(|(pos, _)| pos)
            .collect();
        assert_eq!(
            revealed,
            vec![
                Pos::new(0, 0),
                Pos::new(1, 0),
                Pos::new(0, 1),
                Pos::new(1, 1),
                Pos::new(1, 2),
            ]
        );
        assert!(board.cell_at(Pos::new(0, 2)).unwrap().is_flagged);
    }

    #[test]
    fn reveal_on_flagged_or_revealed_cell_is_a_no_op() {
        let mut board = board(3, 1, &[(2, 0)]);
        board.toggle_flag(Pos::new(0, 0)).unwrap();
        let before = board.clone();

        assert_eq!(board.reveal(Pos::new(0, 0)), Ok(GameStatus::InProgress));
        assert_eq!(board, before);

        board.reveal(Pos::new(1, 0)).unwrap();
        let before = board.clone();
        assert_eq!(board.reveal(Pos::new(1, 0)), Ok(GameStatus::InProgress));
        assert_eq!(board, before);
    }

    #[test]
    fn reveal_on_flag_before_first_move_keeps_mines_unplaced() {
        let mut board = Board::new(BoardConfig::default()).unwrap();
        board.toggle_flag(Pos::new(4, 4)).unwrap();

        board.reveal(Pos::new(4, 4)).unwrap();

        assert!(!board.mines_placed());
        assert!(!board.cell_at(Pos::new(4, 4)).unwrap().is_revealed);
    }

    #[test]
    fn toggle_flag_round_trips_and_skips_revealed_cells() {
        let mut board = board(3, 1, &[(2, 0)]);
        let before = board.clone();

        board.toggle_flag(Pos::new(0, 0)).unwrap();
        assert!(board.cell_at(Pos::new(0, 0)).unwrap().is_flagged);
        assert_eq!(board.mines_left(), 0);
        board.toggle_flag(Pos::new(0, 0)).unwrap();
        assert_eq!(board, before);

        board.reveal(Pos::new(1, 0)).unwrap();
        board.toggle_flag(Pos::new(1, 0)).unwrap();
        assert!(!board.cell_at(Pos::new(1, 0)).unwrap().is_flagged);
    }

    #[test]
    fn flagging_before_first_reveal_does_not_place_mines() {
        let mut board = Board::new(BoardConfig::default()).unwrap();

        assert_eq!(
            board.toggle_flag(Pos::new(0, 0)),
            Ok(GameStatus::InProgress)
        );
        assert!(!board.mines_placed());
        assert_eq!(board.flagged_count(), 1);
    }

    #[test]
    fn finished_board_ignores_moves() {
        let mut board = board(2, 2, &[(0, 0)]);
        board.reveal(Pos::new(0, 0)).unwrap();
        let before = board.clone();

        assert_eq!(
            board.reveal(Pos::new(1, 1)),
            Ok(GameStatus::SteppedOnMine)
        );
        assert_eq!(
            board.toggle_flag(Pos::new(1, 0)),
            Ok(GameStatus::SteppedOnMine)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn won_board_ignores_moves() {
        let mut board = board(3, 1, &[(2, 0)]);
        assert_eq!(board.reveal(Pos::new(0, 0)), Ok(GameStatus::Victory));
        let before = board.clone();

        assert_eq!(board.toggle_flag(Pos::new(2, 0)), Ok(GameStatus::Victory));
        assert_eq!(board.reveal(Pos::new(2, 0)), Ok(GameStatus::Victory));
        assert_eq!(board, before);
        assert_eq!(board.flagged_count(), 0);
    }

    #[test]
    fn out_of_bounds_is_reported_without_changes() {
        let mut board = board(2, 2, &[(0, 0)]);
        let before = board.clone();

        assert_eq!(
            board.reveal(Pos::new(2, 0)),
            Err(BoardError::OutOfBounds { x: 2, y: 0 })
        );
        assert_eq!(
            board.toggle_flag(Pos::new(0, 5)),
            Err(BoardError::OutOfBounds { x: 0, y: 5 })
        );
        assert!(board.cell_at(Pos::new(9, 9)).is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn victory_needs_every_safe_cell_but_no_flags() {
        let mut board = board(4, 1, &[(0, 0)]);

        assert_eq!(board.reveal(Pos::new(1, 0)), Ok(GameStatus::InProgress));
        assert_eq!(board.reveal(Pos::new(3, 0)), Ok(GameStatus::Victory));
        assert_eq!(board.revealed_count(), 3);
        assert_eq!(board.flagged_count(), 0);
    }

    #[test]
    fn reveal_all_mines_only_after_the_game_ends() {
        let mut board = board(3, 3, &[(0, 0), (2, 2)]);
        assert!(board.reveal_all_mines().is_empty());

        board.toggle_flag(Pos::new(2, 2)).unwrap();
        board.reveal(Pos::new(0, 0)).unwrap();
        let uncovered = board.reveal_all_mines();

        assert_eq!(uncovered, vec![Pos::new(2, 2)]);
        assert_eq!(board.status(), GameStatus::SteppedOnMine);
        assert_eq!(board.flagged_count(), 0);
        assert!(
            board
                .cells()
                .filter(|(_, cell)| cell.is_mine)
                .all(|(_, cell)| cell.is_revealed && !cell.is_flagged)
        );
    }
}
