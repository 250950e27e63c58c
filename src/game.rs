use crate::board::{Board, Color, Snapshot, Square};
use crate::error::{ChessError, Result};
use crate::movegen::Move;
use crate::rules::{self, GameStatus};
use crate::search::Search;
use tracing::{debug, warn};

/// A move request that went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub mv: Move,
    pub captured: bool,
}

pub struct Game {
    board: Board,
    side_to_move: Color,
    search: Search,
}

impl Game {
    pub fn new() -> Self {
        Self::from_board(Board::new(), Color::White)
    }

    pub fn with_depth(depth: u32) -> Self {
        let mut game = Self::new();
        game.search.set_max_depth(depth);
        game
    }

    /// Start from an arbitrary position.
    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        Self {
            board,
            side_to_move,
            search: Search::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn search_mut(&mut self) -> &mut Search {
        &mut self.search
    }

    pub fn snapshot(&self) -> Snapshot {
        self.board.snapshot()
    }

    /// Move the piece on `from` to `to` for `color`.
    ///
    /// On success the turn passes to the other side. Any error leaves the
    /// game untouched; only `MissingKing` is fatal.
    pub fn request_move(&mut self, from: Square, to: Square, color: Color) -> Result<Applied> {
        if color != self.side_to_move {
            warn!(%from, %to, %color, "move requested out of turn");
            return Err(ChessError::WrongSideToMove {
                square: from,
                color: self.side_to_move,
            });
        }

        let mv = rules::validate_move(&self.board, from, to, color).map_err(|err| {
            if !err.is_fatal() {
                warn!(%from, %to, %err, "move rejected");
            }
            err
        })?;
        Ok(self.apply(mv))
    }

    fn apply(&mut self, mv: Move) -> Applied {
        let captured = self.board.make_move(mv).is_some();
        debug!(%mv, captured, color = %self.side_to_move, "move applied");
        self.side_to_move = self.side_to_move.opposite();
        Applied { mv, captured }
    }

    /// Whether the side to move is in check, and which side that is.
    pub fn status(&self) -> Result<(bool, Color)> {
        let color = self.side_to_move;
        Ok((rules::is_in_check(&self.board, color)?, color))
    }

    pub fn game_status(&self) -> Result<GameStatus> {
        rules::game_status(&self.board, self.side_to_move)
    }

    pub fn legal_moves(&self) -> Result<Vec<Move>> {
        rules::legal_moves(&self.board, self.side_to_move)
    }

    /// Let the engine choose and play a move for the side to move.
    pub fn engine_move(&mut self) -> Result<Option<Applied>> {
        let color = self.side_to_move;
        match self.search.find_best_move(&self.board, color)? {
            Some(mv) => Ok(Some(self.apply(mv))),
            None => Ok(None),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
