pub mod board;
pub mod error;
pub mod movegen;
pub mod rules;
pub mod evaluation;
pub mod search;
pub mod game;

pub use board::{Board, Color, Piece, PieceKind, Snapshot, Square};
pub use error::{ChessError, IllegalReason, Result};
pub use game::{Applied, Game};
pub use movegen::{Move, MoveKind};
pub use rules::GameStatus;
