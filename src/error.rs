use crate::board::{Color, Square};
use thiserror::Error;

/// Why a pseudo-legal or requested move was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalReason {
    #[error("that piece cannot move there")]
    NotInPattern,

    #[error("the path is blocked")]
    PathBlocked,

    #[error("the destination holds one of your own pieces")]
    OwnPieceAtDestination,

    #[error("the move would leave your king in check")]
    LeavesKingInCheck,

    #[error("a king cannot be captured")]
    KingCapture,

    #[error("the king has already moved")]
    KingHasMoved,

    #[error("there is no unmoved rook to castle with")]
    NoCastlingRook,

    #[error("there are pieces between the king and the rook")]
    CastlePathBlocked,

    #[error("the king cannot castle out of, through or into check")]
    CastleThroughCheck,
}

/// Errors that can occur in the rules engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Coordinate outside the board
    #[error("invalid square ({row}, {col}): coordinates must be 0-7")]
    InvalidSquare { row: i8, col: i8 },

    /// Text that does not name a square, e.g. "i9" or "e"
    #[error("'{0}' is not a square (expected a file a-h and a rank 1-8, like e4)")]
    SquareName(String),

    #[error("there is no piece on {0}")]
    NoPieceAtOrigin(Square),

    /// Piece belongs to the side that is not on move
    #[error("the piece on {square} does not belong to {color}")]
    WrongSideToMove { square: Square, color: Color },

    #[error("illegal move {from}-{to}: {reason}")]
    IllegalMove {
        from: Square,
        to: Square,
        reason: IllegalReason,
    },

    /// A king is absent from the board. Never recoverable.
    #[error("the {0} king is missing from the board")]
    MissingKing(Color),
}

impl ChessError {
    /// Fatal errors mean the board invariants no longer hold and the game must stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ChessError::MissingKing(_))
    }
}

/// Result type alias for rules engine operations
pub type Result<T> = std::result::Result<T, ChessError>;
