use crate::board::{Board, Color, PieceKind};

/// Score handed to a checkmated side; beyond any reachable material difference.
pub const MATE_SCORE: i32 = 100_000;

pub struct Evaluator {
    // Piece values
    pub pawn_value: i32,
    pub knight_value: i32,
    pub bishop_value: i32,
    pub rook_value: i32,
    pub queen_value: i32,
    /// Outweighs all other material combined. Both kings are always present,
    /// so it cancels out in every evaluated position.
    pub king_value: i32,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            pawn_value: 1,
            knight_value: 3,
            bishop_value: 3,
            rook_value: 5,
            queen_value: 9,
            king_value: 1000,
        }
    }

    pub fn piece_value(&self, kind: PieceKind) -> i32 {
        match kind {
            PieceKind::Pawn => self.pawn_value,
            PieceKind::Knight => self.knight_value,
            PieceKind::Bishop => self.bishop_value,
            PieceKind::Rook => self.rook_value,
            PieceKind::Queen => self.queen_value,
            PieceKind::King => self.king_value,
        }
    }

    pub fn material(&self, board: &Board, color: Color) -> i32 {
        board
            .pieces(color)
            .map(|piece| self.piece_value(piece.kind))
            .sum()
    }

    /// White material minus Black material; positive favors White.
    pub fn evaluate(&self, board: &Board) -> i32 {
        self.material(board, Color::White) - self.material(board, Color::Black)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
