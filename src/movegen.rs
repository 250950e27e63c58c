use std::fmt;

use crate::board::{Board, Piece, PieceKind, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    /// King steps two squares sideways; the rook follows.
    Castle,
    Promotion(PieceKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Normal,
        }
    }

    pub fn new_castling(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Castle,
        }
    }

    pub fn new_promotion(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Promotion(PieceKind::Queen),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let MoveKind::Promotion(_) = self.kind {
            write!(f, "q")?;
        }
        Ok(())
    }
}

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Squares `piece` could move to on `board`, ignoring whether its own king
/// would be left in check. Castling candidates are included unvalidated.
pub fn pseudo_legal_destinations(board: &Board, piece: &Piece) -> Vec<Square> {
    match piece.kind {
        PieceKind::Pawn => pawn_destinations(board, piece),
        PieceKind::Knight => step_destinations(board, piece, &KNIGHT_OFFSETS),
        PieceKind::Bishop => slide_destinations(board, piece, &BISHOP_DIRECTIONS),
        PieceKind::Rook => slide_destinations(board, piece, &ROOK_DIRECTIONS),
        PieceKind::Queen => slide_destinations(board, piece, &QUEEN_DIRECTIONS),
        PieceKind::King => king_destinations(board, piece),
    }
}

/// Pseudo-legal destinations tagged with their move kind.
pub fn pseudo_legal_moves(board: &Board, piece: &Piece) -> Vec<Move> {
    pseudo_legal_destinations(board, piece)
        .into_iter()
        .map(|to| classify(piece, to))
        .collect()
}

/// The move `piece` makes by going to `to`: a two-square king step is a castle,
/// a pawn reaching the far rank promotes to a queen.
pub fn classify(piece: &Piece, to: Square) -> Move {
    let from = piece.pos;
    match piece.kind {
        PieceKind::King if (to.col() as i8 - from.col() as i8).abs() == 2 && to.row() == from.row() => {
            Move::new_castling(from, to)
        }
        PieceKind::Pawn if to.row() == piece.color.opposite().back_rank() => {
            Move::new_promotion(from, to)
        }
        _ => Move::new(from, to),
    }
}

/// Squares strictly between `from` and `to` when they share a rank, file or
/// diagonal. Empty otherwise, or when the squares are adjacent.
pub fn squares_between(from: Square, to: Square) -> Vec<Square> {
    let dr = to.row() as i8 - from.row() as i8;
    let dc = to.col() as i8 - from.col() as i8;
    if (dr == 0 && dc == 0) || (dr != 0 && dc != 0 && dr.abs() != dc.abs()) {
        return Vec::new();
    }
    // Unit step toward `to`
    let (step_r, step_c) = (dr.signum(), dc.signum());
    let mut squares = Vec::new();
    let mut current = from.offset(step_r, step_c);
    while let Some(square) = current {
        if square == to {
            break;
        }
        squares.push(square);
        current = square.offset(step_r, step_c);
    }
    squares
}

pub fn is_path_clear(board: &Board, from: Square, to: Square) -> bool {
    squares_between(from, to).into_iter().all(|sq| board.is_empty(sq))
}

fn slide_destinations(board: &Board, piece: &Piece, directions: &[(i8, i8)]) -> Vec<Square> {
    let mut destinations = Vec::new();
    for &(dr, dc) in directions {
        // Walk the ray until the edge or the first piece
        let mut current = piece.pos.offset(dr, dc);
        while let Some(target) = current {
            match board.color_at(target) {
                None => destinations.push(target),
                Some(color) => {
                    // Enemy piece can be captured, own piece cannot
                    if color != piece.color {
                        destinations.push(target);
                    }
                    break;
                }
            }
            current = target.offset(dr, dc);
        }
    }
    destinations
}

fn step_destinations(board: &Board, piece: &Piece, offsets: &[(i8, i8)]) -> Vec<Square> {
    offsets
        .iter()
        .filter_map(|&(dr, dc)| piece.pos.offset(dr, dc))
        .filter(|&target| board.color_at(target) != Some(piece.color))
        .collect()
}

fn pawn_destinations(board: &Board, piece: &Piece) -> Vec<Square> {
    let mut destinations = Vec::new();
    let forward = piece.color.forward();

    // Single push, then the double push from an unmoved pawn
    if let Some(one) = piece.pos.offset(forward, 0) {
        if board.is_empty(one) {
            destinations.push(one);
            if !piece.moved {
                if let Some(two) = one.offset(forward, 0) {
                    if board.is_empty(two) {
                        destinations.push(two);
                    }
                }
            }
        }
    }

    // Diagonal captures only
    for dc in [-1, 1] {
        if let Some(target) = piece.pos.offset(forward, dc) {
            if board.color_at(target) == Some(piece.color.opposite()) {
                destinations.push(target);
            }
        }
    }
    destinations
}

fn king_destinations(board: &Board, piece: &Piece) -> Vec<Square> {
    let mut destinations = step_destinations(board, piece, &KING_OFFSETS);
    // Castling candidates; rook and safety checks happen in the rules
    if !piece.moved {
        for dc in [2, -2] {
            if let Some(target) = piece.pos.offset(0, dc) {
                if board.is_empty(target) {
                    destinations.push(target);
                }
            }
        }
    }
    destinations
}
