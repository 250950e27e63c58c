use std::fmt;
use std::str::FromStr;

use crate::error::{ChessError, Result};
use crate::movegen::{Move, MoveKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Rook, Bishop and Queen move along rays until blocked.
    pub fn is_slider(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen)
    }

    pub fn symbol(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        };
        match color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Row step a pawn of this color advances by.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub(crate) fn pawn_start_row(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// A board coordinate. Row 0 is White's back rank (rank 1), column 0 is the a-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    pub fn new(row: i8, col: i8) -> Result<Self> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Ok(Self::at(row as u8, col as u8))
        } else {
            Err(ChessError::InvalidSquare { row, col })
        }
    }

    /// Unchecked constructor for coordinates already known to be on the board.
    pub(crate) const fn at(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// The square `(dr, dc)` away, if it is still on the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Square> {
        Square::new(self.row as i8 + dr, self.col as i8 + dc).ok()
    }

    /// All 64 squares, row by row starting from a1.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square::at(row, col)))
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        let bytes = name.as_bytes();
        if bytes.len() == 2 {
            let col = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
            let row = bytes[1].wrapping_sub(b'1');
            if row < 8 && col < 8 {
                return Ok(Square::at(row, col));
            }
        }
        Err(ChessError::SquareName(name.to_string()))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub pos: Square,
    pub moved: bool,
}

/// Read-only view of the grid for rendering, indexed `[row][col]`.
pub type Snapshot = [[Option<(PieceKind, Color)>; 8]; 8];

/// The position: an 8x8 grid of pieces plus per-color caches.
///
/// `pieces` and `kings` mirror the grid and are only touched through
/// `put`/`take`, so they never drift from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
    pieces: [Vec<Square>; 2],
    kings: [Option<Square>; 2],
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// Standard starting layout.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            let back = color.back_rank();
            let pawns = color.pawn_start_row();
            for (col, &kind) in BACK_RANK.iter().enumerate() {
                board.place(kind, color, Square::at(back, col as u8));
                board.place(PieceKind::Pawn, color, Square::at(pawns, col as u8));
            }
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            grid: [[None; 8]; 8],
            pieces: [Vec::with_capacity(16), Vec::with_capacity(16)],
            kings: [None, None],
        }
    }

    /// Put a fresh (unmoved) piece on `square`, replacing whatever stood there.
    /// A color has at most one king; placing a second one relocates it.
    pub fn place(&mut self, kind: PieceKind, color: Color, square: Square) -> &mut Self {
        self.take(square);
        if kind == PieceKind::King {
            if let Some(old) = self.kings[color.index()] {
                self.take(old);
            }
        }
        self.put(Piece {
            kind,
            color,
            pos: square,
            moved: false,
        });
        self
    }

    /// Flag the piece on `square` as having moved before.
    pub fn mark_moved(&mut self, square: Square) -> &mut Self {
        if let Some(piece) = self.cell_mut(square) {
            piece.moved = true;
        }
        self
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.grid[square.row as usize][square.col as usize]
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|p| p.color)
    }

    /// Every piece of `color`, in no particular order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.pieces[color.index()]
            .iter()
            .filter_map(move |&sq| self.piece_at(sq))
    }

    pub fn king_square(&self, color: Color) -> Result<Square> {
        self.kings[color.index()].ok_or_else(|| {
            tracing::error!(%color, "king missing from board");
            ChessError::MissingKing(color)
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = [[None; 8]; 8];
        for square in Square::all() {
            snapshot[square.row as usize][square.col as usize] =
                self.piece_at(square).map(|p| (p.kind, p.color));
        }
        snapshot
    }

    /// Apply `mv` without any legality checking and return the captured piece.
    ///
    /// Callers validate first; the mutation itself cannot fail part way, so a
    /// castle always relocates king and rook together.
    pub fn make_move(&mut self, mv: Move) -> Option<Piece> {
        let mut piece = self.take(mv.from)?;
        let captured = self.take(mv.to);

        if let MoveKind::Promotion(kind) = mv.kind {
            piece.kind = kind;
        }
        piece.pos = mv.to;
        piece.moved = true;
        self.put(piece);

        if mv.kind == MoveKind::Castle {
            let row = mv.from.row;
            let (rook_from, rook_to) = if mv.to.col > mv.from.col {
                (Square::at(row, 7), Square::at(row, mv.to.col - 1))
            } else {
                (Square::at(row, 0), Square::at(row, mv.to.col + 1))
            };
            if let Some(mut rook) = self.take(rook_from) {
                rook.pos = rook_to;
                rook.moved = true;
                self.put(rook);
            }
        }

        captured
    }

    fn cell_mut(&mut self, square: Square) -> &mut Option<Piece> {
        &mut self.grid[square.row as usize][square.col as usize]
    }

    fn put(&mut self, piece: Piece) {
        let square = piece.pos;
        *self.cell_mut(square) = Some(piece);
        self.pieces[piece.color.index()].push(square);
        if piece.kind == PieceKind::King {
            self.kings[piece.color.index()] = Some(square);
        }
    }

    fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.cell_mut(square).take()?;
        let list = &mut self.pieces[piece.color.index()];
        if let Some(i) = list.iter().position(|&sq| sq == square) {
            list.swap_remove(i);
        }
        if piece.kind == PieceKind::King {
            self.kings[piece.color.index()] = None;
        }
        Some(piece)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for row in (0..8u8).rev() {
            write!(f, "{} ", row + 1)?;
            for col in 0..8u8 {
                let c = match self.piece_at(Square::at(row, col)) {
                    Some(piece) => piece.kind.symbol(piece.color),
                    None => '.',
                };
                write!(f, "{}", c)?;
                if col < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f, " {}", row + 1)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
