use crate::board::{Board, Color, Piece, PieceKind, Square};
use crate::error::{ChessError, IllegalReason, Result};
use crate::movegen::{
    classify, is_path_clear, pseudo_legal_destinations, pseudo_legal_moves, squares_between, Move,
    MoveKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    /// No legal move while not in check.
    Stalemate,
}

/// Squares of the `color.opposite()` pieces that attack `color`'s king.
///
/// Both kings must be on the board.
pub fn attackers(board: &Board, color: Color) -> Result<Vec<Square>> {
    let king = board.king_square(color)?;
    board.king_square(color.opposite())?;
    Ok(attackers_of(board, king, color.opposite()))
}

pub fn is_in_check(board: &Board, color: Color) -> Result<bool> {
    Ok(!attackers(board, color)?.is_empty())
}

fn attackers_of(board: &Board, target: Square, by: Color) -> Vec<Square> {
    board
        .pieces(by)
        .filter(|piece| pseudo_legal_destinations(board, piece).contains(&target))
        .map(|piece| piece.pos)
        .collect()
}

/// Play `mv` on a copy and report whether `color`'s king is safe there.
fn leaves_king_safe(board: &Board, mv: Move, color: Color) -> Result<bool> {
    let mut next = board.clone();
    next.make_move(mv);
    Ok(!is_in_check(&next, color)?)
}

/// Why the pseudo-legal `mv` of `piece` is not legal, or `None` if it is.
fn rejection(board: &Board, piece: &Piece, mv: Move) -> Result<Option<IllegalReason>> {
    if let Some(target) = board.piece_at(mv.to) {
        if target.kind == PieceKind::King {
            return Ok(Some(IllegalReason::KingCapture));
        }
    }
    if mv.kind == MoveKind::Castle {
        if let Some(reason) = castle_obstacle(board, piece, mv.to)? {
            return Ok(Some(reason));
        }
    }
    if !leaves_king_safe(board, mv, piece.color)? {
        return Ok(Some(IllegalReason::LeavesKingInCheck));
    }
    Ok(None)
}

/// Everything that stops `king` castling to `to`, checked in rule order.
fn castle_obstacle(board: &Board, king: &Piece, to: Square) -> Result<Option<IllegalReason>> {
    let home = Square::at(king.color.back_rank(), 4);
    if king.moved || king.pos != home {
        return Ok(Some(IllegalReason::KingHasMoved));
    }

    let kingside = to.col() > king.pos.col();
    let rook_square = Square::at(home.row(), if kingside { 7 } else { 0 });
    let rook_ready = matches!(
        board.piece_at(rook_square),
        Some(rook) if rook.kind == PieceKind::Rook && rook.color == king.color && !rook.moved
    );
    if !rook_ready {
        return Ok(Some(IllegalReason::NoCastlingRook));
    }

    if !is_path_clear(board, king.pos, rook_square) {
        return Ok(Some(IllegalReason::CastlePathBlocked));
    }

    // Start, transit and destination squares must all be safe for the king.
    let step: i8 = if kingside { 1 } else { -1 };
    if is_in_check(board, king.color)? {
        return Ok(Some(IllegalReason::CastleThroughCheck));
    }
    for distance in 1..=2 {
        let Some(square) = king.pos.offset(0, step * distance) else {
            return Ok(Some(IllegalReason::NotInPattern));
        };
        if !leaves_king_safe(board, Move::new(king.pos, square), king.color)? {
            return Ok(Some(IllegalReason::CastleThroughCheck));
        }
    }
    Ok(None)
}

/// Whether the king on `king_square` may castle to `to` right now.
pub fn can_castle(board: &Board, king_square: Square, to: Square) -> Result<bool> {
    match board.piece_at(king_square) {
        Some(king) if king.kind == PieceKind::King => {
            Ok(castle_obstacle(board, &king, to)?.is_none())
        }
        _ => Ok(false),
    }
}

/// Best guess at why `piece` cannot reach `to` by its movement pattern.
fn pattern_rejection(board: &Board, piece: &Piece, to: Square) -> IllegalReason {
    if board.color_at(to) == Some(piece.color) {
        return IllegalReason::OwnPieceAtDestination;
    }
    let dr = to.row() as i8 - piece.pos.row() as i8;
    let dc = to.col() as i8 - piece.pos.col() as i8;
    let straight = dr == 0 || dc == 0;
    let diagonal = dr.abs() == dc.abs();
    let on_line = match piece.kind {
        PieceKind::Rook => straight,
        PieceKind::Bishop => diagonal,
        PieceKind::Queen => straight || diagonal,
        PieceKind::Pawn => dc == 0 && dr == 2 * piece.color.forward() && !piece.moved,
        _ => false,
    };
    if on_line && !is_path_clear(board, piece.pos, to) {
        return IllegalReason::PathBlocked;
    }
    if piece.kind == PieceKind::King && dr == 0 && dc.abs() == 2 && piece.moved {
        return IllegalReason::KingHasMoved;
    }
    IllegalReason::NotInPattern
}

/// Turn a move request into a legal `Move`, or say why it is refused.
///
/// Never mutates `board`.
pub fn validate_move(board: &Board, from: Square, to: Square, color: Color) -> Result<Move> {
    let piece = board
        .piece_at(from)
        .ok_or(ChessError::NoPieceAtOrigin(from))?;
    if piece.color != color {
        return Err(ChessError::WrongSideToMove {
            square: from,
            color,
        });
    }

    let illegal = |reason| ChessError::IllegalMove { from, to, reason };

    if !pseudo_legal_destinations(board, &piece).contains(&to) {
        return Err(illegal(pattern_rejection(board, &piece, to)));
    }
    let mv = classify(&piece, to);
    match rejection(board, &piece, mv)? {
        Some(reason) => Err(illegal(reason)),
        None => Ok(mv),
    }
}

/// Legal moves of the piece on `square`; empty when the square is empty.
pub fn legal_moves_from(board: &Board, square: Square) -> Result<Vec<Move>> {
    let Some(piece) = board.piece_at(square) else {
        return Ok(Vec::new());
    };
    let mut moves = Vec::new();
    for mv in pseudo_legal_moves(board, &piece) {
        if rejection(board, &piece, mv)?.is_none() {
            moves.push(mv);
        }
    }
    Ok(moves)
}

/// All legal moves for `color`, origins in a1..h8 order.
pub fn legal_moves(board: &Board, color: Color) -> Result<Vec<Move>> {
    board.king_square(color)?;
    let mut moves = Vec::new();
    for square in Square::all() {
        if board.color_at(square) == Some(color) {
            moves.extend(legal_moves_from(board, square)?);
        }
    }
    Ok(moves)
}

/// True when `color` is in check and can neither step away, capture a lone
/// attacker, nor block a lone sliding attacker. Double check only allows
/// the king to move.
pub fn is_checkmate(board: &Board, color: Color) -> Result<bool> {
    let king_square = board.king_square(color)?;
    let checkers = attackers(board, color)?;
    if checkers.is_empty() {
        return Ok(false);
    }

    let king = board
        .piece_at(king_square)
        .ok_or(ChessError::MissingKing(color))?;

    // Can the king step out of check?
    for mv in pseudo_legal_moves(board, &king) {
        if mv.kind == MoveKind::Normal && rejection(board, &king, mv)?.is_none() {
            return Ok(false);
        }
    }

    // Double check: nothing else helps
    if checkers.len() > 1 {
        return Ok(true);
    }

    // Capture the checker, or block a sliding one
    let checker_square = checkers[0];
    let mut targets = vec![checker_square];
    if let Some(checker) = board.piece_at(checker_square) {
        if checker.kind.is_slider() {
            targets.extend(squares_between(checker_square, king_square));
        }
    }

    let defenders: Vec<Piece> = board
        .pieces(color)
        .filter(|piece| piece.kind != PieceKind::King)
        .collect();
    for defender in &defenders {
        for mv in pseudo_legal_moves(board, defender) {
            if targets.contains(&mv.to) && rejection(board, defender, mv)?.is_none() {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

pub fn is_stalemate(board: &Board, color: Color) -> Result<bool> {
    Ok(!is_in_check(board, color)? && legal_moves(board, color)?.is_empty())
}

/// Status of `color`, the side about to move.
pub fn game_status(board: &Board, color: Color) -> Result<GameStatus> {
    if is_checkmate(board, color)? {
        Ok(GameStatus::Checkmate)
    } else if is_in_check(board, color)? {
        Ok(GameStatus::Check)
    } else if legal_moves(board, color)?.is_empty() {
        Ok(GameStatus::Stalemate)
    } else {
        Ok(GameStatus::Ongoing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn castling_board() -> Board {
        let mut board = Board::empty();
        board
            .place(PieceKind::King, Color::White, sq("e1"))
            .place(PieceKind::Rook, Color::White, sq("h1"))
            .place(PieceKind::Rook, Color::White, sq("a1"))
            .place(PieceKind::King, Color::Black, sq("e8"));
        board
    }

    #[test]
    fn test_check_and_attackers() {
        let mut board = Board::empty();
        board
            .place(PieceKind::King, Color::White, sq("e1"))
            .place(PieceKind::King, Color::Black, sq("e8"))
            .place(PieceKind::Rook, Color::Black, sq("e5"))
            .place(PieceKind::Knight, Color::Black, sq("d3"));
        let mut found = attackers(&board, Color::White).unwrap();
        found.sort();
        assert_eq!(found, vec![sq("d3"), sq("e5")]);
        assert!(is_in_check(&board, Color::White).unwrap());
        assert!(!is_in_check(&board, Color::Black).unwrap());

        board.place(PieceKind::Pawn, Color::White, sq("e2"));
        assert_eq!(attackers(&board, Color::White).unwrap(), vec![sq("d3")]);
    }

    #[test]
    fn test_missing_king_is_reported() {
        let mut board = Board::empty();
        board.place(PieceKind::King, Color::White, sq("e1"));
        assert_eq!(
            is_in_check(&board, Color::Black),
            Err(ChessError::MissingKing(Color::Black))
        );
        assert_eq!(
            legal_moves(&board, Color::White),
            Err(ChessError::MissingKing(Color::Black))
        );
        assert!(ChessError::MissingKing(Color::Black).is_fatal());
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        let mut board = Board::empty();
        board
            .place(PieceKind::King, Color::White, sq("e1"))
            .place(PieceKind::Bishop, Color::White, sq("e2"))
            .place(PieceKind::Rook, Color::Black, sq("e7"))
            .place(PieceKind::King, Color::Black, sq("a8"));
        assert!(legal_moves_from(&board, sq("e2")).unwrap().is_empty());
        assert_eq!(
            validate_move(&board, sq("e2"), sq("d3"), Color::White),
            Err(ChessError::IllegalMove {
                from: sq("e2"),
                to: sq("d3"),
                reason: IllegalReason::LeavesKingInCheck,
            })
        );
    }

    #[test]
    fn test_king_never_moves_into_check() {
        let mut board = Board::empty();
        board
            .place(PieceKind::King, Color::White, sq("d4"))
            .place(PieceKind::Rook, Color::Black, sq("a5"))
            .place(PieceKind::Bishop, Color::Black, sq("g6"))
            .place(PieceKind::Knight, Color::Black, sq("f1"))
            .place(PieceKind::King, Color::Black, sq("h8"))
            .mark_moved(sq("d4"));
        let moves = legal_moves_from(&board, sq("d4")).unwrap();
        assert!(!moves.is_empty());
        for mv in moves {
            let mut next = board.clone();
            next.make_move(mv);
            assert!(!is_in_check(&next, Color::White).unwrap(), "{}", mv);
        }
    }

    #[test]
    fn test_validate_move_reasons() {
        let board = Board::new();
        assert_eq!(
            validate_move(&board, sq("e4"), sq("e5"), Color::White),
            Err(ChessError::NoPieceAtOrigin(sq("e4")))
        );
        assert_eq!(
            validate_move(&board, sq("e7"), sq("e5"), Color::White),
            Err(ChessError::WrongSideToMove {
                square: sq("e7"),
                color: Color::White,
            })
        );
        let reason = |from: &str, to: &str| match validate_move(&board, sq(from), sq(to), Color::White) {
            Err(ChessError::IllegalMove { reason, .. }) => reason,
            other => panic!("expected an illegal move, got {:?}", other),
        };
        assert_eq!(reason("a1", "a4"), IllegalReason::PathBlocked);
        assert_eq!(reason("c1", "e3"), IllegalReason::PathBlocked);
        assert_eq!(reason("d1", "d2"), IllegalReason::OwnPieceAtDestination);
        assert_eq!(reason("b1", "b3"), IllegalReason::NotInPattern);
        assert_eq!(reason("e1", "g1"), IllegalReason::OwnPieceAtDestination);
        assert_eq!(reason("e2", "e5"), IllegalReason::NotInPattern);
        assert_eq!(
            validate_move(&board, sq("g1"), sq("f3"), Color::White),
            Ok(Move::new(sq("g1"), sq("f3")))
        );
    }

    #[test]
    fn test_castling_allowed() {
        let board = castling_board();
        assert!(can_castle(&board, sq("e1"), sq("g1")).unwrap());
        assert!(can_castle(&board, sq("e1"), sq("c1")).unwrap());
        let moves = legal_moves_from(&board, sq("e1")).unwrap();
        assert!(moves.contains(&Move::new_castling(sq("e1"), sq("g1"))));
        assert!(moves.contains(&Move::new_castling(sq("e1"), sq("c1"))));
    }

    #[test]
    fn test_castling_rejections() {
        let mut board = castling_board();
        board.mark_moved(sq("h1"));
        assert!(!can_castle(&board, sq("e1"), sq("g1")).unwrap());
        assert!(can_castle(&board, sq("e1"), sq("c1")).unwrap());

        let mut board = castling_board();
        board.place(PieceKind::Knight, Color::White, sq("b1"));
        assert_eq!(
            validate_move(&board, sq("e1"), sq("c1"), Color::White),
            Err(ChessError::IllegalMove {
                from: sq("e1"),
                to: sq("c1"),
                reason: IllegalReason::CastlePathBlocked,
            })
        );

        // d1 is attacked: queenside transit fails, kingside is unaffected.
        let mut board = castling_board();
        board.place(PieceKind::Rook, Color::Black, sq("d8"));
        assert!(!can_castle(&board, sq("e1"), sq("c1")).unwrap());
        assert!(can_castle(&board, sq("e1"), sq("g1")).unwrap());

        // Castling out of check.
        let mut board = castling_board();
        board.place(PieceKind::Bishop, Color::Black, sq("b4"));
        assert!(!can_castle(&board, sq("e1"), sq("g1")).unwrap());

        // A pawn covering the destination square counts as an attack.
        let mut board = castling_board();
        board.place(PieceKind::Pawn, Color::Black, sq("h2"));
        assert!(!can_castle(&board, sq("e1"), sq("g1")).unwrap());
    }

    #[test]
    fn test_double_check_ignores_blockers() {
        // Knight and rook both check; the black rook could take the knight
        // but that leaves the rook's check in place.
        let mut board = Board::empty();
        board
            .place(PieceKind::King, Color::Black, sq("h8"))
            .place(PieceKind::Pawn, Color::Black, sq("g7"))
            .place(PieceKind::Pawn, Color::Black, sq("h7"))
            .place(PieceKind::Rook, Color::Black, sq("f2"))
            .place(PieceKind::Knight, Color::White, sq("f7"))
            .place(PieceKind::Rook, Color::White, sq("a8"))
            .place(PieceKind::King, Color::White, sq("a1"));
        assert_eq!(attackers(&board, Color::Black).unwrap().len(), 2);
        assert!(is_checkmate(&board, Color::Black).unwrap());
        assert!(legal_moves(&board, Color::Black).unwrap().is_empty());
    }

    #[test]
    fn test_stalemate_is_not_checkmate() {
        let mut board = Board::empty();
        board
            .place(PieceKind::King, Color::White, sq("a1"))
            .place(PieceKind::King, Color::Black, sq("c2"))
            .place(PieceKind::Queen, Color::Black, sq("b3"));
        assert!(!is_checkmate(&board, Color::White).unwrap());
        assert!(is_stalemate(&board, Color::White).unwrap());
        assert_eq!(game_status(&board, Color::White), Ok(GameStatus::Stalemate));
        assert_eq!(game_status(&board, Color::Black), Ok(GameStatus::Ongoing));
    }
}
