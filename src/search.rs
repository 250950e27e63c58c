use crate::board::{Board, Color};
use crate::error::Result;
use crate::evaluation::{Evaluator, MATE_SCORE};
use crate::movegen::Move;
use crate::rules::{is_checkmate, legal_moves};
use tracing::{debug, info};

/// Fixed-depth minimax with alpha-beta pruning.
///
/// White is the maximizing side: positive scores favor White at every node,
/// whichever side the search is run for.
pub struct Search {
    evaluator: Evaluator,
    max_depth: u32,
    nodes_searched: u64,
}

impl Search {
    pub fn new() -> Self {
        Self {
            evaluator: Evaluator::new(),
            max_depth: 3,
            nodes_searched: 0,
        }
    }

    /// Pick a move for `color`. Ties go to the first move in enumeration
    /// order; `None` when `color` has no legal move.
    pub fn find_best_move(&mut self, board: &Board, color: Color) -> Result<Option<Move>> {
        self.nodes_searched = 0;
        let depth = self.max_depth.max(1);
        let maximizing = color == Color::White;

        let mut best: Option<(Move, i32)> = None;
        let mut alpha = i32::MIN;
        let mut beta = i32::MAX;

        // Try each legal move and score the position it leaves
        for mv in legal_moves(board, color)? {
            let mut board_copy = board.clone();
            board_copy.make_move(mv);

            let score = self.minimax(&board_copy, depth - 1, alpha, beta, color.opposite())?;
            debug!(%mv, score, "root move scored");

            // Only a strictly better score replaces the current best
            let improves = match best {
                None => true,
                Some((_, best_score)) if maximizing => score > best_score,
                Some((_, best_score)) => score < best_score,
            };
            if improves {
                best = Some((mv, score));
            }

            // Tighten the window for the remaining root moves
            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
        }

        match best {
            Some((mv, score)) => {
                info!(%color, %mv, score, depth, nodes = self.nodes_searched, "best move found")
            }
            None => info!(%color, "no legal moves to search"),
        }
        Ok(best.map(|(mv, _)| mv))
    }

    fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        to_move: Color,
    ) -> Result<i32> {
        self.nodes_searched += 1;

        // A mated side scores the sentinel, even at the depth limit
        if is_checkmate(board, to_move)? {
            return Ok(match to_move {
                Color::White => -MATE_SCORE,
                Color::Black => MATE_SCORE,
            });
        }
        // Leaf: static material count
        if depth == 0 {
            return Ok(self.evaluator.evaluate(board));
        }

        let moves = legal_moves(board, to_move)?;
        if moves.is_empty() {
            // Stalemate: not a mate, score the material as it stands.
            return Ok(self.evaluator.evaluate(board));
        }

        let next_to_move = to_move.opposite();
        // White maximizes, Black minimizes
        if to_move == Color::White {
            let mut best_score = i32::MIN;
            for mv in moves {
                let mut board_copy = board.clone();
                board_copy.make_move(mv);
                let score = self.minimax(&board_copy, depth - 1, alpha, beta, next_to_move)?;
                best_score = best_score.max(score);
                alpha = alpha.max(score);

                // Alpha-beta pruning
                if beta <= alpha {
                    break;
                }
            }
            Ok(best_score)
        } else {
            let mut best_score = i32::MAX;
            for mv in moves {
                let mut board_copy = board.clone();
                board_copy.make_move(mv);
                let score = self.minimax(&board_copy, depth - 1, alpha, beta, next_to_move)?;
                best_score = best_score.min(score);
                beta = beta.min(score);

                // Alpha-beta pruning
                if beta <= alpha {
                    break;
                }
            }
            Ok(best_score)
        }
    }

    pub fn set_max_depth(&mut self, depth: u32) {
        self.max_depth = depth;
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn get_nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}
