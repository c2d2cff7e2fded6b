//! 吃子 / 被反吃评估
//!
//! 走法得分 = 吃到的棋子分值 − 对方在走完后的局面上能反吃到的最高分值。

use chess_core::{Board, Coords, MoveCandidate, MoveGenerator, Rules, Side};

/// 评估器
pub struct Evaluator;

/// 单个走法的评估结果
#[derive(Debug, Clone)]
pub struct ScoredMove {
    pub candidate: MoveCandidate,
    /// 走完后的假想棋盘
    pub board_after: Board,
    pub score: i32,
}

impl Evaluator {
    /// 目标格上棋子的分值，空格为 0
    pub fn capture_value(board: &Board, target: Coords) -> i32 {
        board
            .get(target)
            .map(|piece| piece.kind.capture_value())
            .unwrap_or(0)
    }

    /// 对方在该局面上能吃到的最高分值（没有可吃的为 0）
    pub fn recapture_risk(board: &Board, mover: Side) -> i32 {
        MoveGenerator::side_moves(board, mover.opponent())
            .iter()
            .map(|mv| Self::capture_value(board, mv.target))
            .max()
            .unwrap_or(0)
    }

    /// 评估一步走法，走法必须带起始位置
    pub fn score_move(board: &Board, mv: &MoveCandidate, mover: Side) -> Option<ScoredMove> {
        let board_after = Rules::apply_candidate(board, mv)?;
        let score = Self::capture_value(board, mv.target) - Self::recapture_risk(&board_after, mover);
        Some(ScoredMove {
            candidate: *mv,
            board_after,
            score,
        })
    }

    /// 评估一组走法
    pub fn rank_moves(board: &Board, moves: &[MoveCandidate], mover: Side) -> Vec<ScoredMove> {
        moves
            .iter()
            .filter_map(|mv| Self::score_move(board, mv, mover))
            .collect()
    }
}
