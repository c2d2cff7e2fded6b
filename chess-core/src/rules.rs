//! 将军、将死与升变判定
//!
//! 所有判定都是棋盘的纯函数：需要模拟走子时先复制出假想棋盘，
//! 从不修改传入的棋盘。

use crate::board::Board;
use crate::error::Result;
use crate::moves::{MoveCandidate, MoveGenerator};
use crate::piece::{Coords, Piece, PieceKind, Side};

/// 规则判定
pub struct Rules;

impl Rules {
    /// 找出所有能吃到王的走法
    ///
    /// 收集不属于 `defending_side` 的全部棋子，生成并合法化走法，
    /// 返回目标格上有王的那些。非空即表示该方被将军。
    pub fn attacks_on_king(board: &Board, defending_side: Side) -> Vec<MoveCandidate> {
        MoveGenerator::side_moves(board, defending_side.opponent())
            .into_iter()
            .filter(|mv| board.get(mv.target).is_some_and(|piece| piece.is_king()))
            .collect()
    }

    /// 检查指定阵营是否被将军
    pub fn is_in_check(board: &Board, side: Side) -> bool {
        !Self::attacks_on_king(board, side).is_empty()
    }

    /// 构造假想棋盘：把 `origin` 上的棋子移到 `target`
    pub fn hypothetical(board: &Board, origin: Coords, target: Coords) -> Result<Board> {
        let mut future = board.snapshot();
        future.relocate(origin, target)?;
        Ok(future)
    }

    /// 按候选走法自带的起始位置构造假想棋盘
    ///
    /// 没有起始位置或坐标越界时返回 None。
    pub fn apply_candidate(board: &Board, mv: &MoveCandidate) -> Option<Board> {
        let origin = mv.origin?;
        Self::hypothetical(board, origin, mv.target).ok()
    }

    /// 走法是否安全（走完后己方的王不被攻击），越界走法不安全
    pub fn is_safe(mv: &MoveCandidate, origin: Coords, board: &Board, side: Side) -> bool {
        match Self::hypothetical(board, origin, mv.target) {
            Ok(future) => Self::attacks_on_king(&future, side).is_empty(),
            Err(_) => false,
        }
    }

    /// 指定位置棋子的安全走法
    pub fn safe_moves_for(board: &Board, origin: Coords) -> Vec<MoveCandidate> {
        let Some(piece) = board.get(origin) else {
            return Vec::new();
        };
        MoveGenerator::legal_moves_for(board, origin)
            .into_iter()
            .filter(|mv| Self::is_safe(mv, origin, board, piece.side))
            .map(|mv| mv.with_origin(origin))
            .collect()
    }

    /// 指定阵营的全部安全走法（每个走法带起始位置）
    pub fn legal_moves(side: Side, board: &Board) -> Vec<MoveCandidate> {
        MoveGenerator::side_moves(board, side)
            .into_iter()
            .filter(|mv| {
                mv.origin
                    .is_some_and(|origin| Self::is_safe(mv, origin, board, side))
            })
            .collect()
    }

    /// 检查是否被将死
    ///
    /// 没有任何安全走法即为将死。这里不区分困毙：未被将军但无路可走
    /// 的一方同样判负。
    pub fn checkmate(side: Side, board: &Board) -> bool {
        Self::legal_moves(side, board).is_empty()
    }

    /// 兵走到对方底线时需要升变
    pub fn needs_promotion(mv: &MoveCandidate, piece: &Piece) -> bool {
        piece.kind == PieceKind::Pawn && mv.target.row == piece.side.promotion_row()
    }
}
