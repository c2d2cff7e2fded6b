//! 走法生成和验证

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constants::{
    DIAGONAL_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONAL_DIRECTIONS,
};
use crate::piece::{Coords, Piece, PieceKind, Side};

/// 候选走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveCandidate {
    /// 目标位置（生成阶段可能在棋盘外）
    pub target: Coords,
    /// 目标有敌方棋子时是否可以吃
    pub can_capture: bool,
    /// 只有吃子时才成立（兵的斜走）
    pub must_capture: bool,
    /// 走子棋子的起始位置（按阵营汇总走法时填写）
    pub origin: Option<Coords>,
}

impl MoveCandidate {
    /// 可走可吃
    pub fn new(target: Coords) -> Self {
        Self {
            target,
            can_capture: true,
            must_capture: false,
            origin: None,
        }
    }

    /// 只能走到空位（兵的直走）
    pub fn quiet(target: Coords) -> Self {
        Self {
            can_capture: false,
            ..Self::new(target)
        }
    }

    /// 必须吃子（兵的斜走）
    pub fn capture_only(target: Coords) -> Self {
        Self {
            must_capture: true,
            ..Self::new(target)
        }
    }

    /// 附上起始位置
    pub fn with_origin(mut self, origin: Coords) -> Self {
        self.origin = Some(origin);
        self
    }
}

impl std::fmt::Display for MoveCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.origin {
            Some(origin) => write!(f, "{} -> {}", origin, self.target),
            None => write!(f, "-> {}", self.target),
        }
    }
}

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成指定棋子的伪合法走法（只看棋子几何，不做边界和占位检查）
    ///
    /// 棋盘只在改变候选集合本身时才被读取：滑行棋子在第一个有子的格子停下
    /// （该格仍作为吃子候选），兵只有在中间格为空时才能走两格。
    pub fn pseudo_moves(board: &Board, piece: Piece, origin: Coords) -> Vec<MoveCandidate> {
        let mut moves = Vec::with_capacity(28);

        match piece.kind {
            PieceKind::Pawn => Self::generate_pawn_moves(board, origin, piece, &mut moves),
            PieceKind::Knight => Self::generate_offset_moves(origin, &KNIGHT_OFFSETS, &mut moves),
            PieceKind::King => Self::generate_offset_moves(origin, &KING_OFFSETS, &mut moves),
            PieceKind::Rook => {
                Self::generate_sliding_moves(board, origin, &ORTHOGONAL_DIRECTIONS, &mut moves)
            }
            PieceKind::Bishop => {
                Self::generate_sliding_moves(board, origin, &DIAGONAL_DIRECTIONS, &mut moves)
            }
            PieceKind::Queen => {
                Self::generate_sliding_moves(board, origin, &DIAGONAL_DIRECTIONS, &mut moves);
                Self::generate_sliding_moves(board, origin, &ORTHOGONAL_DIRECTIONS, &mut moves);
            }
        }

        moves
    }

    /// 生成兵的走法
    fn generate_pawn_moves(board: &Board, origin: Coords, piece: Piece, moves: &mut Vec<MoveCandidate>) {
        let forward = piece.side.forward();

        // 初次走子可以走两格，中间格必须为空
        if !piece.has_moved {
            let double = origin.offset(2 * forward, 0);
            let between = origin.offset(forward, 0);
            if double.is_valid() && board.get(between).is_none() {
                moves.push(MoveCandidate::quiet(double));
            }
        }

        moves.push(MoveCandidate::quiet(origin.offset(forward, 0)));

        // 斜向只能吃子
        moves.push(MoveCandidate::capture_only(origin.offset(forward, 1)));
        moves.push(MoveCandidate::capture_only(origin.offset(forward, -1)));
    }

    /// 生成固定偏移的走法（马、王）
    fn generate_offset_moves(origin: Coords, offsets: &[(i8, i8)], moves: &mut Vec<MoveCandidate>) {
        for (d_row, d_column) in offsets {
            moves.push(MoveCandidate::new(origin.offset(*d_row, *d_column)));
        }
    }

    /// 生成滑行棋子的走法（车、象、后）
    fn generate_sliding_moves(
        board: &Board,
        origin: Coords,
        directions: &[(i8, i8)],
        moves: &mut Vec<MoveCandidate>,
    ) {
        for (d_row, d_column) in directions {
            let mut current = origin;
            while let Some(to) = current.checked_offset(*d_row, *d_column) {
                moves.push(MoveCandidate::new(to));
                if board.get(to).is_some() {
                    // 遇到棋子，包含该格后停止
                    break;
                }
                current = to;
            }
        }
    }

    /// 按边界、必须吃子、己方占位三步过滤候选走法（不考虑自将）
    pub fn legalize(candidates: Vec<MoveCandidate>, moving_piece: Piece, board: &Board) -> Vec<MoveCandidate> {
        candidates
            .into_iter()
            .filter(|mv| mv.target.is_valid())
            .filter(|mv| !mv.must_capture || board.get(mv.target).is_some())
            .filter(|mv| match board.get(mv.target) {
                Some(occupant) => mv.can_capture && occupant.side != moving_piece.side,
                None => true,
            })
            .collect()
    }

    /// 生成指定位置棋子的合法走法（不考虑自将），没有棋子时为空
    pub fn legal_moves_for(board: &Board, origin: Coords) -> Vec<MoveCandidate> {
        match board.get(origin) {
            Some(piece) => Self::legalize(Self::pseudo_moves(board, piece, origin), piece, board),
            None => Vec::new(),
        }
    }

    /// 汇总指定阵营所有棋子的合法走法（不考虑自将），每个走法带起始位置
    pub fn side_moves(board: &Board, side: Side) -> Vec<MoveCandidate> {
        board
            .pieces(side)
            .into_iter()
            .flat_map(|(origin, piece)| {
                Self::legalize(Self::pseudo_moves(board, piece, origin), piece, board)
                    .into_iter()
                    .map(move |mv| mv.with_origin(origin))
            })
            .collect()
    }
}
