//! 对局状态快照，供渲染层和事件订阅者使用

use chess_core::{Coords, PieceKind, Side};
use serde::{Deserialize, Serialize};

/// 棋盘上的一个棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceView {
    pub kind: PieceKind,
    pub side: Side,
    pub coords: Coords,
}

/// 当前选中的棋子及其可走位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionView {
    pub origin: Coords,
    pub targets: Vec<Coords>,
}

/// 对局状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateView {
    /// 所有棋子
    pub pieces: Vec<PieceView>,
    /// 当前走子方
    pub turn: Side,
    pub in_check: bool,
    pub checkmate: bool,
    pub selection: Option<SelectionView>,
}

impl StateView {
    /// 查找指定位置的棋子
    pub fn piece_at(&self, coords: Coords) -> Option<&PieceView> {
        self.pieces.iter().find(|piece| piece.coords == coords)
    }

    /// 胜方（未分出胜负时为 None）
    pub fn winner(&self) -> Option<Side> {
        self.checkmate.then(|| self.turn.opponent())
    }
}
