//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{BACK_RANK, SQUARE_COUNT};
use crate::error::{ChessError, Result};
use crate::layout::Layout;
use crate::piece::{Coords, Piece, PieceKind, Side};

/// 格子颜色（仅用于显示，规则不读取）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquareColor {
    Light,
    Dark,
}

impl SquareColor {
    /// 由坐标奇偶性决定
    pub fn of(coords: Coords) -> Self {
        if (coords.row + coords.column) % 2 == 0 {
            SquareColor::Light
        } else {
            SquareColor::Dark
        }
    }
}

/// 格子
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    coords: Coords,
    color: SquareColor,
    piece: Option<Piece>,
}

impl Square {
    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn color(&self) -> SquareColor {
        self.color
    }

    pub fn piece(&self) -> Option<Piece> {
        self.piece
    }
}

/// 棋盘
///
/// 8x8 格子，索引为 row * 8 + column。每个格子独占其上的棋子，
/// 复制棋盘即得到与原棋盘互不共享的副本。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: Vec<Square>,
}

impl Board {
    /// 创建空棋盘（只有格子颜色，没有棋子）
    pub fn build() -> Self {
        let squares = (0..SQUARE_COUNT)
            .filter_map(Coords::from_index)
            .map(|coords| Square {
                coords,
                color: SquareColor::of(coords),
                piece: None,
            })
            .collect();
        Self { squares }
    }

    /// 创建初始棋盘
    pub fn initial() -> Self {
        let mut board = Self::build();
        board.setup_pieces();
        board
    }

    /// 摆放双方初始的十六个棋子
    pub fn setup_pieces(&mut self) {
        for side in [Side::White, Side::Black] {
            for (column, kind) in BACK_RANK.iter().enumerate() {
                let column = column as i8;
                self.set(
                    Coords::new_unchecked(side.back_row(), column),
                    Some(Piece::new(*kind, side)),
                );
                self.set(
                    Coords::new_unchecked(side.pawn_row(), column),
                    Some(Piece::new(PieceKind::Pawn, side)),
                );
            }
        }
    }

    /// 获取一个与当前棋盘完全独立的副本
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// 获取指定位置的棋子
    pub fn get(&self, coords: Coords) -> Option<Piece> {
        self.square(coords).and_then(|square| square.piece)
    }

    /// 获取指定位置的格子
    pub fn square(&self, coords: Coords) -> Option<&Square> {
        coords.to_index().map(|index| &self.squares[index])
    }

    /// 所有格子（行优先）
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// 放置或移除单个棋子，返回原来的棋子
    pub fn place(&mut self, coords: Coords, piece: Option<Piece>) -> Result<Option<Piece>> {
        let index = coords.to_index().ok_or(ChessError::OffBoard {
            row: coords.row,
            column: coords.column,
        })?;
        Ok(std::mem::replace(&mut self.squares[index].piece, piece))
    }

    /// 设置棋盘内坐标上的棋子，调用方保证坐标有效
    pub(crate) fn set(&mut self, coords: Coords, piece: Option<Piece>) -> Option<Piece> {
        self.place(coords, piece).ok().flatten()
    }

    /// 移动棋子（不检查规则），返回被吃的棋子
    ///
    /// 任一坐标越界时棋盘保持不变。
    pub fn relocate(&mut self, from: Coords, to: Coords) -> Result<Option<Piece>> {
        for coords in [from, to] {
            if !coords.is_valid() {
                return Err(ChessError::OffBoard {
                    row: coords.row,
                    column: coords.column,
                });
            }
        }
        let piece = self.place(from, None)?;
        self.place(to, piece)
    }

    /// 查找指定阵营的王
    pub fn find_king(&self, side: Side) -> Option<Coords> {
        self.pieces(side)
            .into_iter()
            .find(|(_, piece)| piece.is_king())
            .map(|(coords, _)| coords)
    }

    /// 获取指定阵营的所有棋子位置
    pub fn pieces(&self, side: Side) -> Vec<(Coords, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.side == side)
            .collect()
    }

    /// 获取所有棋子
    pub fn all_pieces(&self) -> Vec<(Coords, Piece)> {
        self.squares
            .iter()
            .filter_map(|square| square.piece.map(|piece| (square.coords, piece)))
            .collect()
    }

    /// 序列化为 JSON（用于联机同步）
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ChessError::InvalidBoardJson {
            reason: e.to_string(),
        })
    }

    /// 从 JSON 解析
    pub fn from_json(json: &str) -> Result<Self> {
        let board: Board = serde_json::from_str(json).map_err(|e| ChessError::InvalidBoardJson {
            reason: e.to_string(),
        })?;
        if board.squares.len() != SQUARE_COUNT {
            return Err(ChessError::InvalidBoardJson {
                reason: format!("Expected {} squares, got {}", SQUARE_COUNT, board.squares.len()),
            });
        }
        // 格子必须按行优先顺序排列，坐标与下标一致
        for (index, square) in board.squares.iter().enumerate() {
            if square.coords.to_index() != Some(index) {
                return Err(ChessError::InvalidBoardJson {
                    reason: format!("Square {} has coordinates {}", index, square.coords),
                });
            }
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Layout::render(self))
    }
}
