//! 棋子定义

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, MAX_INDEX};

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// 兵
    Pawn,
    /// 车
    Rook,
    /// 马
    Knight,
    /// 象
    Bishop,
    /// 后
    Queen,
    /// 王
    King,
}

impl PieceKind {
    /// 获取被吃时的分值（用于 AI 评估）
    pub fn capture_value(&self) -> i32 {
        match self {
            PieceKind::King => 100,
            PieceKind::Queen => 15,
            PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight => 10,
            PieceKind::Pawn => 5,
        }
    }

    /// 获取布局字符（白方大写，黑方小写）
    pub fn to_layout_char(&self, side: Side) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match side {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// 从布局字符解析
    pub fn from_layout_char(c: char) -> Option<(PieceKind, Side)> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'r' => PieceKind::Rook,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, side))
    }

    /// 显示名称
    pub fn name(&self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Rook => "Rook",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        }
    }
}

/// 升变可选的棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PromotionKind {
    Rook,
    Knight,
    Bishop,
    #[default]
    Queen,
}

impl PromotionKind {
    /// 解析外部给出的升变选择，缺失或无法识别时默认为后
    pub fn from_choice(choice: Option<&str>) -> Self {
        let Some(choice) = choice else {
            return Self::default();
        };
        match choice.trim().to_ascii_lowercase().as_str() {
            "rook" => PromotionKind::Rook,
            "knight" => PromotionKind::Knight,
            "bishop" => PromotionKind::Bishop,
            "queen" => PromotionKind::Queen,
            _ => Self::default(),
        }
    }

    /// 对应的棋子类型
    pub fn piece_kind(&self) -> PieceKind {
        match self {
            PromotionKind::Rook => PieceKind::Rook,
            PromotionKind::Knight => PieceKind::Knight,
            PromotionKind::Bishop => PieceKind::Bishop,
            PromotionKind::Queen => PieceKind::Queen,
        }
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 白方（在下方，行 0-1，向行 7 推进）
    White,
    /// 黑方（先手，在上方，行 6-7，向行 0 推进）
    Black,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// 兵的前进方向（行增量）
    pub fn forward(&self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// 底线所在行
    pub fn back_row(&self) -> i8 {
        match self {
            Side::White => 0,
            Side::Black => MAX_INDEX,
        }
    }

    /// 兵的初始行
    pub fn pawn_row(&self) -> i8 {
        self.back_row() + self.forward()
    }

    /// 兵升变的目标行（对方底线）
    pub fn promotion_row(&self) -> i8 {
        self.opponent().back_row()
    }

    /// 显示名称
    pub fn name(&self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    /// 兵是否走过（走过后不能再走两格）
    pub has_moved: bool,
}

impl Piece {
    /// 创建新棋子
    pub fn new(kind: PieceKind, side: Side) -> Self {
        Self {
            kind,
            side,
            has_moved: false,
        }
    }

    /// 标记已走过
    pub fn mark_moved(&mut self) {
        self.has_moved = true;
    }

    pub fn is_pawn(&self) -> bool {
        self.kind == PieceKind::Pawn
    }

    pub fn is_king(&self) -> bool {
        self.kind == PieceKind::King
    }

    /// 获取布局字符
    pub fn to_layout_char(&self) -> char {
        self.kind.to_layout_char(self.side)
    }
}

/// 棋盘坐标
///
/// 使用有符号分量：生成的候选走法可以先落在棋盘外，由验证阶段剔除。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coords {
    /// 行 (0-7)
    pub row: i8,
    /// 列 (0-7)
    pub column: i8,
}

impl Coords {
    /// 创建新坐标
    pub fn new(row: i8, column: i8) -> Option<Self> {
        let coords = Self { row, column };
        coords.is_valid().then_some(coords)
    }

    /// 创建新坐标（不检查边界）
    pub const fn new_unchecked(row: i8, column: i8) -> Self {
        Self { row, column }
    }

    /// 检查坐标是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (0..=MAX_INDEX).contains(&self.row) && (0..=MAX_INDEX).contains(&self.column)
    }

    /// 获取偏移后的坐标（不检查边界）
    pub fn offset(&self, d_row: i8, d_column: i8) -> Coords {
        Coords {
            row: self.row + d_row,
            column: self.column + d_column,
        }
    }

    /// 获取偏移后的坐标，越界时返回 None
    pub fn checked_offset(&self, d_row: i8, d_column: i8) -> Option<Coords> {
        let next = self.offset(d_row, d_column);
        next.is_valid().then_some(next)
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> Option<usize> {
        self.is_valid()
            .then(|| self.row as usize * BOARD_SIZE + self.column as usize)
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Some(Coords {
                row: (index / BOARD_SIZE) as i8,
                column: (index % BOARD_SIZE) as i8,
            })
        } else {
            None
        }
    }
}

impl std::fmt::Display for Coords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}
