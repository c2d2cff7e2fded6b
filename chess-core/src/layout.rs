//! 文本棋盘布局
//!
//! 八行文本，自上而下依次为第 7 行到第 0 行，每行八个字符：
//! `.` 表示空格，大写字母为白方，小写字母为黑方（`PRNBQK`）。
//!
//! 示例（初始局面）：
//! ```text
//! rnbqkbnr
//! pppppppp
//! ........
//! ........
//! ........
//! ........
//! PPPPPPPP
//! RNBQKBNR
//! ```

use crate::board::Board;
use crate::constants::{BOARD_SIZE, MAX_INDEX};
use crate::error::{ChessError, Result};
use crate::piece::{Coords, Piece, PieceKind};

/// 初始局面布局
pub const INITIAL_LAYOUT: &str = "\
rnbqkbnr
pppppppp
........
........
........
........
PPPPPPPP
RNBQKBNR";

/// 布局解析与生成
pub struct Layout;

impl Layout {
    /// 解析布局文本为棋盘
    ///
    /// 不在初始行上的兵视为已经走过。
    pub fn parse(layout: &str) -> Result<Board> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if rows.len() != BOARD_SIZE {
            return Err(ChessError::InvalidLayout {
                reason: format!("Expected {} rows, got {}", BOARD_SIZE, rows.len()),
            });
        }

        let mut board = Board::build();
        for (row_idx, line) in rows.iter().enumerate() {
            let row = MAX_INDEX - row_idx as i8;
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != BOARD_SIZE {
                return Err(ChessError::InvalidLayout {
                    reason: format!(
                        "Row {} has {} columns, expected {}",
                        row_idx,
                        chars.len(),
                        BOARD_SIZE
                    ),
                });
            }

            for (column, c) in chars.into_iter().enumerate() {
                if c == '.' {
                    continue;
                }
                let (kind, side) = PieceKind::from_layout_char(c).ok_or_else(|| {
                    ChessError::InvalidLayout {
                        reason: format!("Invalid piece character: {}", c),
                    }
                })?;
                let mut piece = Piece::new(kind, side);
                if kind == PieceKind::Pawn && row != side.pawn_row() {
                    piece.mark_moved();
                }
                board.place(Coords::new_unchecked(row, column as i8), Some(piece))?;
            }
        }

        Ok(board)
    }

    /// 将棋盘转换为布局文本
    pub fn render(board: &Board) -> String {
        let mut rows = Vec::with_capacity(BOARD_SIZE);
        for row in (0..=MAX_INDEX).rev() {
            let line: String = (0..=MAX_INDEX)
                .map(|column| {
                    board
                        .get(Coords::new_unchecked(row, column))
                        .map(|piece| piece.to_layout_char())
                        .unwrap_or('.')
                })
                .collect();
            rows.push(line);
        }
        rows.join("\n")
    }
}
