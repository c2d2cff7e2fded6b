//! 国际象棋规则引擎
//!
//! 包含:
//! - 棋子、棋盘、坐标等核心数据结构
//! - 伪合法走法生成与占位验证
//! - 将军 / 将死判定与自将过滤
//! - 升变判定
//! - 文本棋盘布局（测试与日志）

mod board;
mod constants;
mod error;
mod layout;
mod moves;
mod piece;
mod rules;

pub use board::{Board, Square, SquareColor};
pub use constants::*;
pub use error::{ChessError, Result};
pub use layout::{Layout, INITIAL_LAYOUT};
pub use moves::{MoveCandidate, MoveGenerator};
pub use piece::{Coords, Piece, PieceKind, PromotionKind, Side};
pub use rules::Rules;
