//! 错误类型定义

use thiserror::Error;

/// 规则引擎错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChessError {
    /// 坐标超出棋盘
    #[error("Coordinates off the board: ({row}, {column})")]
    OffBoard { row: i8, column: i8 },

    /// 无效的棋盘布局文本
    #[error("Invalid board layout: {reason}")]
    InvalidLayout { reason: String },

    /// 无效的棋盘 JSON
    #[error("Invalid board JSON: {reason}")]
    InvalidBoardJson { reason: String },
}

/// 规则引擎操作结果类型
pub type Result<T> = std::result::Result<T, ChessError>;
