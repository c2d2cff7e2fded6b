//! 错误类型定义

use chess_core::ChessError;
use thiserror::Error;

/// 对局层错误
#[derive(Error, Debug)]
pub enum GameError {
    /// 配置文件读写失败
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件格式无效
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// 无法获取配置目录
    #[error("No config directory available")]
    NoConfigDir,

    /// 对局会话已关闭
    #[error("Game session closed")]
    SessionClosed,

    #[error(transparent)]
    Chess(#[from] ChessError),
}

/// 对局层操作结果类型
pub type Result<T> = std::result::Result<T, GameError>;
