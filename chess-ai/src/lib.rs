//! 国际象棋 AI 引擎
//!
//! 包含:
//! - 吃子 / 被反吃评估
//! - 随机安全走法（简单）
//! - 贪心选择（中等）
//! - 两层走法树（困难）

mod evaluate;
mod search;
mod tree;

pub use evaluate::{Evaluator, ScoredMove};
pub use search::{AiConfig, AiEngine, Difficulty};
pub use tree::{MoveNode, MoveTree};
