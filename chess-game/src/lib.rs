//! 国际象棋对局
//!
//! 包含:
//! - 对局状态机（选中、走子、升变、将军、将死、重开）
//! - 对局模式与配置
//! - 状态观察者与升变选择接口
//! - 单写者异步会话（电脑走子在阻塞线程池中计算）

pub mod config;
pub mod error;
pub mod game;
pub mod observer;
pub mod promotion;
pub mod session;
pub mod view;

pub use config::{GameConfig, GameMode};
pub use error::{GameError, Result};
pub use game::{Game, Selection};
pub use observer::StateObserver;
pub use promotion::{DefaultPromotion, PromotionHandler};
pub use session::{Command, GameEvent, GameHandle, GameSession};
pub use view::{PieceView, SelectionView, StateView};
