//! 状态观察者

use chess_core::Board;

use crate::view::StateView;

/// 对局状态观察者
///
/// 每次状态变化（选中、取消选中、走子、升变、电脑走子、重开、远程走子）
/// 之后收到通知。无效输入不触发通知。
pub trait StateObserver: Send {
    /// 状态已变化
    fn on_state_changed(&mut self, state: &StateView);

    /// 联机模式下本地走子完成，网络层据此把整个棋盘发给对方
    fn on_move_committed(&mut self, _board: &Board) {}
}
