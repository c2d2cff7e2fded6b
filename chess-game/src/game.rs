//! 对局状态机
//!
//! 每个半回合：`Idle → Selected → Idle`。
//! - Idle 时选中己方棋子：计算安全走法，非空则进入 Selected
//! - Selected 时再次点击起点：取消选中
//! - Selected 时点击可走位置：执行走法
//! - 其他点击一律忽略，不改变状态也不通知
//!
//! 将死后冻结，不再接受任何选择。

use chess_core::{
    Board, Coords, MoveCandidate, Piece, PromotionKind, Rules, Side, FIRST_SIDE,
};
use tracing::{debug, info, warn};

use crate::config::GameMode;
use crate::observer::StateObserver;
use crate::promotion::{DefaultPromotion, PromotionHandler};
use crate::view::{PieceView, SelectionView, StateView};

/// 当前选中的棋子
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    piece: Piece,
    origin: Coords,
    moves: Vec<MoveCandidate>,
}

impl Selection {
    pub fn piece(&self) -> Piece {
        self.piece
    }

    pub fn origin(&self) -> Coords {
        self.origin
    }

    /// 安全走法
    pub fn moves(&self) -> &[MoveCandidate] {
        &self.moves
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Selected(Selection),
}

/// 对局
pub struct Game {
    board: Board,
    turn: Side,
    phase: Phase,
    /// 每步走子前的棋盘快照
    history: Vec<Board>,
    in_check: bool,
    checkmate: bool,
    mode: GameMode,
    observers: Vec<Box<dyn StateObserver>>,
    promotion: Box<dyn PromotionHandler>,
}

impl Game {
    /// 从初始局面开始新对局
    pub fn new(mode: GameMode) -> Self {
        Self::with_board(mode, Board::initial(), FIRST_SIDE)
    }

    /// 从指定局面开始
    pub fn with_board(mode: GameMode, board: Board, turn: Side) -> Self {
        Self {
            board,
            turn,
            phase: Phase::Idle,
            history: Vec::new(),
            in_check: false,
            checkmate: false,
            mode,
            observers: Vec::new(),
            promotion: Box::new(DefaultPromotion),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn StateObserver>) {
        self.observers.push(observer);
    }

    pub fn set_promotion_handler(&mut self, handler: Box<dyn PromotionHandler>) {
        self.promotion = handler;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn history(&self) -> &[Board] {
        &self.history
    }

    pub fn in_check(&self) -> bool {
        self.in_check
    }

    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    pub fn selection(&self) -> Option<&Selection> {
        match &self.phase {
            Phase::Selected(selection) => Some(selection),
            Phase::Idle => None,
        }
    }

    /// 电脑执棋的一方
    pub fn computer_side(&self) -> Option<Side> {
        self.mode.computer_side()
    }

    /// 是否轮到电脑走子
    pub fn computer_to_move(&self) -> bool {
        !self.checkmate && self.computer_side() == Some(self.turn)
    }

    /// 本地玩家点击一个位置
    ///
    /// 返回状态是否发生变化。
    pub fn select_or_move(&mut self, coords: Coords) -> bool {
        if self.checkmate {
            return false;
        }
        if !self.mode.accepts_input(self.turn) {
            debug!("当前不是本地玩家回合，忽略 {}", coords);
            return false;
        }

        if matches!(self.phase, Phase::Idle) {
            self.select_piece(coords)
        } else {
            self.choose_target(coords, true)
        }
    }

    /// 电脑走子，和人一样先选起点再选终点
    ///
    /// 电脑的兵总是升变为后。
    pub fn apply_computer_move(&mut self, mv: MoveCandidate) -> bool {
        if !self.computer_to_move() {
            return false;
        }
        let Some(origin) = mv.origin else {
            warn!("电脑走法缺少起点: {}", mv);
            return false;
        };

        self.phase = Phase::Idle;
        if !self.select_piece(origin) {
            warn!("电脑选择了无法走动的棋子: {}", origin);
            return false;
        }
        if !self.choose_target(mv.target, false) {
            warn!("电脑走法不在安全走法中: {}", mv);
            self.phase = Phase::Idle;
            return false;
        }
        true
    }

    /// 电脑没有可走的棋，交给将死判定
    pub fn computer_has_no_move(&mut self) {
        self.checkmate = Rules::checkmate(self.turn, &self.board);
        warn!("{} 没有可走的棋，将死: {}", self.turn.name(), self.checkmate);
        self.notify();
    }

    /// 重新开始：回到第一个历史快照
    ///
    /// 没有历史时什么都不做。
    pub fn restart(&mut self) -> bool {
        if self.history.is_empty() {
            return false;
        }
        self.board = self.history.swap_remove(0);
        self.history.clear();
        self.phase = Phase::Idle;
        self.turn = FIRST_SIDE;
        self.in_check = false;
        self.checkmate = false;

        info!("对局重新开始");
        self.notify();
        true
    }

    /// 采用对方推送的棋盘
    ///
    /// 对方已经校验过走法，这里不再检查，直接替换棋盘并换边。
    pub fn apply_remote_move(&mut self, board: Board) {
        self.history.push(self.board.snapshot());
        self.board = board;
        self.phase = Phase::Idle;
        self.turn = self.turn.opponent();

        info!("收到对方走子，轮到 {}", self.turn.name());
        self.evaluate_check();
        self.notify();
    }

    /// 当前状态快照
    pub fn view(&self) -> StateView {
        let pieces = self
            .board
            .all_pieces()
            .into_iter()
            .map(|(coords, piece)| PieceView {
                kind: piece.kind,
                side: piece.side,
                coords,
            })
            .collect();

        let selection = self.selection().map(|selection| SelectionView {
            origin: selection.origin,
            targets: selection.moves.iter().map(|mv| mv.target).collect(),
        });

        StateView {
            pieces,
            turn: self.turn,
            in_check: self.in_check,
            checkmate: self.checkmate,
            selection,
        }
    }

    fn select_piece(&mut self, coords: Coords) -> bool {
        let Some(piece) = self.board.get(coords).filter(|piece| piece.side == self.turn) else {
            return false;
        };

        let moves = Rules::safe_moves_for(&self.board, coords);
        if moves.is_empty() {
            return false;
        }

        debug!("选中 {} {} ({} 个走法)", piece.kind.name(), coords, moves.len());
        self.phase = Phase::Selected(Selection {
            piece,
            origin: coords,
            moves,
        });
        self.notify();
        true
    }

    fn choose_target(&mut self, coords: Coords, ask_promotion: bool) -> bool {
        let Phase::Selected(selection) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return false;
        };

        if coords == selection.origin {
            debug!("取消选中 {}", coords);
            self.notify();
            return true;
        }

        match selection.moves.iter().find(|mv| mv.target == coords).copied() {
            Some(mv) => self.execute(selection, mv, ask_promotion),
            None => {
                self.phase = Phase::Selected(selection);
                false
            }
        }
    }

    /// 落子，坐标越界时棋盘和回合都不变
    fn execute(&mut self, selection: Selection, mv: MoveCandidate, ask_promotion: bool) -> bool {
        let mut piece = selection.piece;
        if piece.is_pawn() {
            piece.mark_moved();
        }
        if Rules::needs_promotion(&mv, &piece) {
            let kind = if ask_promotion {
                let choice = self
                    .promotion
                    .request_promotion_choice(PromotionKind::default());
                PromotionKind::from_choice(choice.as_deref())
            } else {
                PromotionKind::default()
            };
            info!("{} 兵升变为 {}", piece.side.name(), kind.piece_kind().name());
            piece = Piece::new(kind.piece_kind(), piece.side);
        }

        let mut next = self.board.snapshot();
        let captured = match next
            .place(selection.origin, None)
            .and_then(|_| next.place(mv.target, Some(piece)))
        {
            Ok(captured) => captured,
            Err(e) => {
                warn!("走子 {} -> {} 无法落子: {}", selection.origin, mv.target, e);
                return false;
            }
        };
        self.history.push(std::mem::replace(&mut self.board, next));

        match captured {
            Some(captured) => info!(
                "{} {} {} -> {} 吃 {}",
                piece.side.name(),
                piece.kind.name(),
                selection.origin,
                mv.target,
                captured.kind.name()
            ),
            None => info!(
                "{} {} {} -> {}",
                piece.side.name(),
                piece.kind.name(),
                selection.origin,
                mv.target
            ),
        }

        self.turn = self.turn.opponent();
        self.evaluate_check();

        if self.mode.is_online() {
            for observer in &mut self.observers {
                observer.on_move_committed(&self.board);
            }
        }
        self.notify();
        true
    }

    fn evaluate_check(&mut self) {
        self.in_check = Rules::is_in_check(&self.board, self.turn);
        self.checkmate = self.in_check && Rules::checkmate(self.turn, &self.board);

        if self.checkmate {
            info!("将死！{} 获胜", self.turn.opponent().name());
        } else if self.in_check {
            info!("{} 被将军", self.turn.name());
        }
    }

    fn notify(&mut self) {
        let view = self.view();
        for observer in &mut self.observers {
            observer.on_state_changed(&view);
        }
    }
}
