//! 对局会话
//!
//! 一个 tokio 任务独占一局 [`Game`]，所有修改都通过命令通道串行处理。
//! 每条命令处理完后，如果轮到电脑走子，就在阻塞线程池里搜索，
//! 再把结果按人类的选择路径交回对局。电脑思考期间到达的命令排队等待。

use chess_ai::{AiConfig, AiEngine};
use chess_core::{Board, Coords, MoveCandidate};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::game::Game;
use crate::observer::StateObserver;
use crate::view::StateView;

/// 命令通道容量
const COMMAND_CAPACITY: usize = 32;

/// 会话命令
#[derive(Debug)]
pub enum Command {
    SelectOrMove(Coords),
    Restart,
    ApplyRemoteMove(Board),
    State(oneshot::Sender<StateView>),
    Board(oneshot::Sender<Board>),
}

/// 会话事件
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// 状态已变化
    StateChanged(StateView),
    /// 联机模式下本地走子完成，需要发送给对方
    MoveCommitted(Board),
}

/// 把观察者通知转成广播事件
struct EventBroadcaster {
    tx: broadcast::Sender<GameEvent>,
}

impl StateObserver for EventBroadcaster {
    fn on_state_changed(&mut self, state: &StateView) {
        // 没有订阅者时发送失败，忽略
        let _ = self.tx.send(GameEvent::StateChanged(state.clone()));
    }

    fn on_move_committed(&mut self, board: &Board) {
        let _ = self.tx.send(GameEvent::MoveCommitted(board.snapshot()));
    }
}

/// 会话句柄，可以克隆给多个协作者
#[derive(Clone)]
pub struct GameHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<GameEvent>,
}

impl GameHandle {
    /// 点击一个位置
    pub async fn select_or_move(&self, coords: Coords) -> Result<()> {
        self.send(Command::SelectOrMove(coords)).await
    }

    /// 重新开始
    pub async fn restart(&self) -> Result<()> {
        self.send(Command::Restart).await
    }

    /// 采用对方推送的棋盘
    pub async fn apply_remote_move(&self, board: Board) -> Result<()> {
        self.send(Command::ApplyRemoteMove(board)).await
    }

    /// 获取当前状态
    ///
    /// 在此之前发出的命令（包括随之触发的电脑走子）都已处理完。
    pub async fn state(&self) -> Result<StateView> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::State(tx)).await?;
        rx.await.map_err(|_| GameError::SessionClosed)
    }

    /// 获取当前棋盘
    pub async fn board(&self) -> Result<Board> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Board(tx)).await?;
        rx.await.map_err(|_| GameError::SessionClosed)
    }

    /// 订阅事件
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| GameError::SessionClosed)
    }
}

/// 搜索任务的结果，引擎随结果一起交回
type SearchOutcome = std::result::Result<(AiEngine, Option<MoveCandidate>), JoinError>;

/// 对局会话
pub struct GameSession {
    game: Game,
    /// 搜索任务失败后按它重建引擎
    ai_config: Option<AiConfig>,
    engine: Option<AiEngine>,
    commands: mpsc::Receiver<Command>,
}

impl GameSession {
    /// 按配置启动会话
    pub fn spawn(config: &GameConfig) -> GameHandle {
        Self::spawn_with(config, |_| {})
    }

    /// 启动会话，启动前可以对对局做额外设置（升变选择、观察者）
    pub fn spawn_with<F>(config: &GameConfig, configure: F) -> GameHandle
    where
        F: FnOnce(&mut Game),
    {
        let (session, handle) = Self::new(config, configure);
        tokio::spawn(session.run());
        handle
    }

    fn new<F>(config: &GameConfig, configure: F) -> (Self, GameHandle)
    where
        F: FnOnce(&mut Game),
    {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));

        let mut game = Game::new(config.mode);
        configure(&mut game);
        game.add_observer(Box::new(EventBroadcaster {
            tx: event_tx.clone(),
        }));

        let ai_config = config.ai_config();
        let session = Self {
            game,
            engine: ai_config.clone().map(AiEngine::new),
            ai_config,
            commands: command_rx,
        };
        let handle = GameHandle {
            commands: command_tx,
            events: event_tx,
        };
        (session, handle)
    }

    async fn run(mut self) {
        info!("对局会话启动: {:?}", self.game.mode());

        // 电脑先手
        self.play_computer_turn().await;

        while let Some(command) = self.commands.recv().await {
            self.handle(command);
            self.play_computer_turn().await;
        }

        info!("对局会话结束");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::SelectOrMove(coords) => {
                self.game.select_or_move(coords);
            }
            Command::Restart => {
                self.game.restart();
            }
            Command::ApplyRemoteMove(board) => {
                self.game.apply_remote_move(board);
            }
            Command::State(reply) => {
                let _ = reply.send(self.game.view());
            }
            Command::Board(reply) => {
                let _ = reply.send(self.game.board().snapshot());
            }
        }
    }

    async fn play_computer_turn(&mut self) {
        if !self.game.computer_to_move() {
            return;
        }
        let Some(mut engine) = self.engine.take() else {
            return;
        };

        let board = self.game.board().snapshot();
        let side = self.game.turn();
        debug!("电脑 ({}) 开始思考", side.name());

        let result = tokio::task::spawn_blocking(move || {
            let mv = engine.search(&board, side);
            (engine, mv)
        })
        .await;
        self.finish_computer_turn(result);
    }

    fn finish_computer_turn(&mut self, result: SearchOutcome) {
        match result {
            Ok((engine, mv)) => {
                debug!("电脑思考完成，节点数 {}", engine.nodes_searched());
                self.engine = Some(engine);
                match mv {
                    Some(mv) => {
                        self.game.apply_computer_move(mv);
                    }
                    None => self.game.computer_has_no_move(),
                }
            }
            Err(e) => {
                // 引擎随任务一起丢失，重建后下一条命令会再次触发电脑走子
                error!("AI 计算任务失败: {}", e);
                self.engine = self.ai_config.clone().map(AiEngine::new);
                warn!("已重建 AI 引擎");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_ai::Difficulty;
    use chess_core::{PieceKind, PromotionKind, Side};

    use crate::config::GameMode;

    fn at(row: i8, column: i8) -> Coords {
        Coords::new_unchecked(row, column)
    }

    fn vs_computer(human_side: Side, difficulty: Difficulty) -> GameConfig {
        GameConfig {
            mode: GameMode::VsComputer {
                human_side,
                difficulty,
            },
            ai_seed: Some(11),
            ..GameConfig::default()
        }
    }

    fn drain(rx: &mut broadcast::Receiver<GameEvent>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_computer_moves_first() {
        let handle = GameSession::spawn(&vs_computer(Side::White, Difficulty::Easy));

        let state = handle.state().await.unwrap();
        assert_eq!(state.turn, Side::White);
        assert_eq!(state.pieces.len(), 32);
        assert_ne!(handle.board().await.unwrap(), Board::initial());
    }

    #[tokio::test]
    async fn test_computer_replies_to_human() {
        let handle = GameSession::spawn(&vs_computer(Side::Black, Difficulty::Medium));
        let mut events = handle.subscribe();

        // 电脑回合之外它不走
        let state = handle.state().await.unwrap();
        assert_eq!(state.turn, Side::Black);
        assert_eq!(handle.board().await.unwrap(), Board::initial());

        handle.select_or_move(at(6, 4)).await.unwrap();
        handle.select_or_move(at(4, 4)).await.unwrap();

        let state = handle.state().await.unwrap();
        assert_eq!(state.turn, Side::Black);
        assert_eq!(
            state.piece_at(at(4, 4)).map(|p| (p.kind, p.side)),
            Some((PieceKind::Pawn, Side::Black))
        );

        // 人选中、人走子、电脑选中、电脑走子
        let events = drain(&mut events);
        assert_eq!(events.len(), 4);
        assert!(events
            .iter()
            .all(|event| matches!(event, GameEvent::StateChanged(_))));
    }

    #[tokio::test]
    async fn test_human_input_ignored_on_computer_turn() {
        let handle = GameSession::spawn(&vs_computer(Side::Black, Difficulty::Hard));

        handle.select_or_move(at(6, 3)).await.unwrap();
        handle.select_or_move(at(4, 3)).await.unwrap();
        let after_reply = handle.board().await.unwrap();

        // 白方棋子不受本地输入控制
        handle.select_or_move(at(1, 0)).await.unwrap();
        handle.select_or_move(at(2, 0)).await.unwrap();
        let state = handle.state().await.unwrap();
        assert_eq!(state.turn, Side::Black);
        assert!(state.selection.is_none());
        assert_eq!(handle.board().await.unwrap(), after_reply);
    }

    #[tokio::test]
    async fn test_restart_replays_computer_opening() {
        let handle = GameSession::spawn(&vs_computer(Side::White, Difficulty::Easy));
        let opening = handle.board().await.unwrap();

        handle.restart().await.unwrap();
        let state = handle.state().await.unwrap();
        // 回到初始局面后电脑立刻再走一步
        assert_eq!(state.turn, Side::White);
        assert_eq!(state.pieces.len(), 32);
        assert!(!state.checkmate);
        assert_ne!(opening, Board::initial());
        assert_ne!(handle.board().await.unwrap(), Board::initial());
    }

    #[tokio::test]
    async fn test_local_restart() {
        let config = GameConfig {
            mode: GameMode::Local,
            ..GameConfig::default()
        };
        let handle = GameSession::spawn(&config);

        handle.select_or_move(at(6, 4)).await.unwrap();
        handle.select_or_move(at(4, 4)).await.unwrap();
        assert_eq!(handle.state().await.unwrap().turn, Side::White);

        handle.restart().await.unwrap();
        assert_eq!(handle.board().await.unwrap(), Board::initial());
        assert_eq!(handle.state().await.unwrap().turn, Side::Black);
    }

    #[tokio::test]
    async fn test_online_round_trip() {
        let config = GameConfig {
            mode: GameMode::Online {
                local_side: Side::Black,
            },
            ..GameConfig::default()
        };
        let handle = GameSession::spawn(&config);
        let mut events = handle.subscribe();

        handle.select_or_move(at(6, 4)).await.unwrap();
        handle.select_or_move(at(4, 4)).await.unwrap();
        let local = handle.board().await.unwrap();

        let committed: Vec<Board> = drain(&mut events)
            .into_iter()
            .filter_map(|event| match event {
                GameEvent::MoveCommitted(board) => Some(board),
                GameEvent::StateChanged(_) => None,
            })
            .collect();
        assert_eq!(committed, vec![local.snapshot()]);

        let mut remote = local.snapshot();
        remote.relocate(at(1, 4), at(3, 4)).unwrap();
        handle.apply_remote_move(remote.snapshot()).await.unwrap();

        assert_eq!(handle.board().await.unwrap(), remote);
        assert_eq!(handle.state().await.unwrap().turn, Side::Black);
        // 远程走子只发状态事件
        assert!(drain(&mut events)
            .iter()
            .all(|event| matches!(event, GameEvent::StateChanged(_))));
    }

    #[tokio::test]
    async fn test_promotion_handler_configured() {
        let config = GameConfig {
            mode: GameMode::Local,
            ..GameConfig::default()
        };
        let handle = GameSession::spawn_with(&config, |game| {
            game.set_promotion_handler(Box::new(|_: PromotionKind| Some("rook".to_string())));
        });

        // 黑兵一路吃到白方底线
        let moves = [
            ((6, 1), (4, 1)),
            ((1, 0), (3, 0)),
            ((4, 1), (3, 0)),
            ((1, 7), (2, 7)),
            ((3, 0), (2, 0)),
            ((2, 7), (3, 7)),
            ((2, 0), (1, 1)),
            ((3, 7), (4, 7)),
            ((1, 1), (0, 2)),
        ];
        for ((from_row, from_column), (to_row, to_column)) in moves {
            handle.select_or_move(at(from_row, from_column)).await.unwrap();
            handle.select_or_move(at(to_row, to_column)).await.unwrap();
        }

        let board = handle.board().await.unwrap();
        let promoted = board.get(at(0, 2)).unwrap();
        assert_eq!(promoted.kind, PieceKind::Rook);
        assert_eq!(promoted.side, Side::Black);
    }

    #[tokio::test]
    async fn test_engine_rebuilt_after_failed_search() {
        let (mut session, _handle) =
            GameSession::new(&vs_computer(Side::White, Difficulty::Easy), |_| {});
        assert!(session.game.computer_to_move());

        // 模拟搜索线程崩溃：引擎随任务一起丢失
        let lost = session.engine.take();
        assert!(lost.is_some());
        let failed = tokio::task::spawn_blocking(move || -> (AiEngine, Option<MoveCandidate>) {
            drop(lost);
            panic!("search thread crashed")
        })
        .await
        .unwrap_err();

        session.finish_computer_turn(Err(failed));
        assert!(session.engine.is_some());
        assert_eq!(session.game.turn(), Side::Black);

        // 重建的引擎仍能完成电脑回合
        session.play_computer_turn().await;
        assert_eq!(session.game.turn(), Side::White);
        assert_ne!(session.game.board().snapshot(), Board::initial());
        assert!(session.engine.is_some());
    }

    #[tokio::test]
    async fn test_closed_session() {
        let (commands, rx) = mpsc::channel(1);
        drop(rx);
        let (events, _) = broadcast::channel(1);
        let handle = GameHandle { commands, events };

        assert!(matches!(
            handle.select_or_move(at(0, 0)).await,
            Err(GameError::SessionClosed)
        ));
        assert!(matches!(handle.state().await, Err(GameError::SessionClosed)));
    }
}
