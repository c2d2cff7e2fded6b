use std::path::PathBuf;

use anyhow::Result;
use chess_ai::{AiConfig, AiEngine, Difficulty};
use chess_core::Side;
use chess_game::{GameConfig, GameMode, GameSession};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 演示对局的最大半回合数
const MAX_PLIES: usize = 200;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("chess_game=debug".parse()?))
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(GameConfig::default_path)
        .unwrap_or_else(|| PathBuf::from("chess-game.json"));
    let mut config = GameConfig::load(&path);

    if config.mode.is_online() {
        warn!("演示程序没有网络层，改为本地对局");
        config.mode = GameMode::Local;
    }

    info!("国际象棋演示对局启动: {:?}", config.mode);
    let handle = GameSession::spawn(&config);

    // 代替本地玩家走子的引擎
    let seeded = |difficulty: Difficulty, offset: u64| {
        let ai = AiConfig::from_difficulty(difficulty);
        AiEngine::new(match config.ai_seed {
            Some(seed) => ai.with_seed(seed.wrapping_add(offset)),
            None => ai,
        })
    };
    let mut black = seeded(Difficulty::Medium, 1);
    let mut white = seeded(Difficulty::Hard, 2);

    for _ in 0..MAX_PLIES {
        let state = handle.state().await?;
        if state.checkmate {
            break;
        }

        let board = handle.board().await?;
        let engine = match state.turn {
            Side::Black => &mut black,
            Side::White => &mut white,
        };
        let Some(mv) = engine.search(&board, state.turn) else {
            warn!("{} 无子可走", state.turn.name());
            break;
        };
        let Some(origin) = mv.origin else {
            break;
        };

        handle.select_or_move(origin).await?;
        handle.select_or_move(mv.target).await?;
    }

    let state = handle.state().await?;
    match state.winner() {
        Some(side) => info!("对局结束，{} 获胜", side.name()),
        None => info!("对局未分胜负"),
    }
    println!("{}", handle.board().await?);

    Ok(())
}
