//! 对局配置
//!
//! JSON 文件持久化，读取失败时回退到默认配置。

use std::fs;
use std::path::{Path, PathBuf};

use chess_ai::{AiConfig, Difficulty};
use chess_core::Side;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GameError, Result};

/// 对局模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameMode {
    /// 本地双人
    Local,
    /// 人机对战
    VsComputer { human_side: Side, difficulty: Difficulty },
    /// 联机对战，对方的走法由网络层推送
    Online { local_side: Side },
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::VsComputer {
            human_side: Side::Black,
            difficulty: Difficulty::default(),
        }
    }
}

impl GameMode {
    /// 电脑执棋的一方
    pub fn computer_side(&self) -> Option<Side> {
        match self {
            GameMode::VsComputer { human_side, .. } => Some(human_side.opponent()),
            _ => None,
        }
    }

    /// 本地输入在该方走子时是否有效
    pub fn accepts_input(&self, turn: Side) -> bool {
        match self {
            GameMode::Local => true,
            GameMode::VsComputer { human_side, .. } => *human_side == turn,
            GameMode::Online { local_side } => *local_side == turn,
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, GameMode::Online { .. })
    }
}

/// 对局配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 对局模式
    pub mode: GameMode,
    /// AI 随机种子
    pub ai_seed: Option<u64>,
    /// 事件广播通道容量
    pub event_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            ai_seed: None,
            event_capacity: 64,
        }
    }
}

impl GameConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("chess-game");
            path.push("config.json");
            path
        })
    }

    /// 从文件加载配置，失败时使用默认配置
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("配置文件不存在，使用默认配置");
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                info!("已加载配置: {:?}", path);
                config
            }
            Err(e) => {
                warn!("无法加载配置文件: {}，使用默认配置", e);
                Self::default()
            }
        }
    }

    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 保存配置
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("配置已保存: {:?}", path);
        Ok(())
    }

    /// 保存到默认路径
    pub fn save_default(&self) -> Result<()> {
        let path = Self::default_path().ok_or(GameError::NoConfigDir)?;
        self.save(&path)
    }

    /// 电脑对手的 AI 配置（非人机模式为 None）
    pub fn ai_config(&self) -> Option<AiConfig> {
        let GameMode::VsComputer { difficulty, .. } = self.mode else {
            return None;
        };
        let config = AiConfig::from_difficulty(difficulty);
        Some(match self.ai_seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        })
    }
}
