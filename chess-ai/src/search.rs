//! 搜索引擎
//!
//! 三档难度共用同一套安全走法：
//! - Easy：随机安全走法
//! - Medium：贪心（吃子减被反吃）
//! - Hard：两层走法树

use chess_core::{Board, MoveCandidate, Rules, Side};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::evaluate::Evaluator;
use crate::tree::MoveTree;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    /// 简单：随机安全走法
    Easy,
    /// 中等：贪心
    #[default]
    Medium,
    /// 困难：两层走法树
    Hard,
}

impl Difficulty {
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "random-safe",
            Difficulty::Medium => "greedy",
            Difficulty::Hard => "two-ply",
        }
    }
}

/// AI 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// 固定随机种子，便于复现
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// AI 引擎
#[derive(Debug)]
pub struct AiEngine {
    config: AiConfig,
    rng: ChaCha8Rng,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            config,
            rng,
            nodes_searched: 0,
        }
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 为 `side` 选择一步走法，没有安全走法时返回 None
    pub fn search(&mut self, board: &Board, side: Side) -> Option<MoveCandidate> {
        self.nodes_searched = 0;

        let moves = Rules::legal_moves(side, board);
        if moves.is_empty() {
            debug!("{} 没有安全走法", side.name());
            return None;
        }

        let choice = match self.config.difficulty {
            Difficulty::Easy => self.pick_random(&moves),
            Difficulty::Medium => self.pick_greedy(board, side, &moves),
            Difficulty::Hard => self.pick_tree(board, side, &moves),
        };

        debug!(
            "{} ({}) 搜索节点 {}，选择 {:?}",
            side.name(),
            self.config.difficulty.name(),
            self.nodes_searched,
            choice
        );
        choice
    }

    fn pick_random(&mut self, moves: &[MoveCandidate]) -> Option<MoveCandidate> {
        self.nodes_searched = moves.len() as u64;
        moves.choose(&mut self.rng).copied()
    }

    fn pick_greedy(
        &mut self,
        board: &Board,
        side: Side,
        moves: &[MoveCandidate],
    ) -> Option<MoveCandidate> {
        let scored = Evaluator::rank_moves(board, moves, side);
        self.nodes_searched = scored.len() as u64;

        let best = scored.iter().map(|mv| mv.score).max()?;
        let top: Vec<MoveCandidate> = scored
            .iter()
            .filter(|mv| mv.score == best)
            .map(|mv| mv.candidate)
            .collect();
        top.choose(&mut self.rng).copied()
    }

    fn pick_tree(
        &mut self,
        board: &Board,
        side: Side,
        moves: &[MoveCandidate],
    ) -> Option<MoveCandidate> {
        let tree = MoveTree::build(board, side, moves);
        self.nodes_searched = tree.node_count() as u64;

        let best = tree.best_moves();
        debug!("两层走法树最高分 {:?}，候选 {}", tree.best_score(), best.len());
        best.choose(&mut self.rng).map(|node| node.candidate)
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Coords, Layout};

    fn at(row: i8, column: i8) -> Coords {
        Coords::new_unchecked(row, column)
    }

    fn seeded(difficulty: Difficulty, seed: u64) -> AiEngine {
        AiEngine::new(AiConfig::from_difficulty(difficulty).with_seed(seed))
    }

    /// 白车可以白吃黑后，黑方无法反吃
    fn free_queen() -> Board {
        Layout::parse(
            "
            ....k...
            ........
            ........
            ...q....
            ........
            ........
            ........
            K..R....
            ",
        )
        .unwrap()
    }

    #[test]
    fn test_search_initial_position() {
        let board = Board::initial();
        let legal = Rules::legal_moves(Side::Black, &board);

        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let mut engine = seeded(difficulty, 7);
            let mv = engine.search(&board, Side::Black).unwrap();
            assert!(legal.contains(&mv), "{:?} 选了非法走法 {}", difficulty, mv);
            assert!(engine.nodes_searched() > 0);
        }
    }

    #[test]
    fn test_random_picks_only_safe_moves() {
        // 白王被将军，只有三个安全走法
        let board = Layout::parse(
            "
            ....k...
            ........
            ........
            ........
            ........
            ........
            ........
            r...K...
            ",
        )
        .unwrap();
        let legal = Rules::legal_moves(Side::White, &board);

        let mut engine = seeded(Difficulty::Easy, 1);
        for _ in 0..20 {
            let mv = engine.search(&board, Side::White).unwrap();
            assert!(legal.contains(&mv));
            assert_eq!(mv.target.row, 1);
        }
    }

    #[test]
    fn test_greedy_takes_free_queen() {
        let board = free_queen();
        let capture = MoveCandidate::new(at(4, 3)).with_origin(at(0, 3));

        let scored = Evaluator::rank_moves(&board, &Rules::legal_moves(Side::White, &board), Side::White);
        let capture_score = scored
            .iter()
            .find(|mv| mv.candidate == capture)
            .map(|mv| mv.score)
            .unwrap();
        assert_eq!(capture_score, 15);
        for mv in scored.iter().filter(|mv| mv.candidate != capture) {
            assert!(mv.score < capture_score);
        }

        for seed in 0..5 {
            let mut engine = seeded(Difficulty::Medium, seed);
            assert_eq!(engine.search(&board, Side::White), Some(capture));
        }
    }

    #[test]
    fn test_hard_takes_free_queen() {
        let board = free_queen();
        let capture = MoveCandidate::new(at(4, 3)).with_origin(at(0, 3));

        let mut engine = seeded(Difficulty::Hard, 3);
        assert_eq!(engine.search(&board, Side::White), Some(capture));
    }

    #[test]
    fn test_hard_avoids_stalemate() {
        // 白后走到 (6,2) 会逼和黑王
        let board = Layout::parse(
            "
            k.......
            ........
            ........
            ........
            ........
            ..Q.....
            ........
            ......K.
            ",
        )
        .unwrap();

        for seed in 0..10 {
            let mut engine = seeded(Difficulty::Hard, seed);
            let mv = engine.search(&board, Side::White).unwrap();
            let after = Rules::apply_candidate(&board, &mv).unwrap();
            assert!(
                !Rules::legal_moves(Side::Black, &after).is_empty(),
                "种子 {} 选了逼和走法 {}",
                seed,
                mv
            );
        }
    }

    #[test]
    fn test_seeded_engines_agree() {
        let board = Board::initial();
        let mut a = seeded(Difficulty::Easy, 42);
        let mut b = seeded(Difficulty::Easy, 42);
        for _ in 0..10 {
            assert_eq!(a.search(&board, Side::Black), b.search(&board, Side::Black));
        }
    }

    #[test]
    fn test_no_move_returns_none() {
        let board = Layout::parse(
            "
            ......k.
            ........
            ........
            ........
            ........
            ........
            .....PPP
            r.....K.
            ",
        )
        .unwrap();

        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let mut engine = seeded(difficulty, 0);
            assert_eq!(engine.search(&board, Side::White), None);
        }
    }

    #[test]
    fn test_difficulty_config() {
        assert_eq!(AiConfig::default().difficulty, Difficulty::Medium);
        assert_eq!(AiConfig::default().seed, None);

        let hard = AiConfig::from_difficulty(Difficulty::Hard).with_seed(9);
        assert_eq!(hard.difficulty, Difficulty::Hard);
        assert_eq!(hard.seed, Some(9));
    }
}
