//! 两层走法树
//!
//! 第一层是己方的每个安全走法，第二层是对方在走完后的局面上的每个安全应着。
//! 应着的得分累加在父节点得分之上。树每回合重新构建，选完即丢弃。

use chess_core::{Board, MoveCandidate, PieceKind, Rules, Side};

use crate::evaluate::Evaluator;

/// 树节点，独占其子节点
#[derive(Debug, Clone)]
pub struct MoveNode {
    pub candidate: MoveCandidate,
    /// 走完后的假想棋盘
    pub board_after: Board,
    /// 累计得分
    pub score: i32,
    /// 对方的应着
    pub children: Vec<MoveNode>,
    /// 走完后对方被将死
    pub checkmate: bool,
}

impl MoveNode {
    /// 该分支的最高叶子得分
    ///
    /// 对方被将死时按吃王计分；对方无子可走但未被将军（逼和）时该分支没有叶子。
    pub fn best_leaf(&self) -> Option<i32> {
        if self.checkmate {
            return Some(self.score + PieceKind::King.capture_value());
        }
        self.children.iter().map(|child| child.score).max()
    }
}

/// 两层走法树
#[derive(Debug)]
pub struct MoveTree {
    roots: Vec<MoveNode>,
}

impl MoveTree {
    /// 从当前局面和己方安全走法构建
    pub fn build(board: &Board, side: Side, moves: &[MoveCandidate]) -> Self {
        let replier = side.opponent();
        let roots = Evaluator::rank_moves(board, moves, side)
            .into_iter()
            .map(|root| {
                let replies = Rules::legal_moves(replier, &root.board_after);
                let children = Evaluator::rank_moves(&root.board_after, &replies, replier)
                    .into_iter()
                    .map(|reply| MoveNode {
                        candidate: reply.candidate,
                        board_after: reply.board_after,
                        score: root.score + reply.score,
                        children: Vec::new(),
                        checkmate: false,
                    })
                    .collect();
                let checkmate =
                    replies.is_empty() && Rules::is_in_check(&root.board_after, replier);

                MoveNode {
                    candidate: root.candidate,
                    board_after: root.board_after,
                    score: root.score,
                    children,
                    checkmate,
                }
            })
            .collect();

        Self { roots }
    }

    pub fn roots(&self) -> &[MoveNode] {
        &self.roots
    }

    /// 节点总数
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(|root| 1 + root.children.len()).sum()
    }

    /// 全树最高叶子得分，没有任何叶子时为 None
    pub fn best_score(&self) -> Option<i32> {
        self.roots.iter().filter_map(MoveNode::best_leaf).max()
    }

    /// 拥有最高叶子得分的第一层走法
    ///
    /// 所有走法都逼和对方时没有叶子可比，全部第一层走法并列。
    pub fn best_moves(&self) -> Vec<&MoveNode> {
        let Some(best) = self.best_score() else {
            return self.roots.iter().collect();
        };
        self.roots
            .iter()
            .filter(|root| root.best_leaf() == Some(best))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Coords, Layout};

    fn at(row: i8, column: i8) -> Coords {
        Coords::new_unchecked(row, column)
    }

    #[test]
    fn test_tree_shape() {
        let board = Board::initial();
        let moves = Rules::legal_moves(Side::Black, &board);
        let tree = MoveTree::build(&board, Side::Black, &moves);

        assert_eq!(tree.roots().len(), 20);
        for root in tree.roots() {
            // 开局每一步之后白方都有 20 个应着
            assert_eq!(root.children.len(), 20);
            assert_eq!(root.score, 0);
        }
        assert_eq!(tree.node_count(), 20 + 20 * 20);
    }

    #[test]
    fn test_children_accumulate_parent_score() {
        let board = Layout::parse(
            "
            ....k...
            ........
            ........
            ........
            ...q....
            ........
            ........
            ...R...K
            ",
        )
        .unwrap();

        let moves = Rules::legal_moves(Side::White, &board);
        let tree = MoveTree::build(&board, Side::White, &moves);

        for root in tree.roots() {
            for child in &root.children {
                let reply = Evaluator::score_move(&root.board_after, &child.candidate, Side::Black)
                    .unwrap();
                assert_eq!(child.score, root.score + reply.score);
            }
        }
    }

    #[test]
    fn test_mating_move_is_best() {
        // 车走到第 7 行形成底线杀，黑方无应着
        let board = Layout::parse(
            "
            ......k.
            .....ppp
            ........
            ........
            ........
            ........
            ........
            R.....K.
            ",
        )
        .unwrap();

        let moves = Rules::legal_moves(Side::White, &board);
        let tree = MoveTree::build(&board, Side::White, &moves);

        let best = tree.best_moves();
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].candidate.origin, Some(at(0, 0)));
        assert_eq!(best[0].candidate.target, at(7, 0));
        assert!(best[0].children.is_empty());
        assert!(best[0].checkmate);
        assert_eq!(tree.best_score(), Some(100));
    }

    /// 白后走到 (6,2) 时黑王无子可走但未被将军
    fn stalemate_trap() -> Board {
        Layout::parse(
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
        .unwrap()
    }

    #[test]
    fn test_stalemating_move_is_not_scored_as_mate() {
        let board = stalemate_trap();
        let stalemate = MoveCandidate::new(at(6, 2)).with_origin(at(2, 2));

        let moves = Rules::legal_moves(Side::White, &board);
        assert!(moves.contains(&stalemate));
        let tree = MoveTree::build(&board, Side::White, &moves);

        let root = tree
            .roots()
            .iter()
            .find(|root| root.candidate == stalemate)
            .unwrap();
        assert!(root.children.is_empty());
        assert!(!root.checkmate);
        assert_eq!(root.best_leaf(), None);

        let best = tree.best_moves();
        assert!(!best.is_empty());
        assert!(best.iter().all(|node| node.candidate != stalemate));
        assert!(tree.best_score() < Some(PieceKind::King.capture_value()));
    }

    #[test]
    fn test_only_stalemating_moves_fall_back_to_all_roots() {
        let board = stalemate_trap();
        let stalemate = MoveCandidate::new(at(6, 2)).with_origin(at(2, 2));

        let tree = MoveTree::build(&board, Side::White, &[stalemate]);
        assert_eq!(tree.best_score(), None);

        let best = tree.best_moves();
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].candidate, stalemate);
    }

    #[test]
    fn test_empty_tree() {
        let tree = MoveTree::build(&Board::initial(), Side::Black, &[]);
        assert!(tree.roots().is_empty());
        assert!(tree.best_moves().is_empty());
        assert_eq!(tree.best_score(), None);
    }
}
