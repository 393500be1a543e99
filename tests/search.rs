//! Search integration tests: alpha-beta against exhaustive negamax, limits,
//! and strategy legality over short self-play games.

use chess_core::ai::evaluation::{MATE_SCORE, evaluate_relative};
use chess_core::ai::player::Player;
use chess_core::ai::search::{SearchLimits, Searcher};
use chess_core::ai::tree::{GameTree, NodeId};
use chess_core::engine::board::Position;
use chess_core::engine::check::is_king_in_check;
use chess_core::engine::game::Game;
use chess_core::engine::movegen::legal_moves_for_side;
use chess_core::engine::types::{Color, GameStatus};

/// Plain negamax over the same child construction, no pruning.
fn brute_force(tree: &mut GameTree, id: NodeId, depth: u32) -> f64 {
    let pos = tree.node(id).position.clone();
    if depth == 0 {
        return evaluate_relative(&pos);
    }
    let moves = legal_moves_for_side(&pos);
    if moves.is_empty() {
        let in_check = is_king_in_check(pos.board(), &pos, pos.side_to_move()).unwrap_or(true);
        return if in_check { -MATE_SCORE } else { 0.0 };
    }
    let mut best = f64::NEG_INFINITY;
    for mv in moves {
        let child = tree.add_child(id, mv);
        best = best.max(-brute_force(tree, child, depth - 1));
    }
    best
}

fn brute_force_root(pos: &Position, depth: u32) -> f64 {
    let mut tree = GameTree::new(pos.clone());
    brute_force(&mut tree, GameTree::ROOT, depth)
}

const CORPUS: [(&str, u32); 6] = [
    ("4k3/8/8/3r4/8/8/3Q4/4K3 w - - 0 1", 3),
    ("4k3/8/8/3r4/8/8/3Q4/4K3 b - - 0 1", 3),
    ("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1", 3),
    ("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4", 2),
    ("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 2),
    ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 2),
];

#[test]
fn alpha_beta_matches_exhaustive_negamax() {
    for (fen, depth) in CORPUS {
        let pos = Position::from_fen(fen).unwrap();
        let color = pos.side_to_move();
        let report = Searcher::with_depth(depth).search_with_report(&pos, color);
        let expected = brute_force_root(&pos, depth);
        assert_eq!(report.score, expected, "{fen} at depth {depth}");
    }
}

#[test]
fn chosen_move_achieves_the_reported_score() {
    for (fen, depth) in CORPUS {
        let pos = Position::from_fen(fen).unwrap();
        let report = Searcher::with_depth(depth).search_with_report(&pos, pos.side_to_move());
        let best = report.best_move.unwrap();

        let mut tree = GameTree::new(pos.clone());
        let child = tree.add_child(GameTree::ROOT, best);
        let value = -brute_force(&mut tree, child, depth - 1);
        assert_eq!(value, report.score, "{fen}: {best}");
    }
}

#[test]
fn pruning_visits_fewer_nodes_than_exhaustive_search() {
    let pos = Position::starting();
    let report = Searcher::with_depth(3).search_with_report(&pos, Color::White);

    let mut tree = GameTree::new(pos.clone());
    brute_force(&mut tree, GameTree::ROOT, 3);
    assert!(report.stats.nodes < tree.len() as u64);
    assert_eq!(tree.len(), 1 + 20 + 400 + 8_902);
}

#[test]
fn node_budget_and_depth_are_respected() {
    let pos =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    for budget in [1u64, 5, 50] {
        let limits = SearchLimits::depth(3).with_max_nodes(budget);
        let report = Searcher::new(limits).search_with_report(&pos, Color::White);
        assert!(report.stats.expanded <= budget, "budget {budget}");
        assert!(report.stats.max_ply <= 3);
        assert!(report.best_move.is_some());
    }

    let one = Searcher::new(SearchLimits::depth(4).with_max_nodes(1))
        .search_with_report(&pos, Color::White);
    // Only the root is expanded: its 48 children are scored statically.
    assert_eq!(one.stats.expanded, 1);
    assert_eq!(one.stats.nodes, 49);
    assert_eq!(one.stats.max_ply, 1);
}

#[test]
fn report_tree_serializes() {
    let report = Searcher::with_depth(2).search_with_report(&Position::starting(), Color::White);
    let summary = report.tree.summary(1);
    assert_eq!(summary.children.len(), 20);
    let json = summary.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value["fen"],
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    );
    assert_eq!(value["children"].as_array().unwrap().len(), 20);
}

#[test]
fn self_play_games_stay_legal() {
    let pairings = [
        (Player::Random, Player::Random),
        (Player::Greedy, Player::Random),
        (Player::Search(SearchLimits::depth(1)), Player::Greedy),
    ];
    for (white, black) in pairings {
        let mut game = Game::new();
        while !game.is_game_over() && game.ply_count() < 40 {
            let color = game.side_to_move();
            let player = if color == Color::White { white } else { black };
            let mv = player.choose_move(game.position(), color).unwrap();
            assert!(game.legal_moves().contains(&mv), "{player} chose {mv}");
            game.play(mv).unwrap();
        }
        assert_eq!(game.history().len(), game.ply_count());
        if game.is_game_over() {
            assert!(matches!(
                game.status(),
                GameStatus::Checkmate | GameStatus::NoLegalMoves
            ));
        }
    }
}
