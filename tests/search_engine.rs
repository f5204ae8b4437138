// End-to-end tests of the search engines against the synthetic fixture.

mod common;

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use common::{brute_force_pts, PickBoard, PickMove};
use gametree::{
    EngineError, Player, RandomMode, SearchAlgorithm, SearchEngine, SearchEngineSetting,
    SearchOutcome, ThreadingMode, TransTableSharing,
};

fn fixed_depth_setting(algorithm: SearchAlgorithm, depth: u32, use_tt: bool) -> SearchEngineSetting {
    SearchEngineSetting {
        algorithm,
        use_trans_table: use_tt,
        use_iterative_depth_search: false,
        threading_mode: ThreadingMode::Off,
        search_depth: depth,
        time_out_in_sec: 0,
        random_mode: RandomMode::Off,
        trans_table_entry_count: 4096,
        trans_table_sharing: TransTableSharing::Shared,
    }
}

/// Runs a synchronous (`ThreadingMode::Off`) search and returns the outcome
/// delivered through the callback.
fn search_blocking(
    board: &PickBoard,
    setting: &SearchEngineSetting,
    player: Player,
) -> SearchOutcome<PickMove> {
    let engine = SearchEngine::new();
    let slot = Arc::new(Mutex::new(None));
    let sink = slot.clone();
    let started = engine
        .find_best_move(board, setting, player, move |outcome| {
            *sink.lock().unwrap() = Some(outcome);
        })
        .unwrap();
    assert!(started);
    let outcome = slot.lock().unwrap().take();
    outcome.expect("synchronous search delivers before returning")
}

#[test]
fn deterministic_under_repeatable_shuffle() {
    let _ = env_logger::builder().is_test(true).try_init();

    let board = PickBoard::new(4);
    let mut setting = fixed_depth_setting(SearchAlgorithm::MinMax, 3, true);
    setting.random_mode = RandomMode::OnRepetitive;

    let first = search_blocking(&board, &setting, Player::One);
    let second = search_blocking(&board, &setting, Player::One);

    assert_eq!(first.best_move, second.best_move);
    assert_eq!(first.pts, second.pts);
    assert_eq!(first.perm_count, second.perm_count);
    assert_eq!(first.cache_hit, second.cache_hit);
}

#[test]
fn both_engines_match_the_reference_value() {
    let board = PickBoard::new(4);
    let expected = brute_force_pts(&mut board.clone(), Player::One, 4);

    for use_tt in [false, true] {
        let minmax = search_blocking(
            &board,
            &fixed_depth_setting(SearchAlgorithm::MinMax, 4, use_tt),
            Player::One,
        );
        let alpha_beta = search_blocking(
            &board,
            &fixed_depth_setting(SearchAlgorithm::AlphaBeta, 4, use_tt),
            Player::One,
        );
        assert_eq!(minmax.pts, expected, "minmax, use_tt {}", use_tt);
        assert_eq!(alpha_beta.pts, expected, "alpha-beta, use_tt {}", use_tt);
    }
}

#[test]
fn minimizing_side_matches_the_reference_value() {
    let board = PickBoard::new(4);
    let expected = brute_force_pts(&mut board.clone(), Player::Two, 3);

    for algorithm in [SearchAlgorithm::MinMax, SearchAlgorithm::AlphaBeta] {
        let outcome = search_blocking(
            &board,
            &fixed_depth_setting(algorithm, 3, false),
            Player::Two,
        );
        assert_eq!(outcome.pts, expected, "{:?}", algorithm);
        assert!(outcome.best_move.is_some());
    }
}

#[test]
fn parallel_fan_out_matches_single_thread_score() {
    let board = PickBoard::new(6);
    let single = search_blocking(
        &board,
        &fixed_depth_setting(SearchAlgorithm::AlphaBeta, 3, false),
        Player::One,
    );

    let mut setting = fixed_depth_setting(SearchAlgorithm::AlphaBeta, 3, false);
    setting.threading_mode = ThreadingMode::OnePerProcessor;
    let engine = SearchEngine::new();
    let (tx, rx) = mpsc::channel();
    let started = engine
        .find_best_move(&board, &setting, Player::One, move |outcome| {
            let _ = tx.send(outcome);
        })
        .unwrap();
    assert!(started);
    let parallel = rx
        .recv_timeout(Duration::from_secs(30))
        .expect("parallel search delivers");

    assert_eq!(parallel.pts, single.pts);
    assert!(parallel.best_move.is_some());
}

#[test]
fn time_boxed_search_completes_with_a_result() {
    let board = PickBoard::new(4);
    let mut setting = fixed_depth_setting(SearchAlgorithm::MinMax, 0, true);
    setting.search_depth = 0;
    setting.time_out_in_sec = 1;

    let outcome = search_blocking(&board, &setting, Player::One);
    assert!(outcome.best_move.is_some());
    assert!(outcome.max_depth >= 1);
    assert!(outcome.perm_count > 0);
}

#[test]
fn cancellation_keeps_best_so_far_and_frees_the_engine() {
    let board = PickBoard::new(4);
    let mut setting = fixed_depth_setting(SearchAlgorithm::AlphaBeta, 24, false);
    setting.use_iterative_depth_search = true;
    setting.threading_mode = ThreadingMode::SingleBackgroundThread;

    let engine = SearchEngine::new();
    let (tx, rx) = mpsc::channel();
    let started = engine
        .find_best_move(&board, &setting, Player::One, move |outcome| {
            let _ = tx.send(outcome);
        })
        .unwrap();
    assert!(started);
    assert!(engine.is_search_ongoing());

    // A second request while one is in flight is rejected, not queued.
    let busy = engine
        .find_best_move(&board, &setting, Player::One, |_| {})
        .unwrap();
    assert!(!busy);

    thread::sleep(Duration::from_millis(150));
    engine.cancel_search();

    let outcome = rx
        .recv_timeout(Duration::from_secs(30))
        .expect("cancelled search still delivers");
    assert!(outcome.best_move.is_some(), "a completed round existed");
    assert!(outcome.max_depth >= 1);
    assert!(!engine.is_search_ongoing());
}

#[test]
fn draw_by_repetition_scores_zero_and_gets_picked() {
    let mut board = PickBoard::new(3);
    board.draw_move = Some(1);
    board.negative_eval = true; // every real line ends below zero

    let outcome = search_blocking(
        &board,
        &fixed_depth_setting(SearchAlgorithm::AlphaBeta, 3, false),
        Player::One,
    );
    assert_eq!(outcome.best_move, Some(PickMove(1)));
    assert_eq!(outcome.pts, 0);
}

#[test]
fn empty_move_list_is_a_graceful_no_op() {
    let board = PickBoard::new(0);
    let outcome = search_blocking(
        &board,
        &fixed_depth_setting(SearchAlgorithm::MinMax, 3, false),
        Player::One,
    );
    assert!(outcome.best_move.is_none());
    assert_eq!(outcome.perm_count, 0);
}

#[test]
fn single_move_is_still_searched() {
    let board = PickBoard::new(1);
    let outcome = search_blocking(
        &board,
        &fixed_depth_setting(SearchAlgorithm::AlphaBeta, 3, false),
        Player::One,
    );
    assert_eq!(outcome.best_move, Some(PickMove(0)));
    assert!(outcome.perm_count > 0);
}

#[test]
fn zero_depth_without_timeout_is_rejected_up_front() {
    let board = PickBoard::new(4);
    let mut setting = fixed_depth_setting(SearchAlgorithm::AlphaBeta, 0, false);
    setting.time_out_in_sec = 0;

    let engine = SearchEngine::new();
    let err = engine
        .find_best_move(&board, &setting, Player::One, |_| {})
        .unwrap_err();
    assert_eq!(err, EngineError::MissingTimeout);
    // The rejection must not leave the engine marked busy.
    assert!(!engine.is_search_ongoing());

    setting.time_out_in_sec = 1;
    let outcome = search_blocking(&board, &setting, Player::One);
    assert!(outcome.best_move.is_some());
}

#[test]
fn iterative_deepening_reaches_the_requested_ply_limit() {
    let board = PickBoard::new(3);
    let mut setting = fixed_depth_setting(SearchAlgorithm::AlphaBeta, 5, true);
    setting.use_iterative_depth_search = true;

    let outcome = search_blocking(&board, &setting, Player::One);
    assert_eq!(outcome.max_depth, 5);
    assert_eq!(
        outcome.pts,
        brute_force_pts(&mut board.clone(), Player::One, 5)
    );
}
