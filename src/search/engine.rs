// Search orchestration: busy/cancel state, root move list handling, the
// worker fan-out across cloned boards, and result merging.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, SeedableRng};

use crate::core::{AttackPosInfo, GameBoard, MinMaxResult, Player, SearchOutcome};
use crate::search::context::SearchContext;
use crate::search::error::EngineError;
use crate::search::setting::{RandomMode, SearchAlgorithm, SearchEngineSetting, ThreadingMode};
use crate::search::trans_table::TransTable;
use crate::search::{alpha_beta, minmax};

/// Seed of the repeatable shuffle mode.
const REPETITIVE_SEED: u64 = 0;

/// Busy/cancel state for one engine, shared by every thread touching a
/// search. Injectable so tests can hand each engine a fresh handle instead
/// of relying on hidden globals.
#[derive(Debug, Default)]
pub struct SearchController {
    busy: AtomicBool,
    cancel: AtomicBool,
}

impl SearchController {
    pub fn new() -> Self {
        SearchController::default()
    }

    /// True while a root search is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Requests cooperative cancellation. Idempotent, fire and forget; the
    /// search observes the flag at its next terminal check.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Claims the busy flag for a new root search; resets the cancel flag
    /// on success.
    fn try_begin(&self) -> bool {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.cancel.store(false, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    fn end(&self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Entry point of the search core. One engine runs at most one root search
/// at a time; concurrent requests are rejected, not queued.
pub struct SearchEngine {
    controller: Arc<SearchController>,
}

impl SearchEngine {
    pub fn new() -> Self {
        SearchEngine::with_controller(Arc::new(SearchController::new()))
    }

    /// Builds an engine around an existing controller, so several engines
    /// can share one busy/cancel domain.
    pub fn with_controller(controller: Arc<SearchController>) -> Self {
        SearchEngine { controller }
    }

    /// Handle for cancelling or polling from other threads.
    pub fn controller(&self) -> Arc<SearchController> {
        self.controller.clone()
    }

    pub fn is_search_ongoing(&self) -> bool {
        self.controller.is_busy()
    }

    pub fn cancel_search(&self) {
        self.controller.cancel();
    }

    /// Starts a search for `player`'s best move on `board`.
    ///
    /// Returns `Ok(false)` when a search is already in flight ("engine
    /// busy"); `Err` only for genuine misconfiguration, raised before any
    /// worker is dispatched. On `Ok(true)` the outcome is delivered exactly
    /// once through `on_found` — synchronously for `ThreadingMode::Off`,
    /// from a background worker otherwise (marshalling onto a particular
    /// delivery context is the caller's concern). An empty move list and a
    /// search cancelled before the first root move both deliver
    /// `best_move: None`.
    pub fn find_best_move<B, F>(
        &self,
        board: &B,
        setting: &SearchEngineSetting,
        player: Player,
        on_found: F,
    ) -> Result<bool, EngineError>
    where
        B: GameBoard + 'static,
        F: FnOnce(SearchOutcome<B::Move>) + Send + 'static,
    {
        if setting.search_depth == 0 && setting.time_out_in_sec == 0 {
            return Err(EngineError::MissingTimeout);
        }
        if !self.controller.try_begin() {
            return Ok(false);
        }
        let trans_table = match board.trans_table(setting) {
            Ok(table) => table,
            Err(err) => {
                self.controller.end();
                return Err(err);
            }
        };
        // Fresh generation per root search; values from the previous search
        // must not leak forward.
        if let Some(table) = &trans_table {
            table.reset();
        }

        let (mut moves, attack_player) = board.get_moves(player);
        let (opponent_moves, attack_opponent) = board.get_moves(!player);
        let mut attacks = [AttackPosInfo::default(); 2];
        attacks[player.index()] = attack_player;
        attacks[(!player).index()] = attack_opponent;
        let mut move_counts = [0u32; 2];
        move_counts[player.index()] = moves.len() as u32;
        move_counts[(!player).index()] = opponent_moves.len() as u32;

        shuffle_move_list(&mut moves, setting.random_mode);

        debug!(
            "search started: player {:?}, {:?}, {} root moves",
            player,
            setting.algorithm,
            moves.len()
        );

        let board = board.clone();
        let setting = setting.clone();
        let controller = self.controller.clone();
        match setting.threading_mode {
            ThreadingMode::Off => {
                let outcome = run_search(
                    board,
                    player,
                    moves,
                    attacks,
                    move_counts,
                    &setting,
                    trans_table.as_deref(),
                    &controller,
                    1,
                );
                controller.end();
                on_found(outcome);
            }
            ThreadingMode::SingleBackgroundThread | ThreadingMode::OnePerProcessor => {
                thread::spawn(move || {
                    let workers = worker_count(&setting, moves.len());
                    let outcome = run_search(
                        board,
                        player,
                        moves,
                        attacks,
                        move_counts,
                        &setting,
                        trans_table.as_deref(),
                        &controller,
                        workers,
                    );
                    controller.end();
                    on_found(outcome);
                });
            }
        }
        Ok(true)
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        SearchEngine::new()
    }
}

/// Worker count for one search: one worker per processor, never more than
/// one per root move.
fn worker_count(setting: &SearchEngineSetting, move_count: usize) -> usize {
    match setting.threading_mode {
        ThreadingMode::OnePerProcessor => num_cpus::get().min(move_count).max(1),
        _ => 1,
    }
}

/// Runs one root search to completion: fan-out, join, merge.
#[allow(clippy::too_many_arguments)]
fn run_search<B: GameBoard>(
    mut board: B,
    player: Player,
    moves: Vec<B::Move>,
    attacks: [AttackPosInfo; 2],
    move_counts: [u32; 2],
    setting: &SearchEngineSetting,
    trans_table: Option<&TransTable>,
    controller: &SearchController,
    workers: usize,
) -> SearchOutcome<B::Move> {
    let start = Instant::now();
    let results: Vec<MinMaxResult<B::Move>> = if moves.is_empty() {
        Vec::new()
    } else if workers <= 1 {
        vec![run_partition(
            &mut board,
            player,
            moves,
            attacks,
            move_counts,
            setting,
            trans_table,
            controller,
        )]
    } else {
        let partitions = split_move_list(&moves, workers);
        crossbeam::scope(|s| {
            let handles: Vec<_> = partitions
                .into_iter()
                .map(|partition| {
                    let mut worker_board = board.clone();
                    s.spawn(move |_| {
                        run_partition(
                            &mut worker_board,
                            player,
                            partition,
                            attacks,
                            move_counts,
                            setting,
                            trans_table,
                            controller,
                        )
                    })
                })
                .collect();
            // Join in spawn order; merge ties stay deterministic for a
            // deterministic per-partition search.
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        })
        .unwrap()
    };

    let merged = merge_results(results, player.is_maximizing());
    let outcome = SearchOutcome {
        best_move: merged.best_move,
        pts: merged.pts,
        perm_count: merged.perm_count,
        cache_hit: trans_table.map_or(0, |table| table.cache_hit()),
        max_depth: merged.max_depth,
    };
    debug!(
        "search done: pts {}, depth {}, {} nodes, {} cache hits, {} ms",
        outcome.pts,
        outcome.max_depth,
        outcome.perm_count,
        outcome.cache_hit,
        start.elapsed().as_millis()
    );
    outcome
}

/// One worker's share of the root move list, dispatched to the configured
/// algorithm.
#[allow(clippy::too_many_arguments)]
fn run_partition<B: GameBoard>(
    board: &mut B,
    player: Player,
    moves: Vec<B::Move>,
    attacks: [AttackPosInfo; 2],
    move_counts: [u32; 2],
    setting: &SearchEngineSetting,
    trans_table: Option<&TransTable>,
    controller: &SearchController,
) -> MinMaxResult<B::Move> {
    if moves.is_empty() {
        return MinMaxResult::empty();
    }
    match setting.algorithm {
        SearchAlgorithm::MinMax => minmax::find_best_move_in_partition(
            board,
            player,
            moves,
            attacks,
            move_counts,
            setting,
            trans_table,
            controller,
        ),
        SearchAlgorithm::AlphaBeta => alpha_beta::find_best_move_in_partition(
            board,
            player,
            moves,
            attacks,
            move_counts,
            setting,
            trans_table,
            controller,
        ),
    }
}

/// Picks the best worker result: maximizing player one, minimizing player
/// two, first encountered wins ties. Node counts are summed, the reported
/// depth is the deepest any worker completed.
fn merge_results<M>(results: Vec<MinMaxResult<M>>, maximizing: bool) -> MinMaxResult<M> {
    let mut merged: MinMaxResult<M> = MinMaxResult::empty();
    for result in results {
        merged.perm_count += result.perm_count;
        merged.max_depth = merged.max_depth.max(result.max_depth);
        if result.best_move.is_none() {
            continue;
        }
        let improves = merged.best_move.is_none()
            || if maximizing {
                result.pts > merged.pts
            } else {
                result.pts < merged.pts
            };
        if improves {
            merged.best_move = result.best_move;
            merged.pts = result.pts;
        }
    }
    merged
}

/// Splits the root move list as evenly as possible across `worker_count`
/// partitions, remainder moves going to the first ones. Workers past the
/// end of a short list receive an empty partition.
pub fn split_move_list<M: Clone>(moves: &[M], worker_count: usize) -> Vec<Vec<M>> {
    let worker_count = worker_count.max(1);
    let base = moves.len() / worker_count;
    let remainder = moves.len() % worker_count;
    let mut partitions = Vec::with_capacity(worker_count);
    let mut start = 0;
    for index in 0..worker_count {
        let len = base + usize::from(index < remainder);
        partitions.push(moves[start..start + len].to_vec());
        start += len;
    }
    partitions
}

/// Reorders the scored prefix of `moves` by descending score, ties broken
/// by original index, and keeps the unscored suffix in original order.
/// Used between iterative-deepening rounds so the previous round's best
/// guess is searched first.
pub fn sort_move_list<M: Clone>(moves: &[M], points: &[i32]) -> Vec<M> {
    let scored = points.len().min(moves.len());
    let mut order: Vec<usize> = (0..scored).collect();
    order.sort_by(|&a, &b| points[b].cmp(&points[a]).then(a.cmp(&b)));

    let mut sorted = Vec::with_capacity(moves.len());
    for index in order {
        sorted.push(moves[index].clone());
    }
    for mv in &moves[scored..] {
        sorted.push(mv.clone());
    }
    sorted
}

/// Shuffles the root move list according to the configured random mode.
pub fn shuffle_move_list<M>(moves: &mut [M], mode: RandomMode) {
    match mode {
        RandomMode::Off => {}
        RandomMode::OnRepetitive => {
            moves.shuffle(&mut StdRng::seed_from_u64(REPETITIVE_SEED));
        }
        RandomMode::On => {
            moves.shuffle(&mut thread_rng());
        }
    }
}

/// Per-round result of a search over one partition: the best move's index
/// in the round's move list and the score of every move evaluated before
/// the round ended.
pub(crate) struct RoundResult {
    pub best_index: Option<usize>,
    pub pts: i32,
    pub move_pts: Vec<i32>,
}

/// Shared driver for both engines: runs `round` at a fixed depth, at
/// increasing ply limits, or under a wall-clock budget, reordering the
/// move list between rounds. The last completed round's answer is kept; a
/// round cut short by timeout or cancellation is discarded unless no round
/// ever completed, in which case its root-level best-so-far still counts.
pub(crate) fn drive_partition<B, R>(
    board: &mut B,
    player: Player,
    moves: Vec<B::Move>,
    attacks: [AttackPosInfo; 2],
    move_counts: [u32; 2],
    setting: &SearchEngineSetting,
    controller: &SearchController,
    mut round: R,
) -> MinMaxResult<B::Move>
where
    B: GameBoard,
    R: FnMut(&mut B, Player, &[B::Move], u32, &mut SearchContext) -> RoundResult,
{
    let mut best: MinMaxResult<B::Move> = MinMaxResult::empty();

    // Fixed depth: the single requested depth runs to completion, no
    // timeout. Cancellation still keeps the root-level best-so-far.
    if setting.search_depth > 0 && !setting.use_iterative_depth_search {
        let depth = setting.search_depth;
        let mut ctx = SearchContext::new(depth, None, attacks, move_counts);
        let result = round(board, player, &moves, depth, &mut ctx);
        if let Some(index) = result.best_index {
            best.best_move = Some(moves[index].clone());
            best.pts = result.pts;
            best.max_depth = depth;
        }
        best.perm_count = ctx.perm_count;
        return best;
    }

    let deadline = if setting.search_depth == 0 {
        Some(Instant::now() + Duration::from_secs(u64::from(setting.time_out_in_sec)))
    } else {
        None
    };
    let depth_limit = if setting.search_depth == 0 {
        u32::MAX
    } else {
        setting.search_depth
    };

    let mut moves = moves;
    let mut depth = 1;
    while depth <= depth_limit {
        let mut ctx = SearchContext::new(depth, deadline, attacks, move_counts);
        let result = round(board, player, &moves, depth, &mut ctx);
        best.perm_count += ctx.perm_count;

        if ctx.timed_out || controller.is_cancelled() {
            // Interrupted round: keep the previous depth's answer, unless
            // this partial round is all there ever was.
            if best.best_move.is_none() {
                if let Some(index) = result.best_index {
                    best.best_move = Some(moves[index].clone());
                    best.pts = result.pts;
                    best.max_depth = depth;
                }
            }
            break;
        }

        if let Some(index) = result.best_index {
            best.best_move = Some(moves[index].clone());
            best.pts = result.pts;
            best.max_depth = depth;
        }
        trace!("depth {} complete: pts {}", depth, best.pts);
        if depth == depth_limit {
            break;
        }
        moves = sort_move_list(&moves, &result.move_pts);
        depth += 1;
    }
    best
}
