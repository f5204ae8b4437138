// Plain minimax: every move fully explored, no pruning. Subtree results are
// cached in the transposition table when they were fully evaluated and are
// not a forced-win short circuit.

use crate::core::{AttackPosInfo, GameBoard, MinMaxResult, Player, INFINITE_PTS};
use crate::search::context::SearchContext;
use crate::search::engine::{self, RoundResult, SearchController};
use crate::search::setting::SearchEngineSetting;
use crate::search::trans_table::TransTable;

/// Outcome of evaluating one subtree. `fully_evaluated` means no timeout,
/// cancellation, or pruning cutoff truncated the exploration; only such
/// results are safe to cache.
pub(crate) struct NodeEval {
    pub pts: i32,
    pub fully_evaluated: bool,
}

/// Runs the minimax search over one worker's slice of the root move list.
#[allow(clippy::too_many_arguments)]
pub(crate) fn find_best_move_in_partition<B: GameBoard>(
    board: &mut B,
    player: Player,
    moves: Vec<B::Move>,
    attacks: [AttackPosInfo; 2],
    move_counts: [u32; 2],
    setting: &SearchEngineSetting,
    trans_table: Option<&TransTable>,
    controller: &SearchController,
) -> MinMaxResult<B::Move> {
    engine::drive_partition(
        board,
        player,
        moves,
        attacks,
        move_counts,
        setting,
        controller,
        |board, player, moves, depth, ctx| {
            search_round(board, player, moves, depth, ctx, setting, trans_table, controller)
        },
    )
}

/// One root-level pass over the partition at a fixed depth. Moves are
/// evaluated strictly in list order; the first strict improvement wins.
#[allow(clippy::too_many_arguments)]
fn search_round<B: GameBoard>(
    board: &mut B,
    player: Player,
    moves: &[B::Move],
    depth: u32,
    ctx: &mut SearchContext,
    setting: &SearchEngineSetting,
    trans_table: Option<&TransTable>,
    controller: &SearchController,
) -> RoundResult {
    let maximizing = player.is_maximizing();
    let mut best_index = None;
    let mut best_pts = if maximizing { -INFINITE_PTS } else { INFINITE_PTS };
    let mut move_pts = Vec::with_capacity(moves.len());

    for (index, mv) in moves.iter().enumerate() {
        if controller.is_cancelled() || ctx.check_timeout() {
            break;
        }
        let pts = if !board.do_move_no_log(mv) {
            0 // forced draw on application
        } else {
            evaluate_child(board, player, depth, maximizing, ctx, setting, trans_table, controller)
                .pts
        };
        board.undo_move_no_log(mv);
        move_pts.push(pts);

        let improves = if maximizing { pts > best_pts } else { pts < best_pts };
        if best_index.is_none() || improves {
            best_index = Some(index);
            best_pts = pts;
        }
    }

    RoundResult { best_index, pts: best_pts, move_pts }
}

/// Evaluates the position reached after the mover's move was applied:
/// probe the table for the opponent's reply search, recurse on a miss, and
/// record the child's value when it is cachable.
#[allow(clippy::too_many_arguments)]
pub(crate) fn evaluate_child<B: GameBoard>(
    board: &mut B,
    mover: Player,
    depth: u32,
    maximizing: bool,
    ctx: &mut SearchContext,
    setting: &SearchEngineSetting,
    trans_table: Option<&TransTable>,
    controller: &SearchController,
) -> NodeEval {
    let opponent = !mover;
    let weight = depth as i32 - 1;
    if let Some(table) = trans_table {
        if let Some(value) =
            table.probe_entry(opponent, board.zobrist_key(), board.compute_extra_info(), weight)
        {
            return NodeEval { pts: value, fully_evaluated: true };
        }
    }

    let (child_moves, _) = board.get_moves(opponent);
    let child = min_max_node(
        board,
        opponent,
        &child_moves,
        depth - 1,
        !maximizing,
        ctx,
        setting,
        trans_table,
        controller,
    );
    if child.fully_evaluated && !board.is_winning_pts(child.pts) {
        if let Some(table) = trans_table {
            table.record_entry(
                opponent,
                board.zobrist_key(),
                board.compute_extra_info(),
                child.pts,
                weight,
            );
        }
    }
    child
}

/// Recursive minimax over one node. `mover` owns `moves`; `depth` is the
/// remaining depth and is passed down by value, never restored.
#[allow(clippy::too_many_arguments)]
fn min_max_node<B: GameBoard>(
    board: &mut B,
    mover: Player,
    moves: &[B::Move],
    depth: u32,
    maximizing: bool,
    ctx: &mut SearchContext,
    setting: &SearchEngineSetting,
    trans_table: Option<&TransTable>,
    controller: &SearchController,
) -> NodeEval {
    ctx.perm_count += 1;
    let cancelled = controller.is_cancelled();
    if let Some(pts) = board.move_terminal_pts(setting, mover, moves, ctx, depth, cancelled) {
        // A score produced under timeout or cancellation is usable but not
        // trustworthy enough to cache.
        let fully_evaluated = !cancelled && !ctx.timed_out;
        return NodeEval { pts, fully_evaluated };
    }

    let mut best = if maximizing { -INFINITE_PTS } else { INFINITE_PTS };
    let mut fully_evaluated = true;
    for mv in moves {
        let child = if !board.do_move_no_log(mv) {
            NodeEval { pts: 0, fully_evaluated: true }
        } else {
            evaluate_child(board, mover, depth, maximizing, ctx, setting, trans_table, controller)
        };
        board.undo_move_no_log(mv);

        fully_evaluated &= child.fully_evaluated;
        if maximizing {
            if child.pts > best {
                best = child.pts;
            }
        } else if child.pts < best {
            best = child.pts;
        }
    }

    NodeEval { pts: best, fully_evaluated }
}
