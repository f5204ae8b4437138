// Alpha-beta pruning engine. Same shape as the plain minimax, with running
// lower/upper bounds cutting off siblings that cannot affect the chosen
// move. A cutoff leaves siblings unexamined, so the subtree is marked not
// fully evaluated and its value never enters the transposition table.
//
// The root fan-out is embarrassingly parallel: each worker starts from the
// full window and no bounds are shared across workers, trading some pruning
// efficiency for simplicity.

use crate::core::{AttackPosInfo, GameBoard, MinMaxResult, Player, INFINITE_PTS};
use crate::search::context::SearchContext;
use crate::search::engine::{self, RoundResult, SearchController};
use crate::search::minmax::NodeEval;
use crate::search::setting::SearchEngineSetting;
use crate::search::trans_table::TransTable;

/// Runs the alpha-beta search over one worker's slice of the root move
/// list. Iterative deepening (ply-limited or time-boxed) re-seeds the full
/// window at the start of each round on the reordered move list.
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

/// Root-level pass at a fixed depth. The bound on the root's own side
/// tightens as moves are scored, pruning inside later subtrees; the
/// opposing bound stays at infinity, so every root move still receives a
/// score for the reordering heuristic.
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
    let mut alpha = -INFINITE_PTS;
    let mut beta = INFINITE_PTS;
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
            evaluate_child(
                board, player, depth, alpha, beta, maximizing, ctx, setting, trans_table,
                controller,
            )
            .pts
        };
        board.undo_move_no_log(mv);
        move_pts.push(pts);

        let improves = if maximizing { pts > best_pts } else { pts < best_pts };
        if best_index.is_none() || improves {
            best_index = Some(index);
            best_pts = pts;
        }
        if maximizing {
            alpha = alpha.max(best_pts);
        } else {
            beta = beta.min(best_pts);
        }
    }

    RoundResult { best_index, pts: best_pts, move_pts }
}

/// Probe-recurse-record around one applied move, alpha-beta flavored. The
/// transposition table policy is identical to minimax: only fully
/// evaluated, non-winning values are recorded, so a cached value is always
/// exact and safe to return regardless of the current window.
#[allow(clippy::too_many_arguments)]
fn evaluate_child<B: GameBoard>(
    board: &mut B,
    mover: Player,
    depth: u32,
    alpha: i32,
    beta: i32,
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
    let child = alpha_beta_node(
        board,
        opponent,
        &child_moves,
        depth - 1,
        alpha,
        beta,
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

/// Recursive alpha-beta over one node. `depth` is the remaining depth,
/// passed down by value.
#[allow(clippy::too_many_arguments)]
fn alpha_beta_node<B: GameBoard>(
    board: &mut B,
    mover: Player,
    moves: &[B::Move],
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    ctx: &mut SearchContext,
    setting: &SearchEngineSetting,
    trans_table: Option<&TransTable>,
    controller: &SearchController,
) -> NodeEval {
    ctx.perm_count += 1;
    let cancelled = controller.is_cancelled();
    if let Some(pts) = board.move_terminal_pts(setting, mover, moves, ctx, depth, cancelled) {
        let fully_evaluated = !cancelled && !ctx.timed_out;
        return NodeEval { pts, fully_evaluated };
    }

    let mut best = if maximizing { -INFINITE_PTS } else { INFINITE_PTS };
    let mut fully_evaluated = true;
    for (index, mv) in moves.iter().enumerate() {
        let child = if !board.do_move_no_log(mv) {
            NodeEval { pts: 0, fully_evaluated: true }
        } else {
            evaluate_child(
                board, mover, depth, alpha, beta, maximizing, ctx, setting, trans_table,
                controller,
            )
        };
        board.undo_move_no_log(mv);

        fully_evaluated &= child.fully_evaluated;
        if maximizing {
            if child.pts > best {
                best = child.pts;
            }
            if best >= beta {
                // Beta cutoff; any remaining sibling stays unexamined.
                if index + 1 < moves.len() {
                    fully_evaluated = false;
                }
                break;
            }
            alpha = alpha.max(best);
        } else {
            if child.pts < best {
                best = child.pts;
            }
            if best <= alpha {
                if index + 1 < moves.len() {
                    fully_evaluated = false;
                }
                break;
            }
            beta = beta.min(best);
        }
    }

    NodeEval { pts: best, fully_evaluated }
}
