// Board abstraction consumed by the search engines. The rules engine of the
// actual game lives entirely behind this trait.

use std::fmt::Debug;
use std::sync::Arc;

use crate::core::types::{AttackPosInfo, Player};
use crate::search::{EngineError, SearchContext, SearchEngineSetting, TransTable};

/// Capability set the search core requires of a board implementation.
///
/// The engine trusts the implementation to uphold two invariants it cannot
/// verify itself: `clone` must yield a board that can be searched
/// independently of the original, and `undo_move_no_log` must restore the
/// position (including `zobrist_key`) bit for bit. Violations are logic
/// errors, not recoverable conditions.
pub trait GameBoard: Clone + Send {
    /// Move representation of the game.
    type Move: Clone + Send + PartialEq + Debug + 'static;

    /// Incrementally-maintained 64-bit hash of the current position.
    fn zobrist_key(&self) -> u64;

    /// Cheap auxiliary hash contribution (castling rights, en-passant state,
    /// anything evaluation-relevant the 64-bit key does not capture). It is
    /// combined with the position key before every table lookup.
    fn compute_extra_info(&self) -> u32;

    /// Applies a move without recording history. Returns `false` when the
    /// move leads to an immediate draw (repetition-style); the move is still
    /// considered played and must be taken back with [`undo_move_no_log`].
    ///
    /// [`undo_move_no_log`]: GameBoard::undo_move_no_log
    fn do_move_no_log(&mut self, mv: &Self::Move) -> bool;

    /// Exact inverse of [`do_move_no_log`](GameBoard::do_move_no_log).
    fn undo_move_no_log(&mut self, mv: &Self::Move);

    /// Full legal move enumeration for one side, plus the attack/defense
    /// counts computed as a side effect of the scan.
    fn get_moves(&self, player: Player) -> (Vec<Self::Move>, AttackPosInfo);

    /// Returns a definitive score when the node needs no further expansion:
    /// mate, stalemate, empty move list, `depth == 0`, cancellation, or
    /// timeout (the implementation is expected to consult
    /// `ctx.check_timeout()`). Returns `None` to continue expanding.
    ///
    /// `mover` owns `moves`; `depth` is the remaining search depth.
    fn move_terminal_pts(
        &self,
        setting: &SearchEngineSetting,
        mover: Player,
        moves: &[Self::Move],
        ctx: &mut SearchContext,
        depth: u32,
        cancelled: bool,
    ) -> Option<i32>;

    /// Static positional evaluation, called at terminal and leaf nodes only.
    /// Positive scores favor the maximizing side. The returned value must
    /// stay strictly inside `(-INFINITE_PTS, INFINITE_PTS)`.
    fn evaluate(
        &self,
        setting: &SearchEngineSetting,
        player: Player,
        move_count_delta: i32,
        attack_player: AttackPosInfo,
        attack_opponent: AttackPosInfo,
    ) -> i32;

    /// Classifies a score as a forced win. Winning scores found through a
    /// short circuit are not fully evaluated in the minimax sense and are
    /// never cached.
    fn is_winning_pts(&self, pts: i32) -> bool;

    /// Transposition table to use for one root search. The board owns the
    /// sizing and sharing policy; the default builds a fresh table from the
    /// setting. Implementations that keep a long-lived table can hand out a
    /// clone of their `Arc` instead.
    fn trans_table(
        &self,
        setting: &SearchEngineSetting,
    ) -> Result<Option<Arc<TransTable>>, EngineError> {
        if setting.use_trans_table {
            let table = TransTable::new(
                setting.trans_table_sharing,
                setting.trans_table_entry_count,
            )?;
            Ok(Some(Arc::new(table)))
        } else {
            Ok(None)
        }
    }

    /// Whether the side to move retains enough material to win at all. Used
    /// by board implementations, not by the engines directly.
    fn is_enough_piece_for_winning(&self) -> bool {
        true
    }
}
