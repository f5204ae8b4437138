// Fundamental value types shared by the search engines.

/// Effectively-infinite score bound used to seed the root of a search.
///
/// Board evaluations must stay strictly inside `(-INFINITE_PTS, INFINITE_PTS)`;
/// `i32::MIN` and `i32::MAX` are reserved as "no value yet" / "cache miss"
/// sentinels and are never legitimate evaluation scores.
pub const INFINITE_PTS: i32 = 10_000_000;

/// One side of a two-player game. Player one maximizes, player two minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Zero-based index, usable for per-side arrays and tables.
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub fn opponent(self) -> Player {
        !self
    }

    /// Player one owns the maximizing side of the minimax tree.
    pub fn is_maximizing(self) -> bool {
        self == Player::One
    }
}

impl std::ops::Not for Player {
    type Output = Player;

    fn not(self) -> Self::Output {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

/// Attack/defense counts for one side, computed by the board at the root
/// position and threaded unchanged through the whole search. Attack
/// information never reflects intermediate nodes; that imprecision is a
/// deliberate speed tradeoff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackPosInfo {
    pub pieces_attacked: i32,
    pub pieces_defending: i32,
}

/// Result of one worker's search over its slice of the root move list.
#[derive(Debug, Clone)]
pub struct MinMaxResult<M> {
    pub best_move: Option<M>,
    pub pts: i32,
    pub perm_count: u64,
    pub max_depth: u32,
}

impl<M> MinMaxResult<M> {
    /// Result with no best move found yet.
    pub fn empty() -> Self {
        MinMaxResult {
            best_move: None,
            pts: 0,
            perm_count: 0,
            max_depth: 0,
        }
    }

    pub fn best_move_found(&self) -> bool {
        self.best_move.is_some()
    }
}

/// Merged result of a whole root search, delivered to the caller.
#[derive(Debug, Clone)]
pub struct SearchOutcome<M> {
    /// `None` when no move could be evaluated at all (no legal moves, or
    /// cancellation before the first root move completed).
    pub best_move: Option<M>,
    pub pts: i32,
    /// Nodes visited across every worker and every iterative round,
    /// discarded rounds included.
    pub perm_count: u64,
    /// Transposition table hits, zero when the table is disabled.
    pub cache_hit: u64,
    /// Deepest completed search depth in plies.
    pub max_depth: u32,
}
