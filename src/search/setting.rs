// Search configuration, chosen by the caller per root search.

use crate::search::trans_table::TransTableSharing;

/// Search algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAlgorithm {
    /// Plain minimax, every move fully explored.
    MinMax,
    /// Minimax with alpha-beta pruning.
    AlphaBeta,
}

/// Where the search runs relative to the calling thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadingMode {
    /// Synchronous search on the caller's thread.
    Off,
    /// Whole search on one background worker; the caller is never blocked.
    SingleBackgroundThread,
    /// Root move list partitioned across `min(processors, moves)` workers.
    OnePerProcessor,
}

/// Root move list shuffling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomMode {
    /// No shuffle; the board's move ordering is kept.
    Off,
    /// Shuffle with a fixed-seed generator, identical across runs.
    OnRepetitive,
    /// Shuffle with a time-seeded generator.
    On,
}

#[derive(Debug, Clone)]
pub struct SearchEngineSetting {
    pub algorithm: SearchAlgorithm,
    pub use_trans_table: bool,
    /// Ply-limited iterative deepening with move reordering between rounds.
    /// Only meaningful with `search_depth > 0`.
    pub use_iterative_depth_search: bool,
    pub threading_mode: ThreadingMode,
    /// Fixed search depth in plies; 0 selects time-boxed iterative deepening
    /// bounded by `time_out_in_sec`.
    pub search_depth: u32,
    /// Wall-clock budget, consulted only when `search_depth == 0`.
    pub time_out_in_sec: u32,
    pub random_mode: RandomMode,
    pub trans_table_entry_count: usize,
    pub trans_table_sharing: TransTableSharing,
}

impl Default for SearchEngineSetting {
    fn default() -> Self {
        SearchEngineSetting {
            algorithm: SearchAlgorithm::AlphaBeta,
            use_trans_table: true,
            use_iterative_depth_search: false,
            threading_mode: ThreadingMode::OnePerProcessor,
            search_depth: 6,
            time_out_in_sec: 15,
            random_mode: RandomMode::On,
            trans_table_entry_count: 1_000_000,
            trans_table_sharing: TransTableSharing::Shared,
        }
    }
}
