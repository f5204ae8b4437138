// Shared synthetic game fixture driving the engines in the integration
// tests. A "digit picking" game: each turn the mover appends one digit
// below the branching factor. Leaf scores come from a mixing hash of the
// whole picked line, so searches are deterministic, depend on every ply,
// and need no real rules engine.

use gametree::{AttackPosInfo, GameBoard, Player, SearchContext, SearchEngineSetting};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickMove(pub u8);

#[derive(Debug, Clone)]
pub struct PickBoard {
    branching: u8,
    picks: Vec<u8>,
    hash: u64,
    // Previous hashes, so undo restores the key bit for bit.
    hash_stack: Vec<u64>,
    /// Digit whose application reports an immediate draw, if any.
    pub draw_move: Option<u8>,
    /// When set, every leaf scores in [-100, -1] instead of [-100, 100].
    pub negative_eval: bool,
}

impl PickBoard {
    pub fn new(branching: u8) -> Self {
        PickBoard {
            branching,
            picks: Vec::new(),
            hash: 0x9E37_79B9_7F4A_7C15,
            hash_stack: Vec::new(),
            draw_move: None,
            negative_eval: false,
        }
    }

    fn mix(hash: u64, pick: u8) -> u64 {
        let mut z = hash ^ u64::from(pick).wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Deterministic leaf score of the current line.
    pub fn static_pts(&self) -> i32 {
        if self.negative_eval {
            -1 - (self.hash % 100) as i32
        } else {
            (self.hash % 201) as i32 - 100
        }
    }
}

impl GameBoard for PickBoard {
    type Move = PickMove;

    fn zobrist_key(&self) -> u64 {
        self.hash
    }

    fn compute_extra_info(&self) -> u32 {
        self.picks.len() as u32
    }

    fn do_move_no_log(&mut self, mv: &PickMove) -> bool {
        self.hash_stack.push(self.hash);
        self.picks.push(mv.0);
        self.hash = Self::mix(self.hash, mv.0);
        self.draw_move != Some(mv.0)
    }

    fn undo_move_no_log(&mut self, _mv: &PickMove) {
        self.picks.pop();
        self.hash = self.hash_stack.pop().expect("undo without matching do");
    }

    fn get_moves(&self, _player: Player) -> (Vec<PickMove>, AttackPosInfo) {
        (
            (0..self.branching).map(PickMove).collect(),
            AttackPosInfo::default(),
        )
    }

    fn move_terminal_pts(
        &self,
        setting: &SearchEngineSetting,
        mover: Player,
        moves: &[PickMove],
        ctx: &mut SearchContext,
        depth: u32,
        cancelled: bool,
    ) -> Option<i32> {
        if cancelled || ctx.check_timeout() || depth == 0 || moves.is_empty() {
            return Some(self.evaluate(
                setting,
                mover,
                ctx.move_count_delta(mover),
                ctx.attack_info(mover),
                ctx.attack_info(!mover),
            ));
        }
        None
    }

    fn evaluate(
        &self,
        _setting: &SearchEngineSetting,
        _player: Player,
        _move_count_delta: i32,
        _attack_player: AttackPosInfo,
        _attack_opponent: AttackPosInfo,
    ) -> i32 {
        self.static_pts()
    }

    fn is_winning_pts(&self, pts: i32) -> bool {
        pts.abs() >= 100_000
    }
}

/// Reference minimax over the fixture, used to pin down the expected
/// game-theoretic value of small trees.
pub fn brute_force_pts(board: &mut PickBoard, mover: Player, depth: u32) -> i32 {
    if depth == 0 {
        return board.static_pts();
    }
    let (moves, _) = board.get_moves(mover);
    if moves.is_empty() {
        return board.static_pts();
    }
    let maximizing = mover.is_maximizing();
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for mv in moves {
        let pts = if !board.do_move_no_log(&mv) {
            0
        } else {
            brute_force_pts(board, !mover, depth - 1)
        };
        board.undo_move_no_log(&mv);
        best = if maximizing { best.max(pts) } else { best.min(pts) };
    }
    best
}
