// Per-search mutable context threaded through the recursive calls.

use std::time::Instant;

use crate::core::types::{AttackPosInfo, Player};

/// State shared by every node of one search round: the timeout, the node
/// counter, and the root-position attack/mobility snapshot. The remaining
/// depth is deliberately NOT stored here; it travels as an explicit
/// parameter of every recursive call, so there is no restore-on-return
/// discipline to get wrong.
#[derive(Debug, Clone)]
pub struct SearchContext {
    /// Depth limit of the current round, in plies.
    pub max_depth: u32,
    /// Wall-clock deadline for time-boxed search, `None` for fixed depth.
    pub deadline: Option<Instant>,
    /// Sticky flag, set the first time the deadline is observed expired.
    pub timed_out: bool,
    /// Nodes visited during this round.
    pub perm_count: u64,
    attacks: [AttackPosInfo; 2],
    move_counts: [u32; 2],
}

impl SearchContext {
    pub fn new(
        max_depth: u32,
        deadline: Option<Instant>,
        attacks: [AttackPosInfo; 2],
        move_counts: [u32; 2],
    ) -> Self {
        SearchContext {
            max_depth,
            deadline,
            timed_out: false,
            perm_count: 0,
            attacks,
            move_counts,
        }
    }

    /// Checks the deadline once and latches the result. Cooperative: a node
    /// only observes the timeout the next time it calls this.
    pub fn check_timeout(&mut self) -> bool {
        if !self.timed_out {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.timed_out = true;
                }
            }
        }
        self.timed_out
    }

    /// Root-position attack/defense counts for one side.
    pub fn attack_info(&self, player: Player) -> AttackPosInfo {
        self.attacks[player.index()]
    }

    /// Root mobility difference, from `player`'s point of view.
    pub fn move_count_delta(&self, player: Player) -> i32 {
        self.move_counts[player.index()] as i32 - self.move_counts[player.opponent().index()] as i32
    }
}
