// Fixed-size transposition table keyed by zobrist key XOR extra info,
// generation-stamped so a whole search's worth of entries can be invalidated
// without touching memory.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::core::types::Player;
use crate::search::error::EngineError;

/// Whether both sides probe one backing array or each side owns its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransTableSharing {
    Shared,
    PerSide,
}

#[derive(Debug, Clone, Copy)]
struct TransEntry {
    key: u64,
    generation: u64,
    extra_info: u32,
    value: i32,
    weight: i32,
}

struct TableInner {
    sides: Vec<Vec<TransEntry>>,
    generation: u64,
}

/// Cache of evaluated positions, shared read/write by every worker of one
/// search. Entries are overwritten unconditionally on record; there is no
/// chaining, the last writer at a slot wins. Staleness is detected by
/// generation mismatch, never by eviction.
pub struct TransTable {
    entry_count: usize,
    sharing: TransTableSharing,
    // Single lock per table; per-call granularity is an accepted contention
    // tradeoff for correctness simplicity.
    inner: Mutex<TableInner>,
    cache_hit: AtomicU64,
}

impl TransTable {
    /// Builds a table with exactly `entry_count` slots per side. Rejects a
    /// capacity of zero or one that would overflow a 32-bit signed index.
    pub fn new(sharing: TransTableSharing, entry_count: usize) -> Result<Self, EngineError> {
        if entry_count == 0 || entry_count > i32::MAX as usize {
            return Err(EngineError::TransTableCapacity(entry_count));
        }
        let side_count = match sharing {
            TransTableSharing::Shared => 1,
            TransTableSharing::PerSide => 2,
        };
        let empty = TransEntry {
            key: 0,
            generation: 0,
            extra_info: 0,
            value: 0,
            weight: 0,
        };
        // Generation starts at 1 so zeroed entries can never match a probe.
        let inner = TableInner {
            sides: vec![vec![empty; entry_count]; side_count],
            generation: 1,
        };
        Ok(TransTable {
            entry_count,
            sharing,
            inner: Mutex::new(inner),
            cache_hit: AtomicU64::new(0),
        })
    }

    fn side_index(&self, player: Player) -> usize {
        match self.sharing {
            TransTableSharing::Shared => 0,
            TransTableSharing::PerSide => player.index(),
        }
    }

    fn slot(&self, zobrist_key: u64, extra_info: u32) -> (u64, usize) {
        let key = zobrist_key ^ u64::from(extra_info);
        (key, (key % self.entry_count as u64) as usize)
    }

    /// Stores `value` computed with `weight` plies of remaining depth,
    /// stamped with the current generation. Overwrites whatever occupied
    /// the slot.
    pub fn record_entry(
        &self,
        player: Player,
        zobrist_key: u64,
        extra_info: u32,
        value: i32,
        weight: i32,
    ) {
        let (key, slot) = self.slot(zobrist_key, extra_info);
        let side = self.side_index(player);
        let mut inner = self.inner.lock().unwrap();
        let generation = inner.generation;
        inner.sides[side][slot] = TransEntry {
            key,
            generation,
            extra_info,
            value,
            weight,
        };
    }

    /// Returns the cached value when the slot holds the same key and extra
    /// info, was written during the current generation, and was computed at
    /// `weight` plies or deeper. A shallower cached result is never reused.
    pub fn probe_entry(
        &self,
        player: Player,
        zobrist_key: u64,
        extra_info: u32,
        weight: i32,
    ) -> Option<i32> {
        let (key, slot) = self.slot(zobrist_key, extra_info);
        let side = self.side_index(player);
        let inner = self.inner.lock().unwrap();
        let entry = &inner.sides[side][slot];
        if entry.key == key
            && entry.generation == inner.generation
            && entry.extra_info == extra_info
            && entry.weight >= weight
        {
            self.cache_hit.fetch_add(1, Ordering::Relaxed);
            Some(entry.value)
        } else {
            None
        }
    }

    /// Invalidates every entry by bumping the generation and clears the hit
    /// counter. Called at the start of each fresh root search.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.generation += 1;
        self.cache_hit.store(0, Ordering::Relaxed);
    }

    /// Hits recorded since the last reset.
    pub fn cache_hit(&self) -> u64 {
        self.cache_hit.load(Ordering::Relaxed)
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn sharing(&self) -> TransTableSharing {
        self.sharing
    }
}
