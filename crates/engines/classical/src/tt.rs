//! Transposition tables.
//!
//! Entries carry a score *window* `[lower, upper]` rather than a single
//! value: a fail-high stores `[score, INF]`, a fail-low `[-INF, score]`, and
//! only a search that finished strictly inside its window stores an exact
//! `[score, score]`. Everything is packed into one `u64`:
//!
//! ```text
//!  bits  0..16  lower  (i16)
//!  bits 16..32  upper  (i16)
//!  bits 32..48  move   (packed, 0 = none)
//!  bits 48..56  depth  (u8)
//!  bit  56      occupied
//! ```
//!
//! Every table supports a pass journal (`checkpoint` / `commit` /
//! `rollback`) so iterative deepening can throw away an aborted iteration
//! and leave the table exactly as the last completed one left it.

use std::collections::HashMap;
use std::fmt;

use log::warn;
use xiangqi_core::Move;

const OCCUPIED: u64 = 1 << 56;

/// Slots per bucket.
pub const WAYS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    pub depth: u8,
    pub best_move: Option<Move>,
    pub lower: i32,
    pub upper: i32,
}

impl TtEntry {
    pub fn is_exact(&self) -> bool {
        self.lower == self.upper
    }

    pub fn pack(self) -> u64 {
        let lower = self.lower as i16 as u16 as u64;
        let upper = self.upper as i16 as u16 as u64;
        let mv = self.best_move.map_or(Move::NULL_PACKED, Move::pack) as u64;
        lower | upper << 16 | mv << 32 | (self.depth as u64) << 48 | OCCUPIED
    }

    /// `None` for an unoccupied word.
    pub fn unpack(value: u64) -> Option<TtEntry> {
        if value & OCCUPIED == 0 {
            return None;
        }
        Some(TtEntry {
            lower: value as u16 as i16 as i32,
            upper: (value >> 16) as u16 as i16 as i32,
            best_move: Move::unpack((value >> 32) as u16),
            depth: (value >> 48) as u8,
        })
    }
}

/// Hash-addressed score cache used by the search.
pub trait TranspositionTable: Send + fmt::Debug {
    fn lookup(&self, hash: u64) -> Option<TtEntry>;

    fn store(&mut self, hash: u64, entry: TtEntry);

    /// Drops the entry for `hash`, if present.
    fn remove(&mut self, hash: u64);

    fn clear(&mut self);

    /// Starts journaling every write so the pass can be undone.
    fn checkpoint(&mut self);

    /// Keeps everything written since `checkpoint` and stops journaling.
    fn commit(&mut self);

    /// Undoes every write since `checkpoint`, newest first, and stops journaling.
    fn rollback(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all occupied entries, sorted by hash.
    fn entries(&self) -> Vec<(u64, TtEntry)>;

    /// Puts back what `lookup(hash)` returned before a search of `hash` started.
    fn restore(&mut self, hash: u64, prior: Option<TtEntry>) {
        match prior {
            Some(entry) => self.store(hash, entry),
            None => self.remove(hash),
        }
    }
}

// =============================================================================
// Bucketed table
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Slot {
    /// `hash ^ value`, so a torn write never matches.
    check: u64,
    value: u64,
}

impl Slot {
    #[inline]
    fn occupied(&self) -> bool {
        self.value & OCCUPIED != 0
    }

    #[inline]
    fn matches(&self, hash: u64) -> bool {
        self.occupied() && self.check ^ self.value == hash
    }

    fn depth(&self) -> u8 {
        (self.value >> 48) as u8
    }
}

/// Fixed capacity: `2^bits` buckets of [`WAYS`] slots. A store reuses the
/// matching slot, else the first empty one, else evicts the shallowest.
#[derive(Clone, PartialEq, Eq)]
pub struct BucketTable {
    buckets: Vec<[Slot; WAYS]>,
    mask: u64,
    len: usize,
    journal: Option<Vec<(usize, usize, Slot)>>,
}

impl BucketTable {
    pub fn new(bits: u8) -> Self {
        let count = 1usize << bits;
        Self {
            buckets: vec![[Slot::default(); WAYS]; count],
            mask: count as u64 - 1,
            len: 0,
            journal: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len() * WAYS
    }

    #[inline]
    fn bucket_of(&self, hash: u64) -> usize {
        (hash & self.mask) as usize
    }

    fn write(&mut self, bucket: usize, way: usize, slot: Slot) {
        let old = self.buckets[bucket][way];
        if let Some(journal) = self.journal.as_mut() {
            journal.push((bucket, way, old));
        }
        self.len = self.len + slot.occupied() as usize - old.occupied() as usize;
        self.buckets[bucket][way] = slot;
    }
}

impl fmt::Debug for BucketTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketTable")
            .field("buckets", &self.buckets.len())
            .field("len", &self.len)
            .field("journaling", &self.journal.is_some())
            .finish()
    }
}

impl TranspositionTable for BucketTable {
    fn lookup(&self, hash: u64) -> Option<TtEntry> {
        self.buckets[self.bucket_of(hash)]
            .iter()
            .find(|s| s.matches(hash))
            .and_then(|s| TtEntry::unpack(s.value))
    }

    fn store(&mut self, hash: u64, entry: TtEntry) {
        let bucket = self.bucket_of(hash);
        let slots = &self.buckets[bucket];
        let way = slots
            .iter()
            .position(|s| s.matches(hash))
            .or_else(|| slots.iter().position(|s| !s.occupied()))
            .unwrap_or_else(|| {
                (0..WAYS)
                    .min_by_key(|&w| slots[w].depth())
                    .unwrap_or_default()
            });
        let value = entry.pack();
        self.write(
            bucket,
            way,
            Slot {
                check: hash ^ value,
                value,
            },
        );
    }

    fn remove(&mut self, hash: u64) {
        let bucket = self.bucket_of(hash);
        if let Some(way) = self.buckets[bucket].iter().position(|s| s.matches(hash)) {
            self.write(bucket, way, Slot::default());
        }
    }

    fn clear(&mut self) {
        self.buckets.fill([Slot::default(); WAYS]);
        self.len = 0;
        self.journal = None;
    }

    fn checkpoint(&mut self) {
        self.journal = Some(Vec::new());
    }

    fn commit(&mut self) {
        self.journal = None;
    }

    fn rollback(&mut self) {
        let Some(journal) = self.journal.take() else {
            return;
        };
        for (bucket, way, old) in journal.into_iter().rev() {
            self.write(bucket, way, old);
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn entries(&self) -> Vec<(u64, TtEntry)> {
        let mut out: Vec<(u64, TtEntry)> = self
            .buckets
            .iter()
            .flat_map(|b| b.iter())
            .filter_map(|s| Some((s.check ^ s.value, TtEntry::unpack(s.value)?)))
            .collect();
        out.sort_by_key(|(hash, _)| *hash);
        out
    }
}

// =============================================================================
// Map table
// =============================================================================

/// Unbounded map that wipes itself when it would grow past `limit` entries.
#[derive(Debug, Clone)]
pub struct MapTable {
    map: HashMap<u64, u64>,
    limit: usize,
    journal: Option<Vec<(u64, Option<u64>)>>,
}

impl MapTable {
    pub fn new(limit: usize) -> Self {
        Self {
            map: HashMap::new(),
            limit: limit.max(1),
            journal: None,
        }
    }

    fn record(&mut self, hash: u64, old: Option<u64>) {
        if let Some(journal) = self.journal.as_mut() {
            journal.push((hash, old));
        }
    }
}

impl TranspositionTable for MapTable {
    fn lookup(&self, hash: u64) -> Option<TtEntry> {
        self.map.get(&hash).copied().and_then(TtEntry::unpack)
    }

    fn store(&mut self, hash: u64, entry: TtEntry) {
        if !self.map.contains_key(&hash) && self.map.len() >= self.limit {
            warn!(
                "transposition map reached {} entries, clearing",
                self.map.len()
            );
            self.map.clear();
            // Journaled writes refer to entries that no longer exist.
            if let Some(journal) = self.journal.as_mut() {
                journal.clear();
            }
        }
        let old = self.map.insert(hash, entry.pack());
        self.record(hash, old);
    }

    fn remove(&mut self, hash: u64) {
        if let Some(old) = self.map.remove(&hash) {
            self.record(hash, Some(old));
        }
    }

    fn clear(&mut self) {
        self.map.clear();
        self.journal = None;
    }

    fn checkpoint(&mut self) {
        self.journal = Some(Vec::new());
    }

    fn commit(&mut self) {
        self.journal = None;
    }

    fn rollback(&mut self) {
        let Some(journal) = self.journal.take() else {
            return;
        };
        for (hash, old) in journal.into_iter().rev() {
            match old {
                Some(value) => self.map.insert(hash, value),
                None => self.map.remove(&hash),
            };
        }
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn entries(&self) -> Vec<(u64, TtEntry)> {
        let mut out: Vec<(u64, TtEntry)> = self
            .map
            .iter()
            .filter_map(|(&hash, &value)| Some((hash, TtEntry::unpack(value)?)))
            .collect();
        out.sort_by_key(|(hash, _)| *hash);
        out
    }
}

// =============================================================================
// Disabled table
// =============================================================================

/// Remembers nothing; every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTable;

impl TranspositionTable for NoTable {
    fn lookup(&self, _hash: u64) -> Option<TtEntry> {
        None
    }

    fn store(&mut self, _hash: u64, _entry: TtEntry) {}

    fn remove(&mut self, _hash: u64) {}

    fn clear(&mut self) {}

    fn checkpoint(&mut self) {}

    fn commit(&mut self) {}

    fn rollback(&mut self) {}

    fn len(&self) -> usize {
        0
    }

    fn entries(&self) -> Vec<(u64, TtEntry)> {
        Vec::new()
    }
}

#[cfg(test)]
#[path = "tt_tests.rs"]
mod tt_tests;
