//! Confidence-ranked cache of frame byte offsets.
//!
//! Frame boundaries are not indexed up front: offsets are learned while
//! scanning and loading, and each carries a rank saying how far it can be
//! trusted. A flat growable vector indexed by frame number, not a map;
//! lookups and growth stay O(1) amortized and iteration order is the
//! frame order.
//!
//! Invariants:
//! - A slot's confidence never decreases; writes at or below the stored
//!   rank are dropped.
//! - Logical length grows exactly to the highest frame recorded, with the
//!   gap filled at `Unknown`; capacity is reserved in 1024-slot chunks.
//! - Slots 0 and 1 are seeded at `Extrapolated`/start-of-stream: frame
//!   numbering begins at 1, and frame 1 is assumed to start at the top of
//!   the stream until proven otherwise.

use serde::{Deserialize, Serialize};

use super::stream::StreamPos;

const GROW_CHUNK: usize = 1024;

/// How far a cached frame offset can be trusted.
///
/// Ranks match the historical status byte (0, 1, 2, 4); 3 is unused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    /// Nothing known.
    Unknown,
    /// Guessed from where the previous frame ended.
    Extrapolated,
    /// A boundary tag was read at this offset.
    Scanned,
    /// A full frame was deserialized starting at this offset.
    Loaded,
}

impl Confidence {
    /// Stable numeric rank.
    #[inline(always)]
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Extrapolated => 1,
            Self::Scanned => 2,
            Self::Loaded => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Slot {
    conf: Confidence,
    pos: StreamPos,
}

impl Slot {
    const UNKNOWN: Slot = Slot {
        conf: Confidence::Unknown,
        pos: StreamPos::START,
    };
    const SEED: Slot = Slot {
        conf: Confidence::Extrapolated,
        pos: StreamPos::START,
    };
}

/// Growable frame-number-to-offset table with monotonic confidence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameIndex {
    slots: Vec<Slot>,
}

impl Default for FrameIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameIndex {
    #[must_use]
    pub fn new() -> Self {
        let mut index = Self { slots: Vec::new() };
        index.reset();
        index
    }

    /// Drop everything learned and re-seed frame 1 at the stream start.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.slots.reserve(GROW_CHUNK);
        self.slots.resize(2, Slot::SEED);
    }

    /// Number of slots, one past the highest frame ever recorded.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Confidence stored for `frame`; `Unknown` when out of range.
    #[inline(always)]
    #[must_use]
    pub fn confidence_of(&self, frame: u64) -> Confidence {
        usize::try_from(frame)
            .ok()
            .and_then(|inx| self.slots.get(inx))
            .map_or(Confidence::Unknown, |slot| slot.conf)
    }

    /// Offset stored for `frame`, if anything at all is known about it.
    #[inline(always)]
    #[must_use]
    pub fn anchor_position(&self, frame: u64) -> Option<StreamPos> {
        usize::try_from(frame)
            .ok()
            .and_then(|inx| self.slots.get(inx))
            .filter(|slot| slot.conf > Confidence::Unknown)
            .map(|slot| slot.pos)
    }

    /// Store `pos` for `frame` when `conf` beats the stored rank.
    ///
    /// Frame 0 is a synthetic anchor and is never written. Returns whether
    /// the write landed.
    pub fn record(&mut self, frame: u64, pos: StreamPos, conf: Confidence) -> bool {
        if frame == 0 {
            return false;
        }
        let Ok(inx) = usize::try_from(frame) else {
            return false;
        };
        if inx >= self.slots.len() {
            let rounded = (inx | (GROW_CHUNK - 1)) + 1;
            self.slots.reserve_exact(rounded - self.slots.len());
            self.slots.resize(inx + 1, Slot::UNKNOWN);
        }
        let slot = &mut self.slots[inx];
        if slot.conf < conf {
            *slot = Slot { conf, pos };
            return true;
        }
        false
    }

    /// Largest frame at or before `target` with a usable offset.
    ///
    /// Walks down over `Unknown` gap slots; 0 means rewind to the start.
    #[must_use]
    pub fn best_anchor(&self, target: u64) -> u64 {
        let last = self.slots.len().saturating_sub(1);
        let mut inx = usize::try_from(target).map_or(last, |t| t.min(last));
        while inx > 0 && self.slots[inx].conf == Confidence::Unknown {
            inx -= 1;
        }
        inx as u64
    }

    /// Largest frame whose offset was verified by a scan or a load.
    ///
    /// Extrapolated guesses do not count; this is the safe starting point
    /// for discovering the tail of a growing stream.
    #[must_use]
    pub fn last_confirmed(&self) -> u64 {
        let mut inx = self.slots.len().saturating_sub(1);
        while inx > 0 && self.slots[inx].conf < Confidence::Scanned {
            inx -= 1;
        }
        inx as u64
    }
}
