//! Injectable trace collection for playback diagnostics.
//!
//! The reader and seek engine report their decision points to a
//! [`TraceSink`]; the default sink discards everything, and [`TraceLog`]
//! retains a bounded window of recent events for failure forensics.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::frame_index::Confidence;

/// Observable playback steps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayEvent {
    /// The position cache was reset to its seeded state.
    IndexReset,
    /// The stream was rewound to its start.
    Rewound,
    /// A seek picked a cached anchor instead of rewinding.
    AnchorChosen { target: u64, anchor: u64, offset: u64 },
    /// The forward scan met a frame boundary line.
    BoundaryScanned { frame: u64, offset: u64 },
    /// A cache write landed.
    PositionLearned {
        frame: u64,
        offset: u64,
        confidence: Confidence,
    },
    /// The scan exhausted the stream before meeting its target.
    SeekHitEnd { target: u64 },
    /// The stream stopped serving reads mid-scan.
    StreamFailed { target: u64 },
    /// A frame was deserialized and is now current.
    FrameLoaded { frame: u64 },
    /// Frame deserialization ran out of stream.
    LoadHitEnd { frame: u64 },
}

/// Receives playback events. Implementations must be cheap; sinks are
/// called from the seek hot path.
pub trait TraceSink {
    fn record(&mut self, event: PlayEvent);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    #[inline(always)]
    fn record(&mut self, _event: PlayEvent) {}
}

/// Fixed-capacity ring of recent playback events, oldest evicted first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TraceLog {
    cap: usize,
    buf: VecDeque<PlayEvent>,
}

impl TraceLog {
    /// Create a log with at least one slot.
    #[must_use]
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            cap,
            buf: VecDeque::with_capacity(cap),
        }
    }

    /// Maximum number of events retained.
    #[inline(always)]
    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Current number of retained events.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the log is empty.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Snapshot the retained events in chronological order.
    #[must_use]
    pub fn dump(&self) -> Vec<PlayEvent> {
        self.buf.iter().cloned().collect()
    }
}

impl TraceSink for TraceLog {
    fn record(&mut self, event: PlayEvent) {
        if self.buf.len() == self.cap {
            self.buf.pop_front();
        }
        self.buf.push_back(event);
    }
}
