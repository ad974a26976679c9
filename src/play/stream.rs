//! Stream contract consumed by the seek engine and reader façade.
//!
//! A trajectory stream is byte-oriented and line-scannable, with an
//! end-of-stream latch that can be cleared (trajectories are append-only,
//! so "nothing left" is a transient condition) and a sticky health flag
//! for real failures. Positions are opaque tokens: store and restore
//! them, never synthesize one.
//!
//! Invariants:
//! - `read_line` latches the end both when nothing is left and when the
//!   final line has no terminator, so a half-written tail is never trusted.
//! - `set_position` clears the end latch; restoring an earlier position
//!   must make the stream readable again.
//! - Position tokens compare for equality only.

use serde::{Deserialize, Serialize};

/// Payload vectors carry three components unless the stream says otherwise.
pub const DEFAULT_VECTOR_WIDTH: u32 = 3;

/// Opaque stream position token.
///
/// Tokens are minted by [`TrajStream::position`] and restored with
/// [`TrajStream::set_position`]. They support equality and nothing else;
/// not every stream back-end has a linear byte-offset space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamPos(u64);

impl StreamPos {
    /// Start of stream, valid for every implementation.
    pub const START: StreamPos = StreamPos(0);

    /// Wrap a raw offset value.
    #[inline(always)]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value, for diagnostics only.
    #[inline(always)]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Byte stream with line scanning, opaque seek, and recoverable end latch.
pub trait TrajStream {
    /// Go back to the start of the stream and clear the end latch.
    fn rewind(&mut self);

    /// Whether the end latch is set.
    fn at_eof(&self) -> bool;

    /// Clear the end latch so reads can observe data appended since.
    fn clear_eof(&mut self);

    /// Whether the stream is usable at all. Unlike the end latch, an
    /// unhealthy stream stays unhealthy.
    fn is_healthy(&self) -> bool;

    /// Current position token, or `None` when the stream cannot tell.
    fn position(&mut self) -> Option<StreamPos>;

    /// Restore a position token previously obtained from this stream.
    /// Clears the end latch.
    fn set_position(&mut self, pos: StreamPos);

    /// Read one line into `buf` (cleared first), excluding the terminator.
    /// Returns the number of bytes placed in `buf`. A read that runs out of
    /// stream, or whose line has no terminator, sets the end latch; the
    /// partial data is surfaced but callers must not trust it as complete.
    fn read_line(&mut self, buf: &mut String) -> usize;

    /// Declare how many components the trajectory's payload vectors carry.
    fn declare_vector_width(&mut self, dim: u32);

    /// Vector width declared at open.
    fn vector_width(&self) -> u32;
}

/// Deterministic in-memory trajectory stream.
///
/// Line reads are counted so tests can tell which operations touch the
/// stream, and [`MemStream::append`] grows the data the way a live writer
/// would between reads.
#[derive(Clone, Debug)]
pub struct MemStream {
    data: Vec<u8>,
    cursor: usize,
    eof: bool,
    poisoned: bool,
    dim: u32,
    read_calls: u64,
}

impl MemStream {
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            cursor: 0,
            eof: false,
            poisoned: false,
            dim: DEFAULT_VECTOR_WIDTH,
            read_calls: 0,
        }
    }

    /// Grow the stream the way an append-only writer would.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Mark the stream unusable, like a torn file descriptor.
    pub fn poison(&mut self) {
        self.poisoned = true;
    }

    /// Number of line reads served so far.
    #[inline(always)]
    #[must_use]
    pub fn read_calls(&self) -> u64 {
        self.read_calls
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl TrajStream for MemStream {
    fn rewind(&mut self) {
        self.cursor = 0;
        self.eof = false;
    }

    #[inline(always)]
    fn at_eof(&self) -> bool {
        self.eof
    }

    fn clear_eof(&mut self) {
        self.eof = false;
    }

    #[inline(always)]
    fn is_healthy(&self) -> bool {
        !self.poisoned
    }

    fn position(&mut self) -> Option<StreamPos> {
        if self.poisoned {
            return None;
        }
        Some(StreamPos::from_raw(self.cursor as u64))
    }

    fn set_position(&mut self, pos: StreamPos) {
        self.cursor = usize::try_from(pos.raw()).unwrap_or(usize::MAX);
        self.eof = false;
    }

    fn read_line(&mut self, buf: &mut String) -> usize {
        self.read_calls += 1;
        buf.clear();
        if self.poisoned {
            return 0;
        }
        if self.cursor >= self.data.len() {
            self.eof = true;
            return 0;
        }
        let rest = &self.data[self.cursor..];
        match memchr::memchr(b'\n', rest) {
            Some(nl) => {
                buf.push_str(&String::from_utf8_lossy(&rest[..nl]));
                self.cursor += nl + 1;
            }
            None => {
                // No terminator: a writer may still be mid-record.
                buf.push_str(&String::from_utf8_lossy(rest));
                self.cursor = self.data.len();
                self.eof = true;
            }
        }
        buf.len()
    }

    fn declare_vector_width(&mut self, dim: u32) {
        self.dim = dim;
    }

    #[inline(always)]
    fn vector_width(&self) -> u32 {
        self.dim
    }
}
