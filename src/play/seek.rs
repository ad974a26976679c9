//! Forward-scanning frame seek over a trajectory stream.
//!
//! Seeking jumps to the best cached anchor at or before the target, then
//! reads lines until enough boundary tags have gone by. Every boundary met
//! on the way is recorded, so repeated seeks over the same region converge
//! to cache hits.
//!
//! A boundary line that ends the stream (no terminator, or nothing after
//! it) is never counted: an append-only writer may have been interrupted
//! mid-tag, and a truncated tag must not become a trusted offset.

use super::frame_index::{Confidence, FrameIndex};
use super::stream::TrajStream;
use super::trace::{PlayEvent, TraceSink};

/// Tag opening every frame record, including the trailing space.
pub const FRAME_TAG: &str = "#Cytosim ";

/// Boundary tag written by old trajectories.
#[cfg(feature = "legacy-tags")]
pub const LEGACY_FRAME_TAG: &str = "#frame ";

/// Whether `line` opens a frame record.
#[inline]
#[must_use]
pub fn is_frame_boundary(line: &str) -> bool {
    if line.starts_with(FRAME_TAG) {
        return true;
    }
    #[cfg(feature = "legacy-tags")]
    if line.starts_with(LEGACY_FRAME_TAG) {
        return true;
    }
    false
}

/// Result of a frame seek.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum SeekOutcome {
    /// The stream sits at the first byte of the target frame's boundary line.
    Found,
    /// The scan ran out of stream, or the stream failed, before meeting
    /// the target.
    NotFoundAtEof,
}

/// Position the stream at the best known anchor for `target`.
///
/// Clears a latched end first: the latch only means "nothing left from the
/// last position tried", and a seek elsewhere must be able to recover.
/// Returns the anchor frame number; 0 means the stream was rewound.
pub fn anchor_to<S: TrajStream, T: TraceSink>(
    stream: &mut S,
    index: &FrameIndex,
    target: u64,
    trace: &mut T,
) -> u64 {
    if stream.at_eof() {
        stream.clear_eof();
    }
    if target >= 1 {
        let anchor = index.best_anchor(target);
        if anchor > 0 {
            if let Some(pos) = index.anchor_position(anchor) {
                stream.set_position(pos);
                trace.record(PlayEvent::AnchorChosen {
                    target,
                    anchor,
                    offset: pos.raw(),
                });
                return anchor;
            }
        }
    }
    stream.rewind();
    trace.record(PlayEvent::Rewound);
    0
}

/// Seek until the stream sits at the start of `target`'s boundary line.
///
/// Anchors first; when the anchor already is the target no line is read.
/// Otherwise scans forward, labeling the first boundary met with the
/// anchor's own number and recording every boundary at scan confidence.
/// A `target` of 0 just rewinds. A stream that turns unhealthy aborts
/// the scan, leaving its health flag for the caller to inspect.
pub fn seek_to_frame<S: TrajStream, T: TraceSink>(
    stream: &mut S,
    index: &mut FrameIndex,
    target: u64,
    trace: &mut T,
) -> SeekOutcome {
    let mut counter = anchor_to(stream, index, target, trace);
    if counter == target {
        return SeekOutcome::Found;
    }

    let mut line = String::new();
    while !stream.at_eof() {
        let start = loop {
            let pos = stream.position();
            stream.read_line(&mut line);
            if stream.at_eof() {
                trace.record(PlayEvent::SeekHitEnd { target });
                return SeekOutcome::NotFoundAtEof;
            }
            // A failed read latches nothing: the end latch stays down and
            // the line stays empty, so only the health flag can stop us.
            if !stream.is_healthy() {
                trace.record(PlayEvent::StreamFailed { target });
                return SeekOutcome::NotFoundAtEof;
            }
            if is_frame_boundary(&line) {
                break pos;
            }
        };

        if let Some(pos) = start {
            trace.record(PlayEvent::BoundaryScanned {
                frame: counter,
                offset: pos.raw(),
            });
            if index.record(counter, pos, Confidence::Scanned) {
                trace.record(PlayEvent::PositionLearned {
                    frame: counter,
                    offset: pos.raw(),
                    confidence: Confidence::Scanned,
                });
            }
        }
        if counter == target {
            if let Some(pos) = start {
                stream.set_position(pos);
            }
            return SeekOutcome::Found;
        }
        counter += 1;
    }

    trace.record(PlayEvent::SeekHitEnd { target });
    SeekOutcome::NotFoundAtEof
}
