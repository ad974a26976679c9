//! Trajectory playback for append-only simulation recordings, plus the
//! stochastic event scheduler that drives scripted activity.
//!
//! ## Scope
//! This crate reads frame-structured trajectory streams (records opened by a
//! `#Cytosim ` tag line) with random access, and schedules scripted activities
//! against a live simulation at exponential or fixed intervals.
//!
//! ## Key invariants
//! - Frame offsets are learned once and ranked by confidence; a cached
//!   position is only ever overwritten by a strictly more trustworthy one.
//! - After a successful load the stream sits at the start of the next
//!   record, so sequential playback costs no seeks.
//! - End-of-stream is a recoverable condition, not an error: growing files
//!   are re-polled by clearing the latch, and a frame boundary is only
//!   trusted once the line carrying it is complete.
//! - Event triggers compose from the previous due time, never from the
//!   observed clock, so a late `step` fires every elapsed trigger.
//!
//! ## Playback flow (one random access)
//! 1) Consult the index; a confident offset answers immediately.
//! 2) Otherwise anchor at the best known position at or below the target.
//! 3) Scan forward line by line, recording every boundary passed.
//! 4) Position on the target boundary and hand the stream to the sink.
//! 5) Record the loaded frame at full confidence and extrapolate its successor.
//!
//! ## Notable entry points
//! - `FrameReader`: random and sequential access over a trajectory stream.
//! - `FrameIndex` / `Confidence`: the ranked offset cache.
//! - `FileStream` / `MemStream`: file-backed and in-memory stream transports.
//! - `Event` / `Simulation`: clock-driven scripted activity.
//! - `TraceSink` / `TraceLog`: optional observation of playback decisions.

pub mod event;
pub mod play;

pub use event::{EvalError, Event, EventConfigError, EventRng, ParamMap, ParamSource, Simulation};
pub use play::{
    Confidence, FileStream, FrameIndex, FrameReader, FrameSink, GzipSibling, IncompleteFrame,
    LoadOutcome, MemStream, NoRecovery, NoTrace, OpenError, PlayEvent, SeekOutcome,
    SiblingRecovery, StreamPos, TraceLog, TraceSink, TrajStream, DEFAULT_VECTOR_WIDTH, FRAME_TAG,
};

#[cfg(feature = "legacy-tags")]
pub use play::LEGACY_FRAME_TAG;
