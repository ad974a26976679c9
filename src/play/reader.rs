//! Frame reader façade: load any frame over one open stream, cheapest
//! path first.
//!
//! The reader owns exactly one stream and one position cache; both are
//! invalidated together. A load request takes one of three paths, most
//! specific first: the frame is already current (no I/O), the frame is
//! the next one (the stream already sits at its start), or a full seek.
//!
//! Invariant: after any successful load the stream sits at the start of
//! the following record, the loaded frame's offset is cached at load
//! grade, and the following record's offset is cached as an extrapolated
//! guess.

use std::path::Path;

use super::file_stream::{FileStream, GzipSibling, OpenError, SiblingRecovery};
use super::frame_index::{Confidence, FrameIndex};
use super::seek::{seek_to_frame, SeekOutcome};
use super::stream::{StreamPos, TrajStream};
use super::trace::{NoTrace, PlayEvent, TraceSink};

/// The stream ended before one full frame of object state was read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IncompleteFrame;

impl std::fmt::Display for IncompleteFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stream ended mid-frame")
    }
}

impl std::error::Error for IncompleteFrame {}

/// Deserializes one frame of object state, advancing the stream past it.
///
/// Implemented by the simulation side; the reader only decides where the
/// stream should be when this is called. Implementations must report
/// [`IncompleteFrame`] when the stream ends or fails mid-record instead
/// of reading on.
pub trait FrameSink<S> {
    fn reload_objects(&mut self, stream: &mut S) -> Result<(), IncompleteFrame>;
}

/// Outcome of a frame load request.
///
/// The numeric codes are bit-flag-like so callers can test them
/// individually; they are stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
#[repr(u8)]
pub enum LoadOutcome {
    /// The requested frame is loaded and current.
    Success = 0,
    /// Frame deserialization ran out of stream mid-read.
    EndOfFile = 1,
    /// The boundary scan exhausted the stream without meeting the frame.
    NotFound = 2,
    /// The stream is unusable; reopen it.
    BadStream = 4,
}

impl LoadOutcome {
    /// Stable numeric code.
    #[inline(always)]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Whether the request completed.
    #[inline(always)]
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Chooses the cheapest way to make a requested frame current.
pub struct FrameReader<S, T = NoTrace> {
    stream: S,
    index: FrameIndex,
    current: u64,
    trace: T,
}

impl<S: TrajStream> FrameReader<S> {
    /// Wrap an open stream with a fresh cache and no tracing.
    pub fn new(stream: S) -> Self {
        Self::with_trace(stream, NoTrace)
    }
}

impl FrameReader<FileStream> {
    /// Open a trajectory file, decompressing a `.gz` sibling if the plain
    /// file is missing.
    pub fn open_path(path: impl AsRef<Path>, vector_width: u32) -> Result<Self, OpenError> {
        Self::open_path_with(path, vector_width, &mut GzipSibling)
    }

    /// Open a trajectory file with a caller-supplied recovery strategy.
    pub fn open_path_with<R: SiblingRecovery>(
        path: impl AsRef<Path>,
        vector_width: u32,
        recovery: &mut R,
    ) -> Result<Self, OpenError> {
        let mut stream = FileStream::open_recovering(path.as_ref(), recovery)?;
        stream.declare_vector_width(vector_width);
        Ok(Self::new(stream))
    }
}

impl<S: TrajStream, T: TraceSink> FrameReader<S, T> {
    /// Wrap an open stream, sending playback events to `trace`.
    pub fn with_trace(stream: S, trace: T) -> Self {
        Self {
            stream,
            index: FrameIndex::new(),
            current: 0,
            trace,
        }
    }

    /// Frame made current by the last successful load; 0 when none.
    #[inline(always)]
    #[must_use]
    pub fn current_frame(&self) -> u64 {
        self.current
    }

    /// Read access to the learned position cache.
    #[inline(always)]
    pub fn index(&self) -> &FrameIndex {
        &self.index
    }

    #[inline(always)]
    pub fn stream(&self) -> &S {
        &self.stream
    }

    #[inline(always)]
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    #[inline(always)]
    pub fn trace(&self) -> &T {
        &self.trace
    }

    /// Give the stream back, dropping everything learned about it.
    pub fn into_stream(self) -> S {
        self.stream
    }

    /// Rewind the stream and forget cache and cursor together.
    pub fn reset(&mut self) {
        self.stream.rewind();
        self.index.reset();
        self.current = 0;
        self.trace.record(PlayEvent::IndexReset);
    }

    /// Make `frame` current.
    ///
    /// `reload` forces deserialization even when `frame` is already
    /// current. Frames are numbered from 1; asking for frame 0 reports
    /// [`LoadOutcome::NotFound`].
    pub fn load_frame<F: FrameSink<S>>(
        &mut self,
        sim: &mut F,
        frame: u64,
        reload: bool,
    ) -> LoadOutcome {
        if !self.stream_ok() {
            return LoadOutcome::BadStream;
        }
        if frame == 0 {
            return LoadOutcome::NotFound;
        }
        if frame == self.current && !reload {
            return LoadOutcome::Success;
        }
        if frame == self.current + 1 {
            return self.load_next(sim);
        }
        if seek_to_frame(&mut self.stream, &mut self.index, frame, &mut self.trace)
            != SeekOutcome::Found
        {
            // The scan aborts on a stream that dies mid-way; that is a
            // structural failure, not a missing frame.
            if !self.stream.is_healthy() {
                return LoadOutcome::BadStream;
            }
            return LoadOutcome::NotFound;
        }
        self.reload_labeled(sim, frame)
    }

    /// Deserialize the record the stream sits at and advance the cursor.
    ///
    /// On failure the cursor is untouched and the next attempt may retry
    /// after the stream has grown.
    pub fn load_next<F: FrameSink<S>>(&mut self, sim: &mut F) -> LoadOutcome {
        if !self.stream_ok() {
            return LoadOutcome::BadStream;
        }
        self.reload_labeled(sim, self.current + 1)
    }

    /// Discover and load the true last frame of a possibly still-growing
    /// stream, then optionally step `catch_up` frames back behind it.
    ///
    /// Reports [`LoadOutcome::NotFound`] when the stream holds no frame at
    /// all, or when `catch_up` reaches at or before frame 0.
    pub fn load_last<F: FrameSink<S>>(&mut self, sim: &mut F, catch_up: u64) -> LoadOutcome {
        if !self.stream_ok() {
            return LoadOutcome::BadStream;
        }

        // Restart from the last verified boundary. The confirmed frame is
        // re-read under its own number, which keeps the drain labels
        // aligned with what is actually in the stream.
        let confirmed = self.index.last_confirmed();
        match self.index.anchor_position(confirmed) {
            Some(pos) if confirmed > 0 => {
                self.stream.set_position(pos);
                self.current = confirmed - 1;
            }
            _ => {
                self.stream.rewind();
                self.trace.record(PlayEvent::Rewound);
                self.current = 0;
            }
        }

        let mut any = false;
        while self.load_next(sim).is_success() {
            any = true;
        }
        if !any {
            return LoadOutcome::NotFound;
        }
        if catch_up == 0 {
            return LoadOutcome::Success;
        }
        match self.current.checked_sub(catch_up) {
            Some(target) if target >= 1 => self.load_frame(sim, target, true),
            _ => LoadOutcome::NotFound,
        }
    }

    /// Clear a latched end, then require a healthy stream.
    fn stream_ok(&mut self) -> bool {
        if self.stream.at_eof() {
            self.stream.clear_eof();
        }
        self.stream.is_healthy()
    }

    fn reload_labeled<F: FrameSink<S>>(&mut self, sim: &mut F, frame: u64) -> LoadOutcome {
        let before = self.stream.position();
        match sim.reload_objects(&mut self.stream) {
            Ok(()) => {
                self.current = frame;
                if let Some(pos) = before {
                    self.learn(frame, pos, Confidence::Loaded);
                }
                if let Some(pos) = self.stream.position() {
                    self.learn(frame + 1, pos, Confidence::Extrapolated);
                }
                self.trace.record(PlayEvent::FrameLoaded { frame });
                LoadOutcome::Success
            }
            Err(IncompleteFrame) => {
                self.trace.record(PlayEvent::LoadHitEnd { frame });
                LoadOutcome::EndOfFile
            }
        }
    }

    fn learn(&mut self, frame: u64, pos: StreamPos, conf: Confidence) {
        if self.index.record(frame, pos, conf) {
            self.trace.record(PlayEvent::PositionLearned {
                frame,
                offset: pos.raw(),
                confidence: conf,
            });
        }
    }
}
