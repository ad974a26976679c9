//! Trajectory playback: position cache, seek engine, and reader façade.

mod file_stream;
mod frame_index;
mod reader;
mod seek;
mod stream;
mod trace;

pub use file_stream::{FileStream, GzipSibling, NoRecovery, OpenError, SiblingRecovery};
pub use frame_index::{Confidence, FrameIndex};
pub use reader::{FrameReader, FrameSink, IncompleteFrame, LoadOutcome};
#[cfg(feature = "legacy-tags")]
pub use seek::LEGACY_FRAME_TAG;
pub use seek::{anchor_to, is_frame_boundary, seek_to_frame, SeekOutcome, FRAME_TAG};
pub use stream::{MemStream, StreamPos, TrajStream, DEFAULT_VECTOR_WIDTH};
pub use trace::{NoTrace, PlayEvent, TraceLog, TraceSink};
