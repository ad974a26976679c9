//! Property-based soundness tests for the playback cache and scan.
//!
//! Run with: `cargo test --test property`

mod frame_index;
