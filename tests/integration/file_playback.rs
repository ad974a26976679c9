//! Playback against real files: open, gzip-sibling recovery, and
//! following a file that is still being written.

use std::fs;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::tempdir;

use trajplay_rs::{FrameReader, NoRecovery, OpenError, TrajStream, DEFAULT_VECTOR_WIDTH};

use crate::support::{corpus, frame_record, ObjectSetSink};

#[test]
fn plays_back_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.traj");
    let (data, _) = corpus(3);
    fs::write(&path, data).unwrap();

    let mut reader = FrameReader::open_path(&path, DEFAULT_VECTOR_WIDTH).unwrap();
    assert_eq!(reader.stream().vector_width(), DEFAULT_VECTOR_WIDTH);

    let mut sink = ObjectSetSink::default();
    assert!(reader.load_frame(&mut sink, 2, false).is_success());
    assert!(reader.load_frame(&mut sink, 1, false).is_success());
    assert_eq!(sink.frames, vec![2, 1]);
    assert_eq!(reader.current_frame(), 1);
}

#[test]
fn gzip_sibling_recovery_inflates_and_replays() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.traj");
    let (data, _) = corpus(2);

    let gz = fs::File::create(dir.path().join("run.traj.gz")).unwrap();
    let mut encoder = GzEncoder::new(gz, Compression::default());
    encoder.write_all(&data).unwrap();
    encoder.finish().unwrap();

    // Only the compressed sibling exists; opening inflates it in place.
    let mut reader = FrameReader::open_path(&path, DEFAULT_VECTOR_WIDTH).unwrap();
    assert_eq!(fs::read(&path).unwrap(), data);

    let mut sink = ObjectSetSink::default();
    assert!(reader.load_last(&mut sink, 0).is_success());
    assert_eq!(reader.current_frame(), 2);
    assert_eq!(sink.frames, vec![1, 2]);
}

#[test]
fn missing_file_without_recovery_is_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.traj");

    let err = FrameReader::open_path_with(&path, DEFAULT_VECTOR_WIDTH, &mut NoRecovery)
        .err()
        .unwrap();
    assert!(matches!(err, OpenError::NotFound { .. }));
}

#[test]
fn growing_file_serves_appended_frames() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("live.traj");
    let (data, _) = corpus(2);
    fs::write(&path, data).unwrap();

    let mut reader = FrameReader::open_path(&path, DEFAULT_VECTOR_WIDTH).unwrap();
    let mut sink = ObjectSetSink::default();
    assert!(reader.load_last(&mut sink, 0).is_success());
    assert_eq!(reader.current_frame(), 2);

    let mut writer = fs::OpenOptions::new().append(true).open(&path).unwrap();
    writer.write_all(frame_record(3, 64).as_bytes()).unwrap();
    writer.flush().unwrap();

    let mut sink = ObjectSetSink::default();
    assert!(reader.load_last(&mut sink, 0).is_success());
    assert_eq!(reader.current_frame(), 3);
    assert_eq!(sink.frames, vec![2, 3]);
}
