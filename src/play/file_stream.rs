//! File-backed trajectory stream and open-time recovery.
//!
//! `FileStream` adapts a buffered file to the [`TrajStream`] contract:
//! byte-exact line reads over possibly binary payloads, a clearable end
//! latch, and a sticky health flag for real I/O failures.
//!
//! Opening goes through an injectable [`SiblingRecovery`]: when the plain
//! file is missing, [`GzipSibling`] decompresses a `<name>.gz` next to it
//! in-process and retries, so archived runs replay without anyone shelling
//! out or touching the archive by hand.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use super::stream::{StreamPos, TrajStream, DEFAULT_VECTOR_WIDTH};

/// Errors from opening a trajectory file.
#[derive(Debug)]
#[non_exhaustive]
pub enum OpenError {
    /// The file is absent, even after sibling recovery.
    NotFound { path: PathBuf },
    /// The path opened but cannot back a trajectory stream.
    Unhealthy { path: PathBuf },
    /// I/O error during open.
    Io(io::Error),
}

impl std::fmt::Display for OpenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "trajectory `{}` not found", path.display())
            }
            Self::Unhealthy { path } => {
                write!(f, "trajectory `{}` is not a readable file", path.display())
            }
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for OpenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for OpenError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

fn open_failure(path: &Path, err: io::Error) -> OpenError {
    if err.kind() == io::ErrorKind::NotFound {
        OpenError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        OpenError::Io(err)
    }
}

/// Recovery hook tried when a trajectory file fails to open.
///
/// Returns whether a retry is worthwhile. Implementations may materialize
/// the file from sibling artifacts; they must not touch anything else.
pub trait SiblingRecovery {
    fn recover(&mut self, path: &Path) -> bool;
}

/// Decompresses a `<name>.gz` sibling into the missing plain file.
#[derive(Clone, Copy, Debug, Default)]
pub struct GzipSibling;

impl SiblingRecovery for GzipSibling {
    fn recover(&mut self, path: &Path) -> bool {
        let mut sibling = path.as_os_str().to_os_string();
        sibling.push(".gz");
        let Ok(compressed) = File::open(Path::new(&sibling)) else {
            return false;
        };
        let mut decoder = GzDecoder::new(BufReader::new(compressed));
        let Ok(mut plain) = File::create(path) else {
            return false;
        };
        match io::copy(&mut decoder, &mut plain) {
            Ok(_) => true,
            Err(_) => {
                // Do not leave a half-decompressed trajectory behind.
                drop(plain);
                let _ = fs::remove_file(path);
                false
            }
        }
    }
}

/// Disables open-time recovery.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRecovery;

impl SiblingRecovery for NoRecovery {
    fn recover(&mut self, _path: &Path) -> bool {
        false
    }
}

/// Buffered file stream speaking the [`TrajStream`] contract.
#[derive(Debug)]
pub struct FileStream {
    inner: BufReader<File>,
    scratch: Vec<u8>,
    eof: bool,
    healthy: bool,
    dim: u32,
}

impl FileStream {
    /// Open a trajectory file with no recovery fallback.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, OpenError> {
        Self::open_recovering(path.as_ref(), &mut NoRecovery)
    }

    /// Open a trajectory file, consulting `recovery` once if the first
    /// attempt fails.
    pub fn open_recovering<R: SiblingRecovery>(
        path: &Path,
        recovery: &mut R,
    ) -> Result<Self, OpenError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(first) => {
                if recovery.recover(path) {
                    File::open(path).map_err(|err| open_failure(path, err))?
                } else {
                    return Err(open_failure(path, first));
                }
            }
        };
        let meta = file.metadata()?;
        if !meta.is_file() {
            return Err(OpenError::Unhealthy {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            inner: BufReader::new(file),
            scratch: Vec::new(),
            eof: false,
            healthy: true,
            dim: DEFAULT_VECTOR_WIDTH,
        })
    }
}

impl TrajStream for FileStream {
    fn rewind(&mut self) {
        self.eof = false;
        if self.inner.seek(SeekFrom::Start(0)).is_err() {
            self.healthy = false;
        }
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
        self.healthy
    }

    fn position(&mut self) -> Option<StreamPos> {
        self.inner.stream_position().ok().map(StreamPos::from_raw)
    }

    fn set_position(&mut self, pos: StreamPos) {
        self.eof = false;
        if self.inner.seek(SeekFrom::Start(pos.raw())).is_err() {
            self.healthy = false;
        }
    }

    fn read_line(&mut self, buf: &mut String) -> usize {
        buf.clear();
        self.scratch.clear();
        match self.inner.read_until(b'\n', &mut self.scratch) {
            Ok(0) => {
                self.eof = true;
                0
            }
            Ok(_) => {
                if self.scratch.last() == Some(&b'\n') {
                    self.scratch.pop();
                } else {
                    // No terminator: a writer may still be mid-record.
                    self.eof = true;
                }
                buf.push_str(&String::from_utf8_lossy(&self.scratch));
                buf.len()
            }
            Err(_) => {
                self.healthy = false;
                0
            }
        }
    }

    fn declare_vector_width(&mut self, dim: u32) {
        self.dim = dim;
    }

    #[inline(always)]
    fn vector_width(&self) -> u32 {
        self.dim
    }
}
