//! Error type shared by the fallible parts of the headless driver.

use std::io;
use std::path::PathBuf;

use hydrolysis::ImageError;
use thiserror::Error;

/// Errors raised by the headless driver's infrastructure.
///
/// Rendering itself never fails: degenerate sizes, unknown primitives and missing painters simply
/// produce nothing. These variants cover I/O, configuration and the task queues.
#[derive(Debug, Error)]
pub enum HeadlessError {
    /// Converting or decoding an image failed.
    #[error(transparent)]
    Image(#[from] ImageError),
    /// Reading or writing a file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// A JSON configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// An environment variable holds an unusable value.
    #[error("invalid value {value:?} for {key}")]
    Env {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
    /// A capture differs from its master image. The capture was written to `failed`.
    #[error("rendered image differs from {}, wrote {}", master.display(), failed.display())]
    ImageMismatch {
        /// Expected image.
        master: PathBuf,
        /// Where the actual capture was stored.
        failed: PathBuf,
    },
    /// The canvas has no painter, no content or no pixels.
    #[error("canvas did not produce an image")]
    EmptyCapture,
    /// A task was sent to a queue that has been closed.
    #[error("task queue is closed")]
    QueueClosed,
    /// The worker thread of a task queue could not be started.
    #[error("failed to start task queue worker: {0}")]
    Spawn(#[source] io::Error),
}

impl HeadlessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type used across the crate.
pub type Result<T, E = HeadlessError> = core::result::Result<T, E>;
