//! Helpers for asserting what a canvas renders.
//!
//! Master images are PNG files kept next to the tests. When a capture differs from its master,
//! the capture is written to a `failed` directory beside the master so the two can be compared.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hydrolysis::{CapturedImage, SoftwarePainter};
use tracing::warn;
use waterui_scene::ObjectRef;

use crate::canvas::Canvas;
use crate::error::{HeadlessError, Result};

/// Name of the directory receiving captures that did not match their master.
pub const FAILED_DIR: &str = "failed";

/// Captures `canvas` and compares it byte for byte with the PNG `master` inside `dir`.
///
/// # Errors
///
/// * [`HeadlessError::EmptyCapture`] when the canvas cannot produce a frame.
/// * [`HeadlessError::ImageMismatch`] when the master is missing or differs. The capture is
///   written to `dir/failed/master`.
/// * I/O and PNG errors while reading the master or writing the capture.
pub fn assert_renders_to_image(dir: impl AsRef<Path>, master: &str, canvas: &Canvas) -> Result<()> {
    let dir = dir.as_ref();
    let captured = canvas.capture().ok_or(HeadlessError::EmptyCapture)?;
    let master_path = dir.join(master);

    if master_path.exists() && load_image(&master_path)? == captured {
        return Ok(());
    }

    let failed = dir.join(FAILED_DIR).join(master);
    save_image(&failed, &captured)?;
    warn!(master = %master_path.display(), failed = %failed.display(), "render mismatch");
    Err(HeadlessError::ImageMismatch {
        master: master_path,
        failed,
    })
}

/// Writes `image` as PNG to `path`, creating parent directories.
///
/// # Errors
///
/// Fails on I/O or encoding errors.
pub fn save_image(path: impl AsRef<Path>, image: &CapturedImage) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| HeadlessError::io(parent, source))?;
    }
    let file = File::create(path).map_err(|source| HeadlessError::io(path, source))?;
    image.write_png(BufWriter::new(file))?;
    Ok(())
}

/// Reads a PNG from `path`.
///
/// # Errors
///
/// Fails on I/O or decoding errors.
pub fn load_image(path: impl AsRef<Path>) -> Result<CapturedImage> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| HeadlessError::io(path, source))?;
    Ok(CapturedImage::read_png(BufReader::new(file))?)
}

/// An unpadded canvas rendered by [`SoftwarePainter`] showing `object` at its minimum size.
#[must_use]
pub fn object_canvas(object: ObjectRef) -> Arc<Canvas> {
    let canvas = Canvas::with_painter(Arc::new(SoftwarePainter::new()));
    canvas.set_padded(false);
    canvas.set_content(object);
    canvas
}

/// Path of the failed capture for `master` within `dir`.
#[must_use]
pub fn failed_path(dir: impl AsRef<Path>, master: &str) -> PathBuf {
    dir.as_ref().join(FAILED_DIR).join(master)
}

#[cfg(test)]
mod tests {
    use waterui_scene::{Color, Rectangle};

    use super::*;

    #[test]
    fn missing_master_is_a_mismatch_with_artefact() {
        let dir = tempfile::tempdir().unwrap();
        let canvas = object_canvas(Rectangle::new(Color::BLACK));
        let err = assert_renders_to_image(dir.path(), "black.png", &canvas).unwrap_err();
        assert!(matches!(err, HeadlessError::ImageMismatch { .. }));
        assert!(failed_path(dir.path(), "black.png").exists());
    }

    #[test]
    fn matching_master_passes() {
        let dir = tempfile::tempdir().unwrap();
        let canvas = object_canvas(Rectangle::new(Color::BLACK));
        save_image(dir.path().join("black.png"), &canvas.capture().unwrap()).unwrap();
        assert_renders_to_image(dir.path(), "black.png", &canvas).unwrap();
        assert!(!failed_path(dir.path(), "black.png").exists());
    }

    #[test]
    fn canvas_without_painter_cannot_be_asserted() {
        let dir = tempfile::tempdir().unwrap();
        let err = assert_renders_to_image(dir.path(), "none.png", &Canvas::new()).unwrap_err();
        assert!(matches!(err, HeadlessError::EmptyCapture));
    }
}
