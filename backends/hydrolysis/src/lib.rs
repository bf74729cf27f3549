//! Hydrolysis – the WaterUI self-drawn renderer.
//!
//! The crate hosts the painter contract canvases render through, the clip bookkeeping shared by
//! every backend and a CPU [`SoftwarePainter`] built on `tiny-skia`. Frames come out as
//! [`CapturedImage`]s in straight RGBA so tests can compare them byte for byte.

#![deny(missing_debug_implementations)]

pub mod backend;
pub mod clip;
pub mod image;

#[cfg(feature = "cpu")]
pub use backend::SoftwarePainter;
pub use backend::{PaintSurface, Painter, SurfaceInfo};
pub use clip::{ClipItem, ClipStack};
pub use image::{CapturedImage, ImageError};
