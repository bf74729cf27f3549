//! Painter contract between canvases and the backends that rasterize them.

use core::fmt::Debug;

use waterui_scene::{Color, ObjectId, ObjectRef, Point, Rect, Size};

use crate::image::CapturedImage;

#[cfg(feature = "cpu")]
mod draw;

#[cfg(feature = "cpu")]
pub mod cpu;

#[cfg(feature = "cpu")]
pub use cpu::SoftwarePainter;

/// Render settings of a surface, snapshotted at the start of a paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceInfo {
    /// Logical size of the surface.
    pub size: Size,
    /// Output scale.
    pub scale: f32,
    /// Extra scale applied to the backing texture.
    pub texture_scale: f32,
    /// Skip the background flood.
    pub transparent: bool,
    /// Color flooded over the frame before drawing.
    pub background: Color,
    /// Outline every painted node.
    pub debug: bool,
    /// Color of debug outlines.
    pub debug_color: Color,
}

impl SurfaceInfo {
    /// Device pixels per logical pixel.
    #[must_use]
    pub fn pixel_scale(&self) -> f32 {
        self.scale * self.texture_scale
    }

    /// Converts a logical coordinate to the nearest device pixel, rounding half away from zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_device(&self, value: f32) -> i32 {
        (value * self.pixel_scale()).round() as i32
    }

    /// Dimensions of the frame in device pixels, `ceil(size * scale * texture_scale)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_bounds(&self) -> (u32, u32) {
        let scale = self.pixel_scale();
        (
            (self.size.width * scale).ceil().max(0.0) as u32,
            (self.size.height * scale).ceil().max(0.0) as u32,
        )
    }
}

/// A canvas as seen by a painter.
pub trait PaintSurface: Send + Sync {
    /// Current render settings.
    fn surface_info(&self) -> SurfaceInfo;

    /// The content root, if any.
    fn content(&self) -> Option<ObjectRef>;

    /// Trees drawn above the content: the menu bar, then overlays bottom to top.
    fn layers(&self) -> Vec<ObjectRef>;

    /// The most recent frame.
    fn rendered(&self) -> Option<CapturedImage>;

    /// Replaces the most recent frame. `None` drops it, as for a surface without pixels.
    fn set_rendered(&self, image: Option<CapturedImage>);
}

/// Rasterizes scene nodes into the frame of a [`PaintSurface`].
///
/// Only [`Painter::paint`] and [`Painter::capture`] must be implemented. The remaining hooks
/// mirror what hardware backends need and default to doing nothing.
pub trait Painter: Debug + Send + Sync {
    /// Prepares the painter once a surface exists.
    fn init(&self) {}

    /// Draws the surface if needed and returns its latest frame.
    fn capture(&self, surface: &dyn PaintSurface) -> Option<CapturedImage>;

    /// Prepares a fresh paint.
    fn clear(&self) {}

    /// Releases resources cached for `object`.
    fn free(&self, _object: ObjectId) {}

    /// Paints `object` found at absolute `position` on a surface of logical size `frame`.
    fn paint(&self, surface: &dyn PaintSurface, object: &ObjectRef, position: Point, frame: Size);

    /// Outlines `object` for layout debugging.
    fn draw_debug_outline(
        &self,
        _surface: &dyn PaintSurface,
        _object: &ObjectRef,
        _position: Point,
        _frame: Size,
    ) {
    }

    /// Number of framebuffer pixels per output pixel.
    fn set_frame_buffer_scale(&self, _scale: f32) {}

    /// Resolution of the output viewport.
    fn set_output_size(&self, _width: u32, _height: u32) {}

    /// Restricts following paints to `clip`.
    fn start_clipping(&self, _clip: Rect) {}

    /// Lifts the clip set by [`Painter::start_clipping`].
    fn stop_clipping(&self) {}
}
