//! Software painter built on top of `tiny-skia`.

use core::cell::RefCell;

use tiny_skia::{FillRule, IntRect, Mask, PathBuilder, Pixmap, Transform};
use tracing::trace;
use waterui_scene::walk::walk_visible_object_tree;
use waterui_scene::{ObjectKind, ObjectRef, Point, Rect, Size};

use super::draw::{DrawTarget, draw_outline, draw_primitive, skia_color};
use super::{PaintSurface, Painter, SurfaceInfo};
use crate::image::CapturedImage;

/// CPU painter that renders a whole surface into a fresh pixmap.
///
/// A paint of the content root redraws the content and every layer above it, so the paint
/// requests for descendants that follow within the same walk have nothing left to do.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftwarePainter;

impl SoftwarePainter {
    /// Creates a new painter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Renders `trees` onto a pixmap sized for `info`.
    ///
    /// Returns `None` when the surface has no pixels.
    #[must_use]
    pub fn render(info: &SurfaceInfo, trees: &[ObjectRef]) -> Option<CapturedImage> {
        let (width, height) = info.pixel_bounds();
        let mut pixmap = Pixmap::new(width, height)?;
        if !info.transparent {
            pixmap.fill(skia_color(info.background));
        }

        let scale = info.pixel_scale();
        let transform = Transform::from_scale(scale, scale);
        let frame = RefCell::new(Frame {
            pixmap,
            masks: MaskCache::default(),
        });

        for tree in trees {
            walk_visible_object_tree(
                tree,
                |object, position, clip| {
                    let ObjectKind::Primitive(primitive) = object.kind() else {
                        return false;
                    };
                    let Some(device_clip) = device_clip(info, clip) else {
                        return false;
                    };
                    trace!(id = object.id().get(), x = position.x, y = position.y, "paint node");
                    let Frame { pixmap, masks } = &mut *frame.borrow_mut();
                    let target = DrawTarget {
                        transform,
                        pixel_scale: scale,
                        clip: masks.get(device_clip, width, height),
                    };
                    draw_primitive(pixmap, &target, &primitive, position, object.size());
                    false
                },
                |object, position, clip| {
                    if !info.debug {
                        return;
                    }
                    let Some(device_clip) = device_clip(info, clip) else {
                        return;
                    };
                    let Frame { pixmap, masks } = &mut *frame.borrow_mut();
                    let target = DrawTarget {
                        transform,
                        pixel_scale: scale,
                        clip: masks.get(device_clip, width, height),
                    };
                    let bounds = Rect::new(position, object.size());
                    draw_outline(pixmap, &target, bounds, info.debug_color);
                },
            );
        }

        to_captured(&frame.into_inner().pixmap)
    }
}

struct Frame {
    pixmap: Pixmap,
    masks: MaskCache,
}

impl Painter for SoftwarePainter {
    fn capture(&self, surface: &dyn PaintSurface) -> Option<CapturedImage> {
        let content = surface.content()?;
        let info = surface.surface_info();
        self.paint(surface, &content, Point::zero(), info.size);
        surface.rendered()
    }

    fn paint(&self, surface: &dyn PaintSurface, object: &ObjectRef, _position: Point, _frame: Size) {
        let Some(content) = surface.content() else {
            return;
        };
        if content.id() != object.id() {
            return;
        }
        let info = surface.surface_info();
        let mut trees = vec![content];
        trees.extend(surface.layers());
        surface.set_rendered(Self::render(&info, &trees));
    }
}

/// Clip rectangle limited to the surface, in device pixels. `None` when nothing is visible.
fn device_clip(info: &SurfaceInfo, clip: Rect) -> Option<IntRect> {
    let right = clip.max_x().min(info.size.width);
    let bottom = clip.max_y().min(info.size.height);
    let left = info.to_device(clip.x()).max(0);
    let top = info.to_device(clip.y()).max(0);
    let right = info.to_device(right);
    let bottom = info.to_device(bottom);
    if right <= left || bottom <= top {
        return None;
    }
    IntRect::from_ltrb(left, top, right, bottom)
}

/// Remembers the mask of the last clip so siblings in the same region share it.
#[derive(Default)]
struct MaskCache {
    current: Option<(IntRect, Option<Mask>)>,
}

impl MaskCache {
    /// Mask for `clip`, or `None` when the clip covers the whole pixmap.
    fn get(&mut self, clip: IntRect, width: u32, height: u32) -> Option<&Mask> {
        let stale = self.current.as_ref().is_none_or(|(rect, _)| *rect != clip);
        if stale {
            self.current = Some((clip, build_mask(clip, width, height)));
        }
        self.current.as_ref().and_then(|(_, mask)| mask.as_ref())
    }
}

#[allow(clippy::cast_sign_loss)]
fn build_mask(clip: IntRect, width: u32, height: u32) -> Option<Mask> {
    let covers_all = clip.left() <= 0
        && clip.top() <= 0
        && clip.right() as u32 >= width
        && clip.bottom() as u32 >= height;
    if covers_all {
        return None;
    }
    let mut mask = Mask::new(width, height)?;
    let path = PathBuilder::from_rect(clip.to_rect());
    mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
    Some(mask)
}

fn to_captured(pixmap: &Pixmap) -> Option<CapturedImage> {
    let pixels = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    CapturedImage::from_rgba(pixmap.width(), pixmap.height(), pixels).ok()
}

#[cfg(test)]
mod tests {
    use waterui_scene::{CanvasObject, Color, Container, Rectangle, Scroll, StackLayout};

    use super::*;

    fn info(size: Size) -> SurfaceInfo {
        SurfaceInfo {
            size,
            scale: 1.0,
            texture_scale: 1.0,
            transparent: false,
            background: Color::WHITE,
            debug: false,
            debug_color: Color::BLACK,
        }
    }

    #[test]
    fn full_rectangle_covers_every_pixel() {
        let rect = Rectangle::new(Color::rgb(10, 200, 30));
        rect.resize(Size::new(8.0, 6.0));
        let image = SoftwarePainter::render(&info(Size::new(8.0, 6.0)), &[rect as ObjectRef]).unwrap();
        assert_eq!((image.width(), image.height()), (8, 6));
        assert!(image.colors().all(|c| c == Color::rgb(10, 200, 30)));
    }

    #[test]
    fn transparent_surface_is_not_flooded() {
        let mut info = info(Size::square(4.0));
        info.transparent = true;
        let image = SoftwarePainter::render(&info, &[]).unwrap();
        assert!(image.colors().all(Color::is_transparent));
    }

    #[test]
    fn scroll_clips_its_content() {
        let content = Rectangle::new(Color::BLACK);
        content.set_min_size(Size::square(20.0));
        let scroll = Scroll::scroll(content);
        let root = Container::new(StackLayout, vec![scroll as ObjectRef]);
        root.resize(Size::square(10.0));
        // Shrink the viewport after layout so the content overflows it.
        let scroll = root.objects()[0].clone();
        scroll.resize(Size::square(4.0));

        let image = SoftwarePainter::render(&info(Size::square(10.0)), &[root as ObjectRef]).unwrap();
        assert_eq!(image.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(image.pixel(6, 6), Some(Color::WHITE));
    }

    #[test]
    fn scale_multiplies_output_size() {
        let mut info = info(Size::new(5.0, 3.0));
        info.scale = 2.0;
        let image = SoftwarePainter::render(&info, &[]).unwrap();
        assert_eq!((image.width(), image.height()), (10, 6));
    }

    #[test]
    fn zero_sized_surface_has_no_frame() {
        assert!(SoftwarePainter::render(&info(Size::zero()), &[]).is_none());
    }
}
