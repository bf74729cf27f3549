//! Primitive drawers targeting a `tiny-skia` pixmap.
//!
//! Shapes are described in logical pixels and mapped to the device by the target transform. The
//! clip mask is always expressed in device pixels.

use tiny_skia::{
    ColorU8, FillRule, FilterQuality, GradientStop, Mask, Paint, Path, PathBuilder, Pattern, Pixmap,
    Shader, SpreadMode, Stroke, Transform,
};
use tracing::warn;
use waterui_scene::text::{glyph_advance, line_height, line_width};
use waterui_scene::{
    CircleStyle, Color, ImageData, ImageFill, ImageSpec, LineStyle, LinearGradientSpec, Point,
    Primitive, RadialGradientSpec, RasterSpec, Rect, RectangleStyle, Size, TextAlign, TextSpec,
};

/// Bezier handle length approximating a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// Where and how a primitive lands on the pixmap.
pub(crate) struct DrawTarget<'m> {
    pub(crate) transform: Transform,
    pub(crate) pixel_scale: f32,
    pub(crate) clip: Option<&'m Mask>,
}

impl DrawTarget<'_> {
    fn fill(&self, pixmap: &mut Pixmap, path: &Path, paint: &Paint<'_>) {
        pixmap.fill_path(path, paint, FillRule::Winding, self.transform, self.clip);
    }

    fn stroke(&self, pixmap: &mut Pixmap, path: &Path, color: Color, width: f32) {
        if width <= 0.0 || color.is_transparent() {
            return;
        }
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        pixmap.stroke_path(path, &solid(color), &stroke, self.transform, self.clip);
    }

    fn fill_rect(&self, pixmap: &mut Pixmap, rect: Rect, paint: &Paint<'_>) {
        if let Some(rect) = skia_rect(rect) {
            pixmap.fill_rect(rect, paint, self.transform, self.clip);
        }
    }
}

pub(crate) fn skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.red, color.green, color.blue, color.alpha)
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint
}

fn skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    if rect.size.is_degenerate() {
        return None;
    }
    tiny_skia::Rect::from_xywh(rect.x(), rect.y(), rect.size.width, rect.size.height)
}

fn skia_point(point: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(point.x, point.y)
}

/// Draws one primitive whose node sits at `position` with `size`.
pub(crate) fn draw_primitive(
    pixmap: &mut Pixmap,
    target: &DrawTarget<'_>,
    primitive: &Primitive,
    position: Point,
    size: Size,
) {
    let bounds = Rect::new(position, size);
    match primitive {
        Primitive::Rectangle(style) => draw_rectangle(pixmap, target, style, bounds),
        Primitive::Line(style) => draw_line(pixmap, target, style, bounds),
        Primitive::Circle(style) => draw_circle(pixmap, target, style, bounds),
        Primitive::Text(spec) => draw_text(pixmap, target, spec, bounds),
        Primitive::Image(spec) => draw_image(pixmap, target, spec, bounds),
        Primitive::Raster(spec) => draw_raster(pixmap, target, spec, bounds),
        Primitive::LinearGradient(spec) => draw_linear_gradient(pixmap, target, spec, bounds),
        Primitive::RadialGradient(spec) => draw_radial_gradient(pixmap, target, spec, bounds),
    }
}

/// Frames `bounds` with a one device pixel wide border drawn just inside it.
pub(crate) fn draw_outline(pixmap: &mut Pixmap, target: &DrawTarget<'_>, bounds: Rect, color: Color) {
    if bounds.size.is_degenerate() || color.is_transparent() {
        return;
    }
    let line = (1.0 / target.pixel_scale)
        .min(bounds.size.width)
        .min(bounds.size.height);
    let mut paint = solid(color);
    paint.anti_alias = false;

    let (x, y) = (bounds.x(), bounds.y());
    let (width, height) = (bounds.size.width, bounds.size.height);
    let edges = [
        Rect::new(Point::new(x, y), Size::new(width, line)),
        Rect::new(Point::new(x, y + height - line), Size::new(width, line)),
        Rect::new(Point::new(x, y), Size::new(line, height)),
        Rect::new(Point::new(x + width - line, y), Size::new(line, height)),
    ];
    for edge in edges {
        target.fill_rect(pixmap, edge, &paint);
    }
}

fn rounded_rect_path(bounds: Rect, radius: f32) -> Option<Path> {
    let rect = skia_rect(bounds)?;
    let radius = radius.min(bounds.size.width / 2.0).min(bounds.size.height / 2.0);
    if radius <= 0.0 {
        return Some(PathBuilder::from_rect(rect));
    }

    let (left, top, right, bottom) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let handle = radius * (1.0 - KAPPA);
    let mut builder = PathBuilder::new();
    builder.move_to(left + radius, top);
    builder.line_to(right - radius, top);
    builder.cubic_to(right - handle, top, right, top + handle, right, top + radius);
    builder.line_to(right, bottom - radius);
    builder.cubic_to(right, bottom - handle, right - handle, bottom, right - radius, bottom);
    builder.line_to(left + radius, bottom);
    builder.cubic_to(left + handle, bottom, left, bottom - handle, left, bottom - radius);
    builder.line_to(left, top + radius);
    builder.cubic_to(left, top + handle, left + handle, top, left + radius, top);
    builder.close();
    builder.finish()
}

fn draw_rectangle(pixmap: &mut Pixmap, target: &DrawTarget<'_>, style: &RectangleStyle, bounds: Rect) {
    if style.corner_radius <= 0.0 && !style.fill.is_transparent() {
        target.fill_rect(pixmap, bounds, &solid(style.fill));
        if let Some(rect) = skia_rect(bounds) {
            target.stroke(pixmap, &PathBuilder::from_rect(rect), style.stroke, style.stroke_width);
        }
        return;
    }

    let Some(path) = rounded_rect_path(bounds, style.corner_radius) else {
        return;
    };
    if !style.fill.is_transparent() {
        target.fill(pixmap, &path, &solid(style.fill));
    }
    target.stroke(pixmap, &path, style.stroke, style.stroke_width);
}

fn draw_line(pixmap: &mut Pixmap, target: &DrawTarget<'_>, style: &LineStyle, bounds: Rect) {
    let mut builder = PathBuilder::new();
    builder.move_to(bounds.x(), bounds.y());
    builder.line_to(bounds.max_x(), bounds.max_y());
    if let Some(path) = builder.finish() {
        target.stroke(pixmap, &path, style.stroke, style.stroke_width);
    }
}

fn draw_circle(pixmap: &mut Pixmap, target: &DrawTarget<'_>, style: &CircleStyle, bounds: Rect) {
    let Some(path) = skia_rect(bounds).and_then(PathBuilder::from_oval) else {
        return;
    };
    if !style.fill.is_transparent() {
        target.fill(pixmap, &path, &solid(style.fill));
    }
    target.stroke(pixmap, &path, style.stroke, style.stroke_width);
}

#[allow(clippy::cast_precision_loss)]
fn draw_text(pixmap: &mut Pixmap, target: &DrawTarget<'_>, spec: &TextSpec, bounds: Rect) {
    if spec.color.is_transparent() || spec.size <= 0.0 {
        return;
    }
    let paint = solid(spec.color);
    let advance = glyph_advance(spec.size, spec.style);
    let line_step = line_height(spec.size);

    for (row, line) in spec.text.split('\n').enumerate() {
        let width = line_width(line, spec.size, spec.style);
        let start = match spec.align {
            TextAlign::Leading => bounds.x(),
            TextAlign::Center => bounds.x() + (bounds.size.width - width) / 2.0,
            TextAlign::Trailing => bounds.max_x() - width,
        };
        let top = bounds.y() + row as f32 * line_step;
        for (column, glyph) in line.chars().enumerate() {
            if glyph.is_whitespace() {
                continue;
            }
            let glyph_box = Rect::new(
                Point::new(start + column as f32 * advance + advance * 0.1, top + spec.size * 0.3),
                Size::new(advance * 0.8, spec.size * 0.7),
            );
            target.fill_rect(pixmap, glyph_box, &paint);
        }
    }
}

fn pixmap_from_image(data: &ImageData) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(data.width(), data.height())?;
    for (dst, src) in pixmap
        .pixels_mut()
        .iter_mut()
        .zip(data.pixels().chunks_exact(4))
    {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Some(pixmap)
}

fn image_destination(fill: ImageFill, natural: Size, bounds: Rect) -> Rect {
    match fill {
        ImageFill::Stretch => bounds,
        ImageFill::Original => Rect::new(bounds.origin, natural),
        ImageFill::Contain => {
            let ratio = (bounds.size.width / natural.width).min(bounds.size.height / natural.height);
            let fitted = Size::new(natural.width * ratio, natural.height * ratio);
            Rect::new(
                Point::new(
                    bounds.x() + (bounds.size.width - fitted.width) / 2.0,
                    bounds.y() + (bounds.size.height - fitted.height) / 2.0,
                ),
                fitted,
            )
        }
    }
}

fn draw_image(pixmap: &mut Pixmap, target: &DrawTarget<'_>, spec: &ImageSpec, bounds: Rect) {
    let Some(data) = &spec.data else {
        return;
    };
    let natural = data.size();
    if natural.is_degenerate() {
        return;
    }
    let Some(source) = pixmap_from_image(data) else {
        return;
    };
    let destination = image_destination(spec.fill, natural, bounds);
    if destination.size.is_degenerate() {
        return;
    }

    let placement = Transform::from_row(
        destination.size.width / natural.width,
        0.0,
        0.0,
        destination.size.height / natural.height,
        destination.x(),
        destination.y(),
    );
    let paint = Paint {
        shader: Pattern::new(
            source.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Nearest,
            1.0,
            placement,
        ),
        ..Paint::default()
    };
    target.fill_rect(pixmap, destination, &paint);
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn draw_raster(pixmap: &mut Pixmap, target: &DrawTarget<'_>, spec: &RasterSpec, bounds: Rect) {
    let width = (bounds.size.width * target.pixel_scale).round().max(0.0) as u32;
    let height = (bounds.size.height * target.pixel_scale).round().max(0.0) as u32;
    if width == 0 || height == 0 {
        return;
    }
    let data = (spec.generator)(width, height);
    if data.width() != width || data.height() != height {
        warn!(
            requested_width = width,
            requested_height = height,
            width = data.width(),
            height = data.height(),
            "raster generator returned a mis-sized image, stretching it"
        );
    }
    let image = ImageSpec {
        data: Some(data),
        fill: ImageFill::Stretch,
    };
    draw_image(pixmap, target, &image, bounds);
}

fn two_stops(start: Color, end: Color) -> Vec<GradientStop> {
    vec![
        GradientStop::new(0.0, skia_color(start)),
        GradientStop::new(1.0, skia_color(end)),
    ]
}

fn draw_linear_gradient(
    pixmap: &mut Pixmap,
    target: &DrawTarget<'_>,
    spec: &LinearGradientSpec,
    bounds: Rect,
) {
    let radians = spec.angle.to_radians();
    let (dx, dy) = (radians.sin(), radians.cos());
    let center = Point::new(
        bounds.x() + bounds.size.width / 2.0,
        bounds.y() + bounds.size.height / 2.0,
    );
    let reach = (dx.abs() * bounds.size.width + dy.abs() * bounds.size.height) / 2.0;
    let start = Point::new(center.x - dx * reach, center.y - dy * reach);
    let end = Point::new(center.x + dx * reach, center.y + dy * reach);

    let shader = tiny_skia::LinearGradient::new(
        skia_point(start),
        skia_point(end),
        two_stops(spec.start, spec.end),
        SpreadMode::Pad,
        Transform::identity(),
    )
    .unwrap_or(Shader::SolidColor(skia_color(spec.start)));
    let paint = Paint {
        shader,
        ..Paint::default()
    };
    target.fill_rect(pixmap, bounds, &paint);
}

fn draw_radial_gradient(
    pixmap: &mut Pixmap,
    target: &DrawTarget<'_>,
    spec: &RadialGradientSpec,
    bounds: Rect,
) {
    let center = Point::new(
        bounds.x() + bounds.size.width * (0.5 + spec.center_offset.x),
        bounds.y() + bounds.size.height * (0.5 + spec.center_offset.y),
    );
    let reach_x = (center.x - bounds.x()).max(bounds.max_x() - center.x);
    let reach_y = (center.y - bounds.y()).max(bounds.max_y() - center.y);
    let radius = reach_x.hypot(reach_y);

    let shader = tiny_skia::RadialGradient::new(
        skia_point(center),
        skia_point(center),
        radius,
        two_stops(spec.start, spec.end),
        SpreadMode::Pad,
        Transform::identity(),
    )
    .unwrap_or(Shader::SolidColor(skia_color(spec.end)));
    let paint = Paint {
        shader,
        ..Paint::default()
    };
    target.fill_rect(pixmap, bounds, &paint);
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use waterui_scene::TextStyle;

    use super::*;

    const RED: Color = Color::rgb(220, 20, 20);
    const BLUE: Color = Color::rgb(20, 20, 220);

    fn pixmap(width: u32, height: u32) -> Pixmap {
        let mut pixmap = Pixmap::new(width, height).unwrap();
        pixmap.fill(skia_color(Color::WHITE));
        pixmap
    }

    fn draw(pixmap: &mut Pixmap, scale: f32, primitive: &Primitive, bounds: Rect) {
        let target = DrawTarget {
            transform: Transform::from_scale(scale, scale),
            pixel_scale: scale,
            clip: None,
        };
        draw_primitive(pixmap, &target, primitive, bounds.origin, bounds.size);
    }

    fn color_at(pixmap: &Pixmap, x: u32, y: u32) -> Color {
        let color = pixmap.pixel(x, y).unwrap().demultiply();
        Color::rgba(color.red(), color.green(), color.blue(), color.alpha())
    }

    fn square(side: f32) -> Rect {
        Rect::new(Point::zero(), Size::square(side))
    }

    #[test]
    fn circle_fills_its_center_but_not_the_corners() {
        let mut target = pixmap(20, 20);
        let style = CircleStyle {
            fill: RED,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
        };
        draw(&mut target, 1.0, &Primitive::Circle(style), square(20.0));
        assert_eq!(color_at(&target, 10, 10), RED);
        assert_eq!(color_at(&target, 0, 0), Color::WHITE);
        assert_eq!(color_at(&target, 19, 19), Color::WHITE);
    }

    #[test]
    fn line_runs_along_the_diagonal() {
        let mut target = pixmap(20, 20);
        let style = LineStyle {
            stroke: Color::BLACK,
            stroke_width: 2.0,
        };
        draw(&mut target, 1.0, &Primitive::Line(style), square(20.0));
        assert_eq!(color_at(&target, 10, 10), Color::BLACK);
        assert_eq!(color_at(&target, 15, 2), Color::WHITE);
    }

    #[test]
    fn text_draws_a_box_per_visible_glyph() {
        let mut target = pixmap(20, 20);
        let spec = TextSpec {
            text: "H H".to_owned(),
            color: Color::BLACK,
            size: 10.0,
            style: TextStyle::default(),
            align: TextAlign::Leading,
        };
        draw(&mut target, 1.0, &Primitive::Text(spec), square(20.0));
        // Advance is 6 px: glyphs cover x 0.6..5.4 and 12.6..17.4, y 3..10.
        assert_eq!(color_at(&target, 3, 6), Color::BLACK);
        assert_eq!(color_at(&target, 9, 6), Color::WHITE, "spaces leave no box");
        assert_eq!(color_at(&target, 15, 6), Color::BLACK);
        assert_eq!(color_at(&target, 3, 15), Color::WHITE);
    }

    #[test]
    fn image_fill_modes_place_pixels() {
        let image = |data: ImageData, fill: ImageFill| Primitive::Image(ImageSpec { data: Some(data), fill });

        let mut stretched = pixmap(10, 10);
        draw(&mut stretched, 1.0, &image(ImageData::filled(2, 2, RED), ImageFill::Stretch), square(10.0));
        assert_eq!(color_at(&stretched, 9, 9), RED);

        let mut contained = pixmap(10, 10);
        draw(&mut contained, 1.0, &image(ImageData::filled(2, 1, RED), ImageFill::Contain), square(10.0));
        assert_eq!(color_at(&contained, 5, 0), Color::WHITE);
        assert_eq!(color_at(&contained, 5, 5), RED);

        let mut original = pixmap(10, 10);
        draw(&mut original, 1.0, &image(ImageData::filled(2, 2, RED), ImageFill::Original), square(10.0));
        assert_eq!(color_at(&original, 1, 1), RED);
        assert_eq!(color_at(&original, 5, 5), Color::WHITE);
    }

    #[test]
    fn raster_is_generated_at_device_size() {
        let requested = Arc::new(Mutex::new(None));
        let seen = requested.clone();
        let spec = RasterSpec {
            generator: Arc::new(move |width: u32, height: u32| {
                *seen.lock().unwrap() = Some((width, height));
                ImageData::filled(width, height, BLUE)
            }),
        };
        let mut target = pixmap(20, 20);
        draw(&mut target, 2.0, &Primitive::Raster(spec), square(10.0));
        assert_eq!(*requested.lock().unwrap(), Some((20, 20)));
        assert_eq!(color_at(&target, 19, 19), BLUE);
    }

    #[test]
    fn linear_gradient_puts_end_colors_on_opposite_edges() {
        let mut target = pixmap(20, 10);
        let spec = LinearGradientSpec {
            start: RED,
            end: BLUE,
            angle: 90.0,
        };
        draw(
            &mut target,
            1.0,
            &Primitive::LinearGradient(spec),
            Rect::new(Point::zero(), Size::new(20.0, 10.0)),
        );
        let left = color_at(&target, 0, 5);
        let right = color_at(&target, 19, 5);
        assert!(left.red > 200 && left.blue < 40, "left edge is {left:?}");
        assert!(right.blue > 200 && right.red < 40, "right edge is {right:?}");
    }

    #[test]
    fn radial_gradient_fades_from_center_to_rim() {
        let mut target = pixmap(20, 20);
        let spec = RadialGradientSpec {
            start: RED,
            end: BLUE,
            center_offset: Point::zero(),
        };
        draw(&mut target, 1.0, &Primitive::RadialGradient(spec), square(20.0));
        let center = color_at(&target, 10, 10);
        let corner = color_at(&target, 0, 0);
        assert!(center.red > center.blue, "center is {center:?}");
        assert!(corner.blue > corner.red, "corner is {corner:?}");
    }

    #[test]
    fn outline_frames_bounds_from_inside() {
        let mut target = pixmap(10, 10);
        let draw_target = DrawTarget {
            transform: Transform::identity(),
            pixel_scale: 1.0,
            clip: None,
        };
        draw_outline(&mut target, &draw_target, square(10.0), RED);
        assert_eq!(color_at(&target, 0, 0), RED);
        assert_eq!(color_at(&target, 9, 5), RED);
        assert_eq!(color_at(&target, 5, 5), Color::WHITE);
    }

    #[test]
    fn contain_centers_the_fitted_image() {
        let bounds = Rect::new(Point::zero(), Size::new(100.0, 50.0));
        let destination = image_destination(ImageFill::Contain, Size::new(10.0, 10.0), bounds);
        assert_eq!(destination, Rect::new(Point::new(25.0, 0.0), Size::square(50.0)));
    }

    #[test]
    fn original_keeps_natural_size() {
        let bounds = Rect::new(Point::new(3.0, 4.0), Size::new(100.0, 50.0));
        let destination = image_destination(ImageFill::Original, Size::new(7.0, 9.0), bounds);
        assert_eq!(destination, Rect::new(Point::new(3.0, 4.0), Size::new(7.0, 9.0)));
    }

    #[test]
    fn rounded_path_exists_for_large_radius() {
        let bounds = Rect::new(Point::zero(), Size::new(10.0, 4.0));
        assert!(rounded_rect_path(bounds, 50.0).is_some());
        assert!(rounded_rect_path(Rect::new(Point::zero(), Size::zero()), 2.0).is_none());
    }
}
