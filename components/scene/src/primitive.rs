//! Leaf drawables and the style snapshots painters consume.
//!
//! Every leaf keeps its style behind a lock and hands out a copy through
//! [`CanvasObject::kind`], so a painter works on a consistent value without downcasting or
//! holding locks while it rasterizes.

use core::fmt;
use std::sync::{Arc, RwLock};

use crate::color::Color;
use crate::forward_base_object;
use crate::geometry::{Point, Size};
use crate::object::{BaseObject, CanvasObject, ObjectKind, read, write};
use crate::text::{TextAlign, TextStyle, rendered_text_size};
use crate::theme::DEFAULT_TEXT_SIZE;

/// Closed set of drawable primitives, each carrying a snapshot of its style.
#[derive(Debug, Clone)]
pub enum Primitive {
    /// Filled and/or stroked rectangle.
    Rectangle(RectangleStyle),
    /// Straight line from the node origin to its far corner.
    Line(LineStyle),
    /// Ellipse inscribed in the node bounds.
    Circle(CircleStyle),
    /// A run of text.
    Text(TextSpec),
    /// Decoded bitmap.
    Image(ImageSpec),
    /// Bitmap generated on demand at device resolution.
    Raster(RasterSpec),
    /// Two-stop linear gradient.
    LinearGradient(LinearGradientSpec),
    /// Two-stop radial gradient.
    RadialGradient(RadialGradientSpec),
}

/// Style of a [`Rectangle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleStyle {
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width, `0` disables the stroke.
    pub stroke_width: f32,
    /// Corner radius.
    pub corner_radius: f32,
}

/// Style of a [`Line`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width.
    pub stroke_width: f32,
}

/// Style of a [`Circle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleStyle {
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width, `0` disables the stroke.
    pub stroke_width: f32,
}

/// Snapshot of a [`Text`] node.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpec {
    /// The string to draw, may contain `\n`.
    pub text: String,
    /// Glyph color.
    pub color: Color,
    /// Font size in logical pixels.
    pub size: f32,
    /// Font style flags.
    pub style: TextStyle,
    /// Horizontal alignment.
    pub align: TextAlign,
}

/// How an image is fitted into the bounds of its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFill {
    /// Scale to the node bounds, ignoring the aspect ratio.
    #[default]
    Stretch,
    /// Scale uniformly to fit inside the bounds, centered.
    Contain,
    /// Draw at its natural size from the node origin.
    Original,
}

/// Snapshot of an [`Image`] node.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSpec {
    /// Pixels to draw, `None` for an empty image.
    pub data: Option<ImageData>,
    /// Fit mode.
    pub fill: ImageFill,
}

/// Generator that produces pixels for a requested device size.
pub type RasterGenerator = Arc<dyn Fn(u32, u32) -> ImageData + Send + Sync>;

/// Snapshot of a [`Raster`] node.
#[derive(Clone)]
pub struct RasterSpec {
    /// Pixel generator.
    pub generator: RasterGenerator,
}

impl fmt::Debug for RasterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSpec").finish_non_exhaustive()
    }
}

/// Snapshot of a [`LinearGradient`] node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradientSpec {
    /// Color at the start edge.
    pub start: Color,
    /// Color at the end edge.
    pub end: Color,
    /// Direction in degrees. `0` runs top to bottom, `90` left to right.
    pub angle: f32,
}

/// Snapshot of a [`RadialGradient`] node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradientSpec {
    /// Color at the center.
    pub start: Color,
    /// Color at the rim.
    pub end: Color,
    /// Offset of the center from the middle of the node, as a fraction of its size.
    pub center_offset: Point,
}

/// Straight-alpha RGBA8 pixels, row-major with a top-left origin.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl ImageData {
    /// Wraps raw pixels, returning `None` when the buffer length does not match the dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    /// Creates an image where every pixel has `color`.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let count = width as usize * height as usize;
        let pixels: Vec<u8> = core::iter::repeat_n(color.to_array(), count)
            .flatten()
            .collect();
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.pixels[offset..offset + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    /// Natural size, one logical pixel per image pixel.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

/// Implements [`CanvasObject`] for a leaf with a `base`, a `min` size and a `style` snapshot.
macro_rules! leaf_object {
    ($ty:ident, $variant:ident) => {
        impl CanvasObject for $ty {
            forward_base_object!(base);

            fn min_size(&self) -> Size {
                *read(&self.min)
            }

            fn resize(&self, size: Size) {
                self.base.resize(size);
            }

            fn kind(&self) -> ObjectKind {
                ObjectKind::Primitive(Primitive::$variant(read(&self.style).clone()))
            }
        }

        impl $ty {
            /// Overrides the minimum size reported to layouts.
            pub fn set_min_size(&self, size: Size) {
                *write(&self.min) = size;
            }
        }
    };
}

/// A rectangle filling its node bounds.
#[derive(Debug)]
pub struct Rectangle {
    base: BaseObject,
    min: RwLock<Size>,
    style: RwLock<RectangleStyle>,
}

impl Rectangle {
    /// Creates a filled rectangle without a stroke.
    #[must_use]
    pub fn new(fill: Color) -> Arc<Self> {
        Self::with_style(RectangleStyle {
            fill,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
            corner_radius: 0.0,
        })
    }

    /// Creates a rectangle with a full style.
    #[must_use]
    pub fn with_style(style: RectangleStyle) -> Arc<Self> {
        Arc::new(Self {
            base: BaseObject::new(),
            min: RwLock::new(Size::zero()),
            style: RwLock::new(style),
        })
    }

    /// Current style.
    #[must_use]
    pub fn style(&self) -> RectangleStyle {
        *read(&self.style)
    }

    /// Changes the fill color.
    pub fn set_fill(&self, fill: Color) {
        write(&self.style).fill = fill;
    }

    /// Changes the stroke.
    pub fn set_stroke(&self, stroke: Color, width: f32) {
        let mut style = write(&self.style);
        style.stroke = stroke;
        style.stroke_width = width.max(0.0);
    }

    /// Changes the corner radius.
    pub fn set_corner_radius(&self, radius: f32) {
        write(&self.style).corner_radius = radius.max(0.0);
    }
}

leaf_object!(Rectangle, Rectangle);

/// A straight line from the node position to `position + size`.
#[derive(Debug)]
pub struct Line {
    base: BaseObject,
    min: RwLock<Size>,
    style: RwLock<LineStyle>,
}

impl Line {
    /// Creates a one pixel wide line.
    #[must_use]
    pub fn new(stroke: Color) -> Arc<Self> {
        Arc::new(Self {
            base: BaseObject::new(),
            min: RwLock::new(Size::zero()),
            style: RwLock::new(LineStyle {
                stroke,
                stroke_width: 1.0,
            }),
        })
    }

    /// Current style.
    #[must_use]
    pub fn style(&self) -> LineStyle {
        *read(&self.style)
    }

    /// Changes the stroke.
    pub fn set_stroke(&self, stroke: Color, width: f32) {
        *write(&self.style) = LineStyle {
            stroke,
            stroke_width: width.max(0.0),
        };
    }
}

leaf_object!(Line, Line);

/// An ellipse inscribed in the node bounds.
#[derive(Debug)]
pub struct Circle {
    base: BaseObject,
    min: RwLock<Size>,
    style: RwLock<CircleStyle>,
}

impl Circle {
    /// Creates a filled circle without a stroke.
    #[must_use]
    pub fn new(fill: Color) -> Arc<Self> {
        Arc::new(Self {
            base: BaseObject::new(),
            min: RwLock::new(Size::zero()),
            style: RwLock::new(CircleStyle {
                fill,
                stroke: Color::TRANSPARENT,
                stroke_width: 0.0,
            }),
        })
    }

    /// Current style.
    #[must_use]
    pub fn style(&self) -> CircleStyle {
        *read(&self.style)
    }

    /// Changes the fill color.
    pub fn set_fill(&self, fill: Color) {
        write(&self.style).fill = fill;
    }

    /// Changes the stroke.
    pub fn set_stroke(&self, stroke: Color, width: f32) {
        let mut style = write(&self.style);
        style.stroke = stroke;
        style.stroke_width = width.max(0.0);
    }
}

leaf_object!(Circle, Circle);

/// A run of text. Its minimum size follows the text metrics.
#[derive(Debug)]
pub struct Text {
    base: BaseObject,
    style: RwLock<TextSpec>,
}

impl Text {
    /// Creates text at the default size.
    #[must_use]
    pub fn new(text: impl Into<String>, color: Color) -> Arc<Self> {
        Arc::new(Self {
            base: BaseObject::new(),
            style: RwLock::new(TextSpec {
                text: text.into(),
                color,
                size: DEFAULT_TEXT_SIZE,
                style: TextStyle::default(),
                align: TextAlign::default(),
            }),
        })
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> String {
        read(&self.style).text.clone()
    }

    /// Replaces the text.
    pub fn set_text(&self, text: impl Into<String>) {
        write(&self.style).text = text.into();
    }

    /// Changes the glyph color.
    pub fn set_color(&self, color: Color) {
        write(&self.style).color = color;
    }

    /// Changes the font size.
    pub fn set_text_size(&self, size: f32) {
        write(&self.style).size = size;
    }

    /// Changes the font style.
    pub fn set_style(&self, style: TextStyle) {
        write(&self.style).style = style;
    }

    /// Changes the alignment.
    pub fn set_align(&self, align: TextAlign) {
        write(&self.style).align = align;
    }
}

impl CanvasObject for Text {
    forward_base_object!(base);

    fn min_size(&self) -> Size {
        let spec = read(&self.style);
        rendered_text_size(&spec.text, spec.size, spec.style).0
    }

    fn resize(&self, size: Size) {
        self.base.resize(size);
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Primitive(Primitive::Text(read(&self.style).clone()))
    }
}

/// A decoded bitmap.
#[derive(Debug)]
pub struct Image {
    base: BaseObject,
    min: RwLock<Size>,
    style: RwLock<ImageSpec>,
}

impl Image {
    /// Creates an image node that stretches `data` over its bounds.
    #[must_use]
    pub fn new(data: ImageData) -> Arc<Self> {
        Self::build(Some(data))
    }

    /// Creates an image node without pixels. It draws nothing.
    #[must_use]
    pub fn empty() -> Arc<Self> {
        Self::build(None)
    }

    fn build(data: Option<ImageData>) -> Arc<Self> {
        Arc::new(Self {
            base: BaseObject::new(),
            min: RwLock::new(Size::zero()),
            style: RwLock::new(ImageSpec {
                data,
                fill: ImageFill::default(),
            }),
        })
    }

    /// Replaces the pixels.
    pub fn set_data(&self, data: Option<ImageData>) {
        write(&self.style).data = data;
    }

    /// Changes the fit mode. [`ImageFill::Original`] also reserves the natural size.
    pub fn set_fill(&self, fill: ImageFill) {
        let mut style = write(&self.style);
        style.fill = fill;
        if fill == ImageFill::Original {
            if let Some(data) = &style.data {
                *write(&self.min) = data.size();
            }
        }
    }
}

leaf_object!(Image, Image);

/// A bitmap produced by a generator at the exact device resolution being drawn.
#[derive(Debug)]
pub struct Raster {
    base: BaseObject,
    min: RwLock<Size>,
    style: RwLock<RasterSpec>,
}

impl Raster {
    /// Creates a raster backed by `generator`.
    #[must_use]
    pub fn new(generator: impl Fn(u32, u32) -> ImageData + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            base: BaseObject::new(),
            min: RwLock::new(Size::zero()),
            style: RwLock::new(RasterSpec {
                generator: Arc::new(generator),
            }),
        })
    }
}

leaf_object!(Raster, Raster);

/// Two-stop linear gradient filling the node bounds.
#[derive(Debug)]
pub struct LinearGradient {
    base: BaseObject,
    min: RwLock<Size>,
    style: RwLock<LinearGradientSpec>,
}

impl LinearGradient {
    /// Gradient running top to bottom.
    #[must_use]
    pub fn vertical(start: Color, end: Color) -> Arc<Self> {
        Self::with_angle(start, end, 0.0)
    }

    /// Gradient running left to right.
    #[must_use]
    pub fn horizontal(start: Color, end: Color) -> Arc<Self> {
        Self::with_angle(start, end, 90.0)
    }

    /// Gradient at an arbitrary angle in degrees.
    #[must_use]
    pub fn with_angle(start: Color, end: Color, angle: f32) -> Arc<Self> {
        Arc::new(Self {
            base: BaseObject::new(),
            min: RwLock::new(Size::zero()),
            style: RwLock::new(LinearGradientSpec { start, end, angle }),
        })
    }
}

leaf_object!(LinearGradient, LinearGradient);

/// Two-stop radial gradient centered in the node bounds.
#[derive(Debug)]
pub struct RadialGradient {
    base: BaseObject,
    min: RwLock<Size>,
    style: RwLock<RadialGradientSpec>,
}

impl RadialGradient {
    /// Creates a centered radial gradient.
    #[must_use]
    pub fn new(start: Color, end: Color) -> Arc<Self> {
        Arc::new(Self {
            base: BaseObject::new(),
            min: RwLock::new(Size::zero()),
            style: RwLock::new(RadialGradientSpec {
                start,
                end,
                center_offset: Point::zero(),
            }),
        })
    }

    /// Moves the center, expressed as a fraction of the node size.
    pub fn set_center_offset(&self, offset: Point) {
        write(&self.style).center_offset = offset;
    }
}

leaf_object!(RadialGradient, RadialGradient);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_data_rejects_wrong_length() {
        assert!(ImageData::new(2, 2, vec![0; 15]).is_none());
        assert!(ImageData::new(2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn filled_image_reports_pixels() {
        let data = ImageData::filled(3, 2, Color::rgb(1, 2, 3));
        assert_eq!(data.pixel(2, 1), Some(Color::rgb(1, 2, 3)));
        assert_eq!(data.pixel(3, 0), None);
    }

    #[test]
    fn kind_snapshots_current_style() {
        let rect = Rectangle::new(Color::WHITE);
        rect.set_fill(Color::BLACK);
        match rect.kind() {
            ObjectKind::Primitive(Primitive::Rectangle(style)) => {
                assert_eq!(style.fill, Color::BLACK);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn text_min_size_follows_metrics() {
        let text = Text::new("abcd", Color::BLACK);
        text.set_text_size(10.0);
        let min = text.min_size();
        assert!((min.width - 24.0).abs() < 1e-4);
        assert!((min.height - 12.0).abs() < 1e-4);
    }

    #[test]
    fn original_image_reserves_natural_size() {
        let image = Image::new(ImageData::filled(5, 7, Color::WHITE));
        assert_eq!(image.min_size(), Size::zero());
        image.set_fill(ImageFill::Original);
        assert_eq!(image.min_size(), Size::new(5.0, 7.0));
    }
}
