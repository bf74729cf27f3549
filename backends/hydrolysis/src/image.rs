//! Captured frames in straight RGBA with PNG interchange.

use std::io::{Read, Write};

use thiserror::Error;
use waterui_scene::{Color, ImageData};

/// Errors raised while converting or persisting captured frames.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Pixel buffer length does not match `width * height * 4`.
    #[error("pixel buffer of {len} bytes does not match {width}x{height}")]
    Dimensions {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Actual length of the buffer.
        len: usize,
    },
    /// PNG encoding failed.
    #[error("failed to encode png: {0}")]
    Encode(#[from] png::EncodingError),
    /// PNG decoding failed.
    #[error("failed to decode png: {0}")]
    Decode(#[from] png::DecodingError),
    /// The PNG uses a pixel layout that cannot be represented.
    #[error("unsupported png layout {0:?}")]
    UnsupportedLayout(png::ColorType),
}

/// A rendered frame: row-major straight RGBA8 with a top-left origin.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl core::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl CapturedImage {
    /// Wraps raw pixels.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Dimensions`] when the buffer length does not match.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        if pixels.len() != width as usize * height as usize * 4 {
            return Err(ImageError::Dimensions {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
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
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at `(x, y)`, or `None` outside the frame.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.pixels[offset..offset + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    /// Iterates over every pixel in row-major order.
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.pixels
            .chunks_exact(4)
            .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
    }

    /// Converts the frame into image data that can be shown by an image node.
    #[must_use]
    pub fn to_image_data(&self) -> Option<ImageData> {
        ImageData::new(self.width, self.height, self.pixels.clone())
    }

    /// Writes the frame as an 8-bit RGBA PNG.
    ///
    /// # Errors
    ///
    /// Propagates encoder failures, including I/O errors of `writer`.
    pub fn write_png<W: Write>(&self, writer: W) -> Result<(), ImageError> {
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        writer.finish()?;
        Ok(())
    }

    /// Encodes the frame into an in-memory PNG.
    ///
    /// # Errors
    ///
    /// Propagates encoder failures.
    pub fn encode_png(&self) -> Result<Vec<u8>, ImageError> {
        let mut bytes = Vec::new();
        self.write_png(&mut bytes)?;
        Ok(bytes)
    }

    /// Decodes a PNG, expanding palette, grayscale and 16-bit images to RGBA8.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed input.
    pub fn read_png<R: Read>(reader: R) -> Result<Self, ImageError> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder.read_info()?;
        let mut buffer = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buffer)?;
        buffer.truncate(info.buffer_size());

        let pixels = match info.color_type {
            png::ColorType::Rgba => buffer,
            png::ColorType::Rgb => buffer
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 0xff])
                .collect(),
            png::ColorType::GrayscaleAlpha => buffer
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
            png::ColorType::Grayscale => buffer.iter().flat_map(|&v| [v, v, v, 0xff]).collect(),
            other => return Err(ImageError::UnsupportedLayout(other)),
        };
        Self::from_rgba(info.width, info.height, pixels)
    }

    /// Decodes an in-memory PNG.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed input.
    pub fn decode_png(bytes: &[u8]) -> Result<Self, ImageError> {
        Self::read_png(bytes)
    }
}
