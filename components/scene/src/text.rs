//! Text styling and the deterministic metric model used by headless rendering.
//!
//! Real shaping belongs to the font engine of the surrounding toolkit. Headless drivers only need
//! metrics that are stable across machines, so every glyph advances by a fixed fraction of the
//! font size.

use crate::geometry::Size;

/// Horizontal advance of one glyph relative to the font size.
pub const ADVANCE_RATIO: f32 = 0.6;
/// Height of one line relative to the font size.
pub const LINE_HEIGHT_RATIO: f32 = 1.2;
const BOLD_ADVANCE_RATIO: f32 = 1.05;

/// Font style flags for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextStyle {
    /// Heavier weight.
    pub bold: bool,
    /// Slanted glyphs.
    pub italic: bool,
    /// Fixed-pitch family.
    pub monospace: bool,
}

impl TextStyle {
    /// A bold style.
    #[must_use]
    pub const fn bold() -> Self {
        Self {
            bold: true,
            italic: false,
            monospace: false,
        }
    }
}

/// Alignment of text lines within the node bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextAlign {
    /// Start of the line.
    #[default]
    Leading,
    /// Centered.
    Center,
    /// End of the line.
    Trailing,
}

/// Horizontal advance of a single glyph.
#[must_use]
pub fn glyph_advance(size: f32, style: TextStyle) -> f32 {
    let advance = size * ADVANCE_RATIO;
    if style.bold {
        advance * BOLD_ADVANCE_RATIO
    } else {
        advance
    }
}

/// Height of one line of text.
#[must_use]
pub fn line_height(size: f32) -> f32 {
    size * LINE_HEIGHT_RATIO
}

/// Width of a single line (no line breaks) of text.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn line_width(line: &str, size: f32, style: TextStyle) -> f32 {
    line.chars().count() as f32 * glyph_advance(size, style)
}

/// Measures how big `text` would be when drawn and where its first baseline sits.
///
/// Lines are split on `\n`; the empty string still occupies one line.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rendered_text_size(text: &str, size: f32, style: TextStyle) -> (Size, f32) {
    let mut width: f32 = 0.0;
    let mut lines = 0usize;
    for line in text.split('\n') {
        width = width.max(line_width(line, size, style));
        lines += 1;
    }
    let height = lines as f32 * line_height(size);
    (Size::new(width, height), size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiline_text_takes_widest_line() {
        let (size, baseline) = rendered_text_size("ab\nabcd", 10.0, TextStyle::default());
        assert!((size.width - 24.0).abs() < 1e-4, "width was {}", size.width);
        assert!((size.height - 24.0).abs() < 1e-4, "height was {}", size.height);
        assert!((baseline - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_text_is_one_line_tall() {
        let (size, _) = rendered_text_size("", 10.0, TextStyle::default());
        assert!(size.width.abs() < f32::EPSILON);
        assert!((size.height - 12.0).abs() < 1e-4);
    }

    #[test]
    fn bold_is_wider() {
        let (regular, _) = rendered_text_size("abc", 10.0, TextStyle::default());
        let (bold, _) = rendered_text_size("abc", 10.0, TextStyle::bold());
        assert!(bold.width > regular.width);
    }
}
