//! Theme tokens queried by canvases, widgets and painters.
//!
//! A theme is a bundle of color tokens and size metrics. The headless driver never owns the
//! theme system, it only reads the handful of tokens it needs to lay out and clear a canvas.

use crate::color::Color;

/// Default text size in logical pixels.
pub const DEFAULT_TEXT_SIZE: f32 = 14.0;
/// Default padding unit in logical pixels.
pub const DEFAULT_PADDING: f32 = 4.0;

/// Top-level theme data grouped into colors and metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    colors: ThemeColors,
    metrics: ThemeMetrics,
}

impl Theme {
    /// Creates a new theme from color and metric groups.
    #[must_use]
    pub const fn new(colors: ThemeColors, metrics: ThemeMetrics) -> Self {
        Self { colors, metrics }
    }

    /// Returns the light theme.
    #[must_use]
    pub const fn light() -> Self {
        Self::new(ThemeColors::light(), ThemeMetrics::standard())
    }

    /// Returns the dark theme.
    #[must_use]
    pub const fn dark() -> Self {
        Self::new(ThemeColors::dark(), ThemeMetrics::standard())
    }

    /// Accesses the color palette.
    #[must_use]
    pub const fn colors(&self) -> &ThemeColors {
        &self.colors
    }

    /// Accesses the size metrics.
    #[must_use]
    pub const fn metrics(&self) -> &ThemeMetrics {
        &self.metrics
    }

    /// Obtains mutable access to the color palette.
    pub const fn colors_mut(&mut self) -> &mut ThemeColors {
        &mut self.colors
    }

    /// Obtains mutable access to the metrics.
    pub const fn metrics_mut(&mut self) -> &mut ThemeMetrics {
        &mut self.metrics
    }

    /// Canvas background.
    #[must_use]
    pub const fn background(&self) -> Color {
        self.colors.background
    }

    /// Default text and icon color.
    #[must_use]
    pub const fn foreground(&self) -> Color {
        self.colors.foreground
    }

    /// Padding unit.
    #[must_use]
    pub const fn padding(&self) -> f32 {
        self.metrics.padding
    }

    /// Default text size.
    #[must_use]
    pub const fn text_size(&self) -> f32 {
        self.metrics.text_size
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Color palette used by [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    /// Canvas background.
    pub background: Color,
    /// Text and icon color.
    pub foreground: Color,
    /// Accent color.
    pub primary: Color,
    /// Background of floating surfaces such as pop-ups and the menu bar.
    pub overlay_background: Color,
    /// Separator lines and debug outlines.
    pub separator: Color,
}

impl ThemeColors {
    /// Light palette.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            background: Color::hex(0xffffff),
            foreground: Color::hex(0x212121),
            primary: Color::hex(0x2196f3),
            overlay_background: Color::hex(0xf5f5f5),
            separator: Color::hex(0xe0e0e0),
        }
    }

    /// Dark palette.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            background: Color::hex(0x171717),
            foreground: Color::hex(0xf3f3f3),
            primary: Color::hex(0x2196f3),
            overlay_background: Color::hex(0x262626),
            separator: Color::hex(0x000000),
        }
    }
}

/// Size metrics used by [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeMetrics {
    /// Padding unit around canvas content and between stacked children.
    pub padding: f32,
    /// Default text size.
    pub text_size: f32,
}

impl ThemeMetrics {
    /// The standard metrics.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            text_size: DEFAULT_TEXT_SIZE,
        }
    }
}
