//! Geometry primitives expressed in logical pixels.
//!
//! Every scene node reports its position and size with these types. Drivers convert them into
//! device pixels by multiplying with the canvas scale.

use core::ops::{Add, Sub};

/// Two-dimensional size expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in logical pixels.
    pub width: f32,
    /// Height in logical pixels.
    pub height: f32,
}

impl Size {
    /// Creates a new [`Size`] using the provided dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Creates a [`Size`] whose width and height are both `side`.
    #[must_use]
    pub const fn square(side: f32) -> Self {
        Self::new(side, side)
    }

    /// Creates a [`Size`] with zero width and height.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Returns the component-wise maximum of both sizes.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Returns the component-wise minimum of both sizes.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Rounds both components up to the next whole logical pixel.
    #[must_use]
    pub fn ceil(self) -> Self {
        Self::new(self.width.ceil(), self.height.ceil())
    }

    /// Whether either component is zero or negative.
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Add for Size {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.width + rhs.width, self.height + rhs.height)
    }
}

impl Sub for Size {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.width - rhs.width, self.height - rhs.height)
    }
}

/// Coordinate relative to the parent node (or absolute, once offsets are accumulated).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Horizontal position in logical pixels.
    pub x: f32,
    /// Vertical position in logical pixels.
    pub y: f32,
}

impl Point {
    /// Creates a new [`Point`].
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates a [`Point`] at the origin (0, 0).
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Creates a [`Point`] offset by `offset` on both axes.
    #[must_use]
    pub const fn square(offset: f32) -> Self {
        Self::new(offset, offset)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Rectangle origin.
    pub origin: Point,
    /// Rectangle size.
    pub size: Size,
}

impl Rect {
    /// Creates a new [`Rect`].
    #[must_use]
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Returns the minimum X coordinate of the rectangle.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.origin.x
    }

    /// Returns the minimum Y coordinate of the rectangle.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.origin.y
    }

    /// Returns the maximum X coordinate of the rectangle.
    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Returns the maximum Y coordinate of the rectangle.
    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Returns the overlapping area of both rectangles.
    ///
    /// Disjoint rectangles produce a zero-sized rectangle anchored at the clamped origin.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let x = self.x().max(other.x());
        let y = self.y().max(other.y());
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        Self::new(
            Point::new(x, y),
            Size::new((max_x - x).max(0.0), (max_y - y).max(0.0)),
        )
    }

    /// Whether `point` lies inside the rectangle (inclusive of the top-left edge).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x() && point.y >= self.y() && point.x < self.max_x() && point.y < self.max_y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_rounds_each_component_up() {
        assert_eq!(Size::new(10.2, 5.1).ceil(), Size::new(11.0, 6.0));
        assert_eq!(Size::new(10.0, 5.0).ceil(), Size::new(10.0, 5.0));
    }

    #[test]
    fn intersect_of_disjoint_rects_is_empty() {
        let a = Rect::new(Point::zero(), Size::square(10.0));
        let b = Rect::new(Point::new(20.0, 20.0), Size::square(5.0));
        assert!(a.intersect(&b).size.is_degenerate());
    }

    #[test]
    fn intersect_keeps_overlap() {
        let a = Rect::new(Point::zero(), Size::square(10.0));
        let b = Rect::new(Point::new(5.0, 2.0), Size::new(10.0, 4.0));
        let overlap = a.intersect(&b);
        assert_eq!(overlap.origin, Point::new(5.0, 2.0));
        assert_eq!(overlap.size, Size::new(5.0, 4.0));
    }
}
