//! Layout strategies used by [`Container`](crate::Container).

use core::fmt::Debug;

use crate::geometry::{Point, Size};
use crate::object::ObjectRef;

/// Positions and sizes the children of a container.
pub trait Layout: Debug + Send + Sync {
    /// Arranges `objects` within `size`.
    fn layout(&self, objects: &[ObjectRef], size: Size);

    /// Smallest size able to host `objects`.
    fn min_size(&self, objects: &[ObjectRef]) -> Size;
}

/// Every visible child fills the whole container.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackLayout;

impl Layout for StackLayout {
    fn layout(&self, objects: &[ObjectRef], size: Size) {
        for child in objects.iter().filter(|child| child.visible()) {
            child.move_to(Point::zero());
            child.resize(size);
        }
    }

    fn min_size(&self, objects: &[ObjectRef]) -> Size {
        objects
            .iter()
            .filter(|child| child.visible())
            .fold(Size::zero(), |acc, child| acc.max(child.min_size()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

fn stack_along(axis: Axis, spacing: f32, objects: &[ObjectRef], size: Size) {
    let mut cursor = 0.0;
    for child in objects.iter().filter(|child| child.visible()) {
        let min = child.min_size();
        match axis {
            Axis::Vertical => {
                child.move_to(Point::new(0.0, cursor));
                child.resize(Size::new(size.width, min.height));
                cursor += min.height + spacing;
            }
            Axis::Horizontal => {
                child.move_to(Point::new(cursor, 0.0));
                child.resize(Size::new(min.width, size.height));
                cursor += min.width + spacing;
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn min_along(axis: Axis, spacing: f32, objects: &[ObjectRef]) -> Size {
    let mut total = Size::zero();
    let mut visible = 0usize;
    for child in objects.iter().filter(|child| child.visible()) {
        let min = child.min_size();
        visible += 1;
        match axis {
            Axis::Vertical => {
                total.width = total.width.max(min.width);
                total.height += min.height;
            }
            Axis::Horizontal => {
                total.width += min.width;
                total.height = total.height.max(min.height);
            }
        }
    }
    let gaps = visible.saturating_sub(1) as f32 * spacing;
    match axis {
        Axis::Vertical => total.height += gaps,
        Axis::Horizontal => total.width += gaps,
    }
    total
}

/// Stacks visible children top to bottom, each at its minimum height and the full width.
#[derive(Debug, Clone, Copy)]
pub struct VBoxLayout {
    spacing: f32,
}

impl VBoxLayout {
    /// Creates a vertical box separating children by `spacing`.
    #[must_use]
    pub const fn new(spacing: f32) -> Self {
        Self { spacing }
    }
}

impl Layout for VBoxLayout {
    fn layout(&self, objects: &[ObjectRef], size: Size) {
        stack_along(Axis::Vertical, self.spacing, objects, size);
    }

    fn min_size(&self, objects: &[ObjectRef]) -> Size {
        min_along(Axis::Vertical, self.spacing, objects)
    }
}

/// Lines visible children up left to right, each at its minimum width and the full height.
#[derive(Debug, Clone, Copy)]
pub struct HBoxLayout {
    spacing: f32,
}

impl HBoxLayout {
    /// Creates a horizontal box separating children by `spacing`.
    #[must_use]
    pub const fn new(spacing: f32) -> Self {
        Self { spacing }
    }
}

impl Layout for HBoxLayout {
    fn layout(&self, objects: &[ObjectRef], size: Size) {
        stack_along(Axis::Horizontal, self.spacing, objects, size);
    }

    fn min_size(&self, objects: &[ObjectRef]) -> Size {
        min_along(Axis::Horizontal, self.spacing, objects)
    }
}
