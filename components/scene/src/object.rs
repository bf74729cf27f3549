//! The node contract every scene-graph element implements.

use core::fmt::Debug;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::geometry::{Point, Size};
use crate::primitive::Primitive;

/// Shared handle to a node of the scene graph.
pub type ObjectRef = Arc<dyn CanvasObject>;

/// Identifier for a scene node, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocates a fresh identifier.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw value backing this identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What a node is, from a painter's or a layout pass's point of view.
#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// Leaf drawable with a snapshot of its current style.
    Primitive(Primitive),
    /// Generic container, children are positioned by an optional layout strategy.
    Container,
    /// Composite widget, children are owned and positioned by its renderer.
    Widget,
    /// Anything else. Painters skip it without error.
    Unknown,
}

/// Trait implemented by every node stored in a canvas.
///
/// All methods take `&self`: nodes are shared between the canvas, the driver and the caller, so
/// implementations keep their mutable state behind locks.
pub trait CanvasObject: Debug + Send + Sync {
    /// Stable identity of this node.
    fn id(&self) -> ObjectId;

    /// The smallest size this node can be drawn at.
    fn min_size(&self) -> Size;

    /// Current size.
    fn size(&self) -> Size;

    /// Current position relative to the parent.
    fn position(&self) -> Point;

    /// Changes the size of the node.
    fn resize(&self, size: Size);

    /// Moves the node relative to its parent.
    fn move_to(&self, position: Point);

    /// Whether the node (and therefore its subtree) should be drawn.
    fn visible(&self) -> bool;

    /// Makes the node visible.
    fn show(&self);

    /// Hides the node.
    fn hide(&self);

    /// Asks the node to update itself after external state changed.
    fn refresh(&self) {}

    /// Reports what kind of node this is.
    fn kind(&self) -> ObjectKind;

    /// Child nodes in paint order. Leaves have none.
    fn children(&self) -> Vec<ObjectRef> {
        Vec::new()
    }

    /// Positions the children within `size`.
    fn layout_children(&self, _size: Size) {}

    /// Clip capability: content of scrollable nodes is restricted to their bounds.
    fn is_scrollable(&self) -> bool {
        false
    }

    /// Pop-ups reposition themselves when notified instead of being resized by their canvas.
    fn is_popup(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy)]
struct ObjectState {
    position: Point,
    size: Size,
    hidden: bool,
}

/// Geometry and visibility bookkeeping shared by the concrete node types.
#[derive(Debug)]
pub struct BaseObject {
    id: ObjectId,
    state: RwLock<ObjectState>,
}

impl Default for BaseObject {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseObject {
    /// Creates a visible, zero-sized node at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ObjectId::next(),
            state: RwLock::new(ObjectState {
                position: Point::zero(),
                size: Size::zero(),
                hidden: false,
            }),
        }
    }

    /// Returns the node identity.
    #[must_use]
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns the current size.
    #[must_use]
    pub fn size(&self) -> Size {
        read(&self.state).size
    }

    /// Returns the current position.
    #[must_use]
    pub fn position(&self) -> Point {
        read(&self.state).position
    }

    /// Stores a new size, returning `false` when it did not change.
    pub fn resize(&self, size: Size) -> bool {
        let mut state = write(&self.state);
        if state.size == size {
            return false;
        }
        state.size = size;
        true
    }

    /// Stores a new position.
    pub fn move_to(&self, position: Point) {
        write(&self.state).position = position;
    }

    /// Whether the node is visible.
    #[must_use]
    pub fn visible(&self) -> bool {
        !read(&self.state).hidden
    }

    /// Marks the node visible.
    pub fn show(&self) {
        write(&self.state).hidden = false;
    }

    /// Marks the node hidden.
    pub fn hide(&self) {
        write(&self.state).hidden = true;
    }
}

/// Implements the geometry half of [`CanvasObject`] by forwarding to a [`BaseObject`] field.
#[macro_export]
macro_rules! forward_base_object {
    ($field:ident) => {
        fn id(&self) -> $crate::ObjectId {
            self.$field.id()
        }

        fn size(&self) -> $crate::Size {
            self.$field.size()
        }

        fn position(&self) -> $crate::Point {
            self.$field.position()
        }

        fn move_to(&self, position: $crate::Point) {
            self.$field.move_to(position);
        }

        fn visible(&self) -> bool {
            self.$field.visible()
        }

        fn show(&self) {
            self.$field.show();
        }

        fn hide(&self) {
            self.$field.hide();
        }
    };
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = BaseObject::new();
        let b = BaseObject::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn resize_reports_change() {
        let base = BaseObject::new();
        assert!(base.resize(Size::square(4.0)));
        assert!(!base.resize(Size::square(4.0)), "same size must not count as a change");
    }
}
