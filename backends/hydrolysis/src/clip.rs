//! Bookkeeping for nested clip regions.

use waterui_scene::{Point, Rect, Size};

/// One clip frame, an absolute rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipItem {
    rect: Rect,
}

impl ClipItem {
    /// The clipped area.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }
}

/// Stack of clip frames tied to the nesting of scrollable nodes.
///
/// Frames are stored exactly as pushed. The top of the stack is the active clip.
#[derive(Debug, Clone, Default)]
pub struct ClipStack {
    items: Vec<ClipItem>,
}

impl ClipStack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Pushes a frame covering `size` at `position` and returns it.
    pub fn push(&mut self, position: Point, size: Size) -> ClipItem {
        let item = ClipItem {
            rect: Rect::new(position, size),
        };
        self.items.push(item);
        item
    }

    /// Removes the top frame.
    pub fn pop(&mut self) -> Option<ClipItem> {
        self.items.pop()
    }

    /// The active frame, or `None` when nothing is clipped.
    #[must_use]
    pub fn top(&self) -> Option<ClipItem> {
        self.items.last().copied()
    }

    /// Number of frames on the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no frame is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
