//! Depth-first traversal of object trees.
//!
//! The walkers accumulate absolute positions and the active clip rectangle while descending.
//! `before` runs pre-order and may cancel the whole walk by returning `true`. `after` runs
//! post-order for every node whose `before` returned `false`, including ancestors of the node
//! that cancelled.

use crate::geometry::{Point, Rect, Size};
use crate::object::{ObjectId, ObjectRef};

const UNBOUNDED: f32 = 1.0e9;

/// The clip used at the root of a walk, large enough to never restrict drawing.
#[must_use]
pub const fn unbounded_clip() -> Rect {
    Rect::new(
        Point::new(-UNBOUNDED / 2.0, -UNBOUNDED / 2.0),
        Size::new(UNBOUNDED, UNBOUNDED),
    )
}

/// Walks `root` and its visible descendants. Hidden nodes prune their subtree.
///
/// Returns `true` when `before` cancelled the walk.
pub fn walk_visible_object_tree<B, A>(root: &ObjectRef, mut before: B, mut after: A) -> bool
where
    B: FnMut(&ObjectRef, Point, Rect) -> bool,
    A: FnMut(&ObjectRef, Point, Rect),
{
    walk(root, true, Point::zero(), unbounded_clip(), &mut before, &mut after)
}

/// Walks `root` and every descendant, visible or not.
///
/// Returns `true` when `before` cancelled the walk.
pub fn walk_complete_object_tree<B, A>(root: &ObjectRef, mut before: B, mut after: A) -> bool
where
    B: FnMut(&ObjectRef, Point, Rect) -> bool,
    A: FnMut(&ObjectRef, Point, Rect),
{
    walk(root, false, Point::zero(), unbounded_clip(), &mut before, &mut after)
}

fn walk<B, A>(
    object: &ObjectRef,
    require_visible: bool,
    offset: Point,
    clip: Rect,
    before: &mut B,
    after: &mut A,
) -> bool
where
    B: FnMut(&ObjectRef, Point, Rect) -> bool,
    A: FnMut(&ObjectRef, Point, Rect),
{
    if require_visible && !object.visible() {
        return false;
    }

    let position = offset + object.position();
    let clip = if object.is_scrollable() {
        clip.intersect(&Rect::new(position, object.size()))
    } else {
        clip
    };

    if before(object, position, clip) {
        return true;
    }

    let mut cancelled = false;
    for child in object.children() {
        if walk(&child, require_visible, position, clip, before, after) {
            cancelled = true;
            break;
        }
    }

    after(object, position, clip);
    cancelled
}

/// Absolute position of the node with `id` within `trees`, searched in order.
#[must_use]
pub fn absolute_position_for_object(id: ObjectId, trees: &[ObjectRef]) -> Option<Point> {
    let mut found = None;
    for tree in trees {
        walk_complete_object_tree(
            tree,
            |object, position, _| {
                if object.id() == id {
                    found = Some(position);
                    return true;
                }
                false
            },
            |_, _, _| {},
        );
        if found.is_some() {
            break;
        }
    }
    found
}

/// Lays out `root` at `size` and collects it with every descendant in pre-order.
///
/// Widgets arrange their children through their renderer and containers through their layout.
/// Descendants are laid out at their own current size. The result is the hit-test order, parents
/// before children.
#[must_use]
pub fn layout_and_collect(root: &ObjectRef, size: Size) -> Vec<ObjectRef> {
    let mut objects = Vec::new();
    collect(&mut objects, root, size);
    objects
}

/// Lays out `root` at `size` and every descendant at its own current size.
pub fn layout_tree(root: &ObjectRef, size: Size) {
    root.layout_children(size);
    for child in root.children() {
        let child_size = child.size();
        layout_tree(&child, child_size);
    }
}

fn collect(objects: &mut Vec<ObjectRef>, object: &ObjectRef, size: Size) {
    objects.push(object.clone());
    object.layout_children(size);
    for child in object.children() {
        let child_size = child.size();
        collect(objects, &child, child_size);
    }
}
