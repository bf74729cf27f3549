//! Generic grouping node.

use std::sync::{Arc, RwLock};

use crate::forward_base_object;
use crate::geometry::Size;
use crate::layout::Layout;
use crate::object::{BaseObject, CanvasObject, ObjectId, ObjectKind, ObjectRef, read, write};

/// A list of children positioned by an optional [`Layout`].
///
/// Without a layout, children keep whatever geometry the caller gave them.
#[derive(Debug)]
pub struct Container {
    base: BaseObject,
    objects: RwLock<Vec<ObjectRef>>,
    layout: Option<Box<dyn Layout>>,
}

impl Container {
    /// Creates a container whose children are arranged by `layout`.
    #[must_use]
    pub fn new(layout: impl Layout + 'static, objects: Vec<ObjectRef>) -> Arc<Self> {
        Arc::new(Self {
            base: BaseObject::new(),
            objects: RwLock::new(objects),
            layout: Some(Box::new(layout)),
        })
    }

    /// Creates a container that never moves its children.
    #[must_use]
    pub fn without_layout(objects: Vec<ObjectRef>) -> Arc<Self> {
        Arc::new(Self {
            base: BaseObject::new(),
            objects: RwLock::new(objects),
            layout: None,
        })
    }

    /// Snapshot of the children in paint order.
    #[must_use]
    pub fn objects(&self) -> Vec<ObjectRef> {
        read(&self.objects).clone()
    }

    /// Appends a child and lays the container out again.
    pub fn add(&self, object: ObjectRef) {
        write(&self.objects).push(object);
        self.layout_children(self.size());
    }

    /// Removes the child with `id`, returning whether it was present.
    pub fn remove(&self, id: ObjectId) -> bool {
        let removed = {
            let mut objects = write(&self.objects);
            let before = objects.len();
            objects.retain(|object| object.id() != id);
            objects.len() != before
        };
        if removed {
            self.layout_children(self.size());
        }
        removed
    }
}

impl CanvasObject for Container {
    forward_base_object!(base);

    fn min_size(&self) -> Size {
        let objects = self.objects();
        match &self.layout {
            Some(layout) => layout.min_size(&objects),
            None => objects
                .iter()
                .fold(Size::zero(), |acc, child| acc.max(child.min_size())),
        }
    }

    fn resize(&self, size: Size) {
        self.base.resize(size);
        self.layout_children(size);
    }

    fn refresh(&self) {
        self.layout_children(self.size());
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Container
    }

    fn children(&self) -> Vec<ObjectRef> {
        self.objects()
    }

    fn layout_children(&self, size: Size) {
        if let Some(layout) = &self.layout {
            let objects = self.objects();
            layout.layout(&objects, size);
        }
    }
}
