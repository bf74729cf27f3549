//! The paintable surface of a headless window.
//!
//! A [`Canvas`] owns one content tree, an optional menu bar and a stack of overlays. It keeps the
//! content sized and positioned under the padding and menu rules, tracks whether a repaint is
//! due and drives its painter through a walk of every tree.

use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};

use hydrolysis::{CapturedImage, ClipStack, PaintSurface, Painter, SurfaceInfo};
use tracing::{debug, trace};
use waterui_scene::walk::walk_complete_object_tree;
use waterui_scene::{
    ObjectId, ObjectRef, OverlayHost, Point, Rectangle, Size, Theme, absolute_position_for_object,
    layout_tree,
};

use crate::cache::RenderCache;
use crate::config::HeadlessConfig;
use crate::sync::{lock, read, write};

/// Identifier of a canvas, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanvasId(u64);

impl CanvasId {
    /// Allocates a fresh identifier.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

type KeyHandler = Arc<dyn Fn(&str) + Send + Sync>;
type RuneHandler = Arc<dyn Fn(char) + Send + Sync>;

#[derive(Default)]
struct InputHandlers {
    key: Option<KeyHandler>,
    rune: Option<RuneHandler>,
}

/// Keyboard focus within the content tree.
#[derive(Debug, Clone, Copy)]
struct FocusState {
    root: ObjectId,
    focused: Option<ObjectId>,
}

impl FocusState {
    const fn new(root: ObjectId) -> Self {
        Self {
            root,
            focused: None,
        }
    }
}

struct CanvasState {
    content: ObjectRef,
    overlays: Vec<ObjectRef>,
    menu: Option<ObjectRef>,
    padded: bool,
    size: Size,
    scale: f32,
    texture_scale: f32,
    debug: bool,
    transparent: bool,
    painter: Option<Arc<dyn Painter>>,
    focus: FocusState,
}

/// A surface holding a content tree, a menu bar and overlays.
pub struct Canvas {
    id: CanvasId,
    state: RwLock<CanvasState>,
    dirty: AtomicBool,
    rendered: Mutex<Option<CapturedImage>>,
    theme: Arc<Theme>,
    cache: Arc<RenderCache>,
    pending_free: Mutex<Vec<ObjectId>>,
    handlers: RwLock<InputHandlers>,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = read(&self.state);
        f.debug_struct("Canvas")
            .field("id", &self.id)
            .field("size", &state.size)
            .field("scale", &state.scale)
            .field("padded", &state.padded)
            .field("overlays", &state.overlays.len())
            .field("dirty", &self.dirty.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Canvas {
    /// A standalone canvas without a painter. [`Canvas::capture`] always returns `None`.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Self::standalone(None, false)
    }

    /// A standalone canvas rendered by `painter`.
    #[must_use]
    pub fn with_painter(painter: Arc<dyn Painter>) -> Arc<Self> {
        Self::standalone(Some(painter), false)
    }

    /// A standalone canvas rendered by `painter` without a background flood.
    #[must_use]
    pub fn transparent_with_painter(painter: Arc<dyn Painter>) -> Arc<Self> {
        Self::standalone(Some(painter), true)
    }

    fn standalone(painter: Option<Arc<dyn Painter>>, transparent: bool) -> Arc<Self> {
        let config = HeadlessConfig::default();
        let theme = Arc::new(config.theme());
        Self::create(&config, theme, Arc::new(RenderCache::new()), painter, transparent)
    }

    pub(crate) fn create(
        config: &HeadlessConfig,
        theme: Arc<Theme>,
        cache: Arc<RenderCache>,
        painter: Option<Arc<dyn Painter>>,
        transparent: bool,
    ) -> Arc<Self> {
        let content: ObjectRef = Rectangle::new(theme.background());
        if let Some(painter) = &painter {
            painter.init();
        }
        let canvas = Arc::new(Self {
            id: CanvasId::next(),
            state: RwLock::new(CanvasState {
                focus: FocusState::new(content.id()),
                content,
                overlays: Vec::new(),
                menu: None,
                padded: config.padded,
                size: config.canvas_size,
                scale: config.scale,
                texture_scale: config.texture_scale,
                debug: config.debug,
                transparent,
                painter,
            }),
            dirty: AtomicBool::new(false),
            rendered: Mutex::new(None),
            theme,
            cache,
            pending_free: Mutex::new(Vec::new()),
            handlers: RwLock::new(InputHandlers::default()),
        });
        canvas.resize(config.canvas_size);
        canvas
    }

    /// Identity of the canvas.
    #[must_use]
    pub const fn id(&self) -> CanvasId {
        self.id
    }

    /// Theme the canvas paints with.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Handle under which pop-ups find the area they may occupy.
    #[must_use]
    pub fn overlay_host(self: &Arc<Self>) -> Weak<dyn OverlayHost> {
        let host: Weak<Self> = Arc::downgrade(self);
        host
    }

    /// The content root.
    #[must_use]
    pub fn content(&self) -> ObjectRef {
        read(&self.state).content.clone()
    }

    /// Replaces the content root and grows the canvas to fit it.
    ///
    /// The previous tree is queued for release by the painter.
    pub fn set_content(&self, content: ObjectRef) {
        content.resize(content.min_size());
        let new_size = self.size().max(self.canvas_size(content.min_size()));

        let previous = {
            let mut state = write(&self.state);
            state.focus = FocusState::new(content.id());
            core::mem::replace(&mut state.content, content)
        };
        self.queue_free(&previous);

        self.resize(new_size);
        self.set_dirty();
    }

    /// Resizes the canvas.
    ///
    /// The stored size is rounded up to whole units. Overlays receive the requested size, except
    /// pop-ups, which are refreshed so they can reposition themselves.
    pub fn resize(&self, size: Size) {
        let nearest = size.ceil().max(Size::zero());
        let (changed, overlays) = {
            let mut state = write(&self.state);
            let changed = state.size != nearest;
            state.size = nearest;
            (changed, state.overlays.clone())
        };

        for overlay in overlays {
            if overlay.is_popup() {
                overlay.refresh();
            } else {
                overlay.resize(size);
            }
        }

        let content = self.content();
        content.resize(self.content_size(nearest));
        content.move_to(self.content_pos());

        let menu = read(&self.state).menu.clone();
        if let Some(menu) = menu {
            menu.refresh();
            menu.move_to(Point::zero());
            menu.resize(Size::new(nearest.width, menu.min_size().height));
        }

        if changed {
            debug!(
                canvas = self.id.0,
                width = nearest.width,
                height = nearest.height,
                "canvas resized"
            );
            self.set_dirty();
        }
    }

    /// Current logical size.
    #[must_use]
    pub fn size(&self) -> Size {
        read(&self.state).size
    }

    /// Smallest size that hosts the content at its minimum, with padding and menu.
    #[must_use]
    pub fn min_size(&self) -> Size {
        let content = self.content();
        self.canvas_size(content.min_size())
    }

    /// Whether the content is inset by the theme padding.
    #[must_use]
    pub fn padded(&self) -> bool {
        read(&self.state).padded
    }

    /// Switches padding and moves the content to its new position.
    pub fn set_padded(&self, padded: bool) {
        let content = {
            let mut state = write(&self.state);
            if state.padded == padded {
                return;
            }
            state.padded = padded;
            state.content.clone()
        };
        content.move_to(self.content_pos());
        self.set_dirty();
    }

    /// Output scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        read(&self.state).scale
    }

    /// Changes the output scale.
    pub fn set_scale(&self, scale: f32) {
        write(&self.state).scale = scale;
        self.set_dirty();
    }

    /// Extra scale of the backing texture.
    #[must_use]
    pub fn texture_scale(&self) -> f32 {
        read(&self.state).texture_scale
    }

    /// Changes the texture scale.
    pub fn set_texture_scale(&self, scale: f32) {
        write(&self.state).texture_scale = scale;
        self.set_dirty();
    }

    /// Whether the background flood is skipped.
    #[must_use]
    pub fn transparent(&self) -> bool {
        read(&self.state).transparent
    }

    /// The painter, if one is attached.
    #[must_use]
    pub fn painter(&self) -> Option<Arc<dyn Painter>> {
        read(&self.state).painter.clone()
    }

    /// Attaches or removes the painter.
    pub fn set_painter(&self, painter: Option<Arc<dyn Painter>>) {
        if let Some(painter) = &painter {
            painter.init();
        }
        write(&self.state).painter = painter;
        self.set_dirty();
    }

    /// Device pixel holding the logical `position`, rounding half away from zero.
    #[must_use]
    pub fn pixel_coordinate_for_position(&self, position: Point) -> (i32, i32) {
        let info = self.surface_info();
        (info.to_device(position.x), info.to_device(position.y))
    }

    /// Canvas size needed to host content of size `content`.
    #[must_use]
    pub fn canvas_size(&self, content: Size) -> Size {
        let padding = self.padding();
        Size::new(
            content.width + padding * 2.0,
            content.height + self.menu_height() + padding * 2.0,
        )
    }

    /// Where the content is placed.
    #[must_use]
    pub fn content_pos(&self) -> Point {
        let padding = self.padding();
        Point::new(padding, self.menu_height() + padding)
    }

    /// Space left for content on a canvas of size `canvas`.
    #[must_use]
    pub fn content_size(&self, canvas: Size) -> Size {
        let padding = self.padding();
        Size::new(
            canvas.width - padding * 2.0,
            canvas.height - self.menu_height() - padding * 2.0,
        )
        .max(Size::zero())
    }

    /// Height taken by the menu bar, zero without one.
    #[must_use]
    pub fn menu_height(&self) -> f32 {
        let menu = read(&self.state).menu.clone();
        menu.map_or(0.0, |menu| menu.min_size().height)
    }

    fn padding(&self) -> f32 {
        if self.padded() { self.theme.padding() } else { 0.0 }
    }

    /// The menu bar, if any.
    #[must_use]
    pub fn menu(&self) -> Option<ObjectRef> {
        read(&self.state).menu.clone()
    }

    /// Installs or removes the menu bar and lays the canvas out again.
    pub fn set_menu(&self, menu: Option<ObjectRef>) {
        let previous = core::mem::replace(&mut write(&self.state).menu, menu);
        if let Some(previous) = previous {
            self.queue_free(&previous);
        }
        self.resize(self.size().max(self.min_size()));
        self.set_dirty();
    }

    /// Places `overlay` on top of the stack.
    ///
    /// Pop-ups position themselves, anything else covers the whole canvas.
    pub fn add_overlay(&self, overlay: ObjectRef) {
        if overlay.is_popup() {
            overlay.refresh();
        } else {
            overlay.move_to(Point::zero());
            overlay.resize(self.size());
        }
        write(&self.state).overlays.push(overlay);
        self.set_dirty();
    }

    /// Removes the overlay with `id`. Returns `false` when it is not on the stack.
    pub fn remove_overlay(&self, id: ObjectId) -> bool {
        let removed = {
            let mut state = write(&self.state);
            let index = state.overlays.iter().position(|overlay| overlay.id() == id);
            index.map(|index| state.overlays.remove(index))
        };
        let Some(removed) = removed else {
            return false;
        };
        self.queue_free(&removed);
        self.set_dirty();
        true
    }

    /// The topmost overlay.
    #[must_use]
    pub fn top_overlay(&self) -> Option<ObjectRef> {
        read(&self.state).overlays.last().cloned()
    }

    /// Overlays from bottom to top.
    #[must_use]
    pub fn overlays(&self) -> Vec<ObjectRef> {
        read(&self.state).overlays.clone()
    }

    /// Whether node outlines are drawn.
    #[must_use]
    pub fn debug(&self) -> bool {
        read(&self.state).debug
    }

    /// Turns node outlines on or off.
    pub fn set_debug(&self, debug: bool) {
        write(&self.state).debug = debug;
        self.set_dirty();
    }

    /// Region that accepts input: the whole canvas.
    #[must_use]
    pub fn interactive_area(&self) -> (Point, Size) {
        (Point::zero(), self.size())
    }

    /// Closes an open menu. Menus never open without input, so this always returns `false`.
    #[must_use]
    pub const fn dismiss_menu(&self) -> bool {
        false
    }

    /// Handler for typed keys, replacing any previous one.
    pub fn set_on_typed_key(&self, handler: impl Fn(&str) + Send + Sync + 'static) {
        write(&self.handlers).key = Some(Arc::new(handler));
    }

    /// Handler for typed characters, replacing any previous one.
    pub fn set_on_typed_rune(&self, handler: impl Fn(char) + Send + Sync + 'static) {
        write(&self.handlers).rune = Some(Arc::new(handler));
    }

    /// Delivers a synthetic key press. Returns `false` without a handler.
    pub fn type_key(&self, key: &str) -> bool {
        let Some(handler) = read(&self.handlers).key.clone() else {
            return false;
        };
        handler(key);
        true
    }

    /// Delivers a synthetic character. Returns `false` without a handler.
    pub fn type_rune(&self, rune: char) -> bool {
        let Some(handler) = read(&self.handlers).rune.clone() else {
            return false;
        };
        handler(rune);
        true
    }

    /// Gives keyboard focus to `id`. Only nodes of the content tree can be focused.
    pub fn focus(&self, id: ObjectId) -> bool {
        let content = self.content();
        if absolute_position_for_object(id, &[content]).is_none() {
            return false;
        }
        write(&self.state).focus.focused = Some(id);
        true
    }

    /// The focused node.
    #[must_use]
    pub fn focused(&self) -> Option<ObjectId> {
        read(&self.state).focus.focused
    }

    /// Clears keyboard focus.
    pub fn unfocus(&self) {
        write(&self.state).focus.focused = None;
    }

    /// Root of the tree focus moves within.
    #[must_use]
    pub fn focus_root(&self) -> ObjectId {
        read(&self.state).focus.root
    }

    /// Content, menu bar and overlays in paint order.
    #[must_use]
    pub fn object_trees(&self) -> Vec<ObjectRef> {
        let state = read(&self.state);
        let mut trees = Vec::with_capacity(state.overlays.len() + 2);
        trees.push(state.content.clone());
        trees.extend(state.menu.clone());
        trees.extend(state.overlays.iter().cloned());
        trees
    }

    /// Lays every tree out again and reports whether the canvas is smaller than its minimum.
    pub fn ensure_min_size(&self) -> bool {
        for tree in self.object_trees() {
            let size = tree.size();
            layout_tree(&tree, size);
        }
        let size = self.size();
        let min = self.min_size();
        min.width > size.width || min.height > size.height
    }

    /// Releases painter resources of nodes removed since the last frame. Returns how many were
    /// released.
    pub fn free_dirty_textures(&self) -> usize {
        let pending = core::mem::take(&mut *lock(&self.pending_free));
        if pending.is_empty() {
            return 0;
        }
        let painter = self.painter();
        for object in &pending {
            self.cache.forget(self.id, *object);
            if let Some(painter) = &painter {
                painter.free(*object);
            }
        }
        trace!(canvas = self.id.0, count = pending.len(), "freed textures");
        pending.len()
    }

    fn queue_free(&self, tree: &ObjectRef) {
        let mut ids = Vec::new();
        walk_complete_object_tree(
            tree,
            |object, _, _| {
                ids.push(object.id());
                false
            },
            |_, _, _| {},
        );
        lock(&self.pending_free).extend(ids);
    }

    pub(crate) fn release(&self, object: ObjectId) {
        if let Some(painter) = self.painter() {
            painter.free(object);
        }
    }

    /// Requests a repaint on the next frame.
    pub fn set_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Whether a repaint is due.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Reads and clears the dirty flag in one step.
    pub fn check_dirty_and_clear(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// Notes that `object` changed and requests a repaint.
    pub fn refresh(&self, object: ObjectId) {
        trace!(canvas = self.id.0, object = object.get(), "refresh");
        self.set_dirty();
    }

    /// Paints the canvas and returns the frame.
    ///
    /// Returns `None` without a painter or when the canvas has no pixels.
    #[must_use]
    pub fn capture(&self) -> Option<CapturedImage> {
        let painter = self.painter()?;
        painter.capture(self)
    }

    /// Walks every tree and hands each node to the painter.
    ///
    /// Scrollable nodes clip their subtree. A degenerate `size` skips drawing but keeps the clip
    /// bookkeeping balanced.
    pub fn paint(&self, size: Size) {
        let Some(painter) = self.painter() else {
            return;
        };
        painter.clear();
        let debug = self.debug();
        let clips = RefCell::new(ClipStack::new());

        for tree in self.object_trees() {
            walk_complete_object_tree(
                &tree,
                |object, position, _| {
                    if object.is_scrollable() {
                        let inner = clips.borrow_mut().push(position, object.size());
                        painter.start_clipping(inner.rect());
                    }
                    if size.is_degenerate() {
                        return false;
                    }
                    self.cache.touch(self.id, object.id());
                    painter.paint(self, object, position, size);
                    false
                },
                |object, position, _| {
                    if object.is_scrollable() {
                        let mut clips = clips.borrow_mut();
                        clips.pop();
                        match clips.top() {
                            Some(top) => painter.start_clipping(top.rect()),
                            None => painter.stop_clipping(),
                        }
                    }
                    if debug {
                        painter.draw_debug_outline(self, object, position, size);
                    }
                },
            );
        }
    }
}

impl PaintSurface for Canvas {
    fn surface_info(&self) -> SurfaceInfo {
        let state = read(&self.state);
        SurfaceInfo {
            size: state.size,
            scale: state.scale,
            texture_scale: state.texture_scale,
            transparent: state.transparent,
            background: self.theme.background(),
            debug: state.debug,
            debug_color: self.theme.colors().primary,
        }
    }

    fn content(&self) -> Option<ObjectRef> {
        Some(Self::content(self))
    }

    fn layers(&self) -> Vec<ObjectRef> {
        let state = read(&self.state);
        state
            .menu
            .iter()
            .chain(state.overlays.iter())
            .cloned()
            .collect()
    }

    fn rendered(&self) -> Option<CapturedImage> {
        lock(&self.rendered).clone()
    }

    fn set_rendered(&self, image: Option<CapturedImage>) {
        *lock(&self.rendered) = image;
    }
}

impl OverlayHost for Canvas {
    fn overlay_area(&self) -> Size {
        self.size()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use hydrolysis::SoftwarePainter;
    use waterui_scene::{CanvasObject, Color, MenuBar, PopUp};

    use super::*;

    fn block(min: Size) -> Arc<Rectangle> {
        let rect = Rectangle::new(Color::BLACK);
        rect.set_min_size(min);
        rect
    }

    #[derive(Debug, Default)]
    struct CountingPainter {
        paints: AtomicUsize,
        clips: Mutex<Vec<Option<waterui_scene::Rect>>>,
        freed: Mutex<Vec<ObjectId>>,
    }

    impl Painter for CountingPainter {
        fn capture(&self, _surface: &dyn PaintSurface) -> Option<CapturedImage> {
            None
        }

        fn paint(&self, _surface: &dyn PaintSurface, _object: &ObjectRef, _position: Point, _frame: Size) {
            self.paints.fetch_add(1, Ordering::SeqCst);
        }

        fn free(&self, object: ObjectId) {
            lock(&self.freed).push(object);
        }

        fn start_clipping(&self, clip: waterui_scene::Rect) {
            lock(&self.clips).push(Some(clip));
        }

        fn stop_clipping(&self) {
            lock(&self.clips).push(None);
        }
    }

    #[test]
    fn new_canvas_is_padded_with_background_content() {
        let canvas = Canvas::new();
        assert!(canvas.padded());
        assert_eq!(canvas.size(), Size::square(10.0));
        assert!(canvas.capture().is_none(), "a canvas without painter has no frame");
    }

    #[test]
    fn set_content_grows_to_fit_and_marks_dirty() {
        let canvas = Canvas::new();
        canvas.check_dirty_and_clear();
        canvas.set_content(block(Size::new(30.0, 20.0)));

        let padding = canvas.theme().padding();
        assert_eq!(canvas.size(), Size::new(30.0 + padding * 2.0, 20.0 + padding * 2.0));
        assert_eq!(canvas.content().position(), Point::square(padding));
        assert!(canvas.check_dirty_and_clear());
        assert!(!canvas.check_dirty_and_clear());
    }

    #[test]
    fn set_padded_moves_content() {
        let canvas = Canvas::new();
        canvas.set_padded(false);
        assert_eq!(canvas.content_pos(), Point::zero());
        assert_eq!(canvas.content().position(), Point::zero());
    }

    #[test]
    fn menu_pushes_content_down() {
        let canvas = Canvas::new();
        canvas.set_padded(false);
        let menu = MenuBar::menu_bar(&["File"][..], canvas.theme());
        let height = menu.min_size().height;
        canvas.set_menu(Some(menu.clone() as ObjectRef));

        assert!((canvas.menu_height() - height).abs() < f32::EPSILON);
        assert_eq!(canvas.content_pos(), Point::new(0.0, height));
        assert!((menu.size().width - canvas.size().width).abs() < f32::EPSILON);
        assert_eq!(canvas.object_trees().len(), 2);
    }

    #[test]
    fn pixel_coordinates_follow_both_scales() {
        let canvas = Canvas::new();
        canvas.set_scale(1.5);
        canvas.set_texture_scale(2.0);
        assert_eq!(canvas.pixel_coordinate_for_position(Point::new(1.5, 0.5)), (5, 2));
    }

    #[test]
    fn popups_are_positioned_against_the_canvas() {
        let canvas = Canvas::new();
        canvas.resize(Size::square(100.0));
        let popup = PopUp::popup(block(Size::square(10.0)), canvas.theme(), canvas.overlay_host());
        canvas.add_overlay(popup.clone());

        let side = popup.size().width;
        let expected = (100.0 - side) / 2.0;
        assert_eq!(popup.position(), Point::square(expected));
        assert_eq!(canvas.top_overlay().map(|o| o.id()), Some(popup.id()));
        assert!(canvas.remove_overlay(popup.id()));
        assert!(!canvas.remove_overlay(popup.id()));
    }

    #[test]
    fn focus_is_limited_to_the_content_tree() {
        let canvas = Canvas::new();
        let inside = block(Size::square(4.0));
        canvas.set_content(inside.clone());
        assert!(canvas.focus(inside.id()));
        assert_eq!(canvas.focused(), Some(inside.id()));

        let outside = block(Size::square(4.0));
        assert!(!canvas.focus(outside.id()));
        canvas.set_content(outside);
        assert_eq!(canvas.focused(), None, "replacing content resets focus");
    }

    #[test]
    fn typed_input_reaches_handlers() {
        let canvas = Canvas::new();
        assert!(!canvas.type_rune('a'));
        let typed = Arc::new(Mutex::new(String::new()));
        let sink = typed.clone();
        canvas.set_on_typed_rune(move |rune| lock(&sink).push(rune));
        assert!(canvas.type_rune('h'));
        assert!(canvas.type_rune('i'));
        assert_eq!(*lock(&typed), "hi");
    }

    #[test]
    fn paint_balances_clip_calls() {
        let painter = Arc::new(CountingPainter::default());
        let canvas = Canvas::with_painter(painter.clone());
        let scroll = waterui_scene::Scroll::scroll(block(Size::square(50.0)));
        canvas.set_content(scroll);
        canvas.paint(canvas.size());

        let clips = lock(&painter.clips);
        assert_eq!(clips.len(), 2);
        assert!(clips[0].is_some());
        assert!(clips[1].is_none());
        assert_eq!(painter.paints.load(Ordering::SeqCst), 2, "scroll and its content");
    }

    #[test]
    fn degenerate_size_skips_drawing() {
        let painter = Arc::new(CountingPainter::default());
        let canvas = Canvas::with_painter(painter.clone());
        canvas.paint(Size::new(0.0, 10.0));
        assert_eq!(painter.paints.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn replaced_content_is_released() {
        let painter = Arc::new(CountingPainter::default());
        let canvas = Canvas::with_painter(painter.clone());
        let old = canvas.content();
        canvas.set_content(block(Size::square(2.0)));
        assert_eq!(canvas.free_dirty_textures(), 1);
        assert_eq!(*lock(&painter.freed), vec![old.id()]);
        assert_eq!(canvas.free_dirty_textures(), 0);
    }

    #[test]
    fn capture_uses_the_painter() {
        let canvas = Canvas::with_painter(Arc::new(SoftwarePainter::new()));
        canvas.set_padded(false);
        canvas.set_content(Rectangle::new(Color::rgb(1, 2, 3)));
        let image = canvas.capture().unwrap();
        assert_eq!((image.width(), image.height()), (10, 10));
        assert!(image.colors().all(|c| c == Color::rgb(1, 2, 3)));
    }

    #[test]
    fn shrinking_to_nothing_drops_the_last_frame() {
        let canvas = Canvas::with_painter(Arc::new(SoftwarePainter::new()));
        canvas.set_padded(false);
        assert!(canvas.capture().is_some());

        canvas.resize(Size::zero());
        assert_eq!(canvas.size(), Size::zero());
        assert!(canvas.capture().is_none(), "a zero sized canvas has no frame");
        assert!(canvas.rendered().is_none());
    }

    #[test]
    fn zero_scale_drops_the_last_frame() {
        let canvas = Canvas::with_painter(Arc::new(SoftwarePainter::new()));
        assert!(canvas.capture().is_some());

        canvas.set_scale(0.0);
        assert!(canvas.capture().is_none(), "a zero scale leaves no device pixels");

        canvas.set_scale(2.0);
        let image = canvas.capture().unwrap();
        assert_eq!((image.width(), image.height()), (20, 20));
    }
}
