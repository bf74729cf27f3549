//! Composite nodes whose children are owned and arranged by a renderer.
//!
//! A [`BaseWidget`] couples node bookkeeping with a [`WidgetRenderer`]. The renderer is created
//! once together with the widget and reused for every layout pass, so children keep their
//! identity between frames.

use core::fmt::Debug;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, Weak};

use crate::geometry::{Point, Size};
use crate::object::{BaseObject, CanvasObject, ObjectId, ObjectKind, ObjectRef, read, write};
use crate::primitive::{Rectangle, Text};
use crate::text::line_height;
use crate::theme::Theme;

/// Lays out and owns the children of a widget.
pub trait WidgetRenderer: Debug + Send + Sync + 'static {
    /// Positions the children within `size`.
    fn layout(&self, size: Size);

    /// Smallest size the widget can be drawn at.
    fn min_size(&self) -> Size;

    /// Children in paint order.
    fn objects(&self) -> Vec<ObjectRef>;

    /// Updates the children after external state changed. `widget` is the owning node.
    fn refresh(&self, widget: &BaseObject) {
        self.layout(widget.size());
    }

    /// Releases resources held by the renderer.
    fn destroy(&self) {}

    /// Whether the widget restricts its children to its own bounds.
    fn is_scrollable(&self) -> bool {
        false
    }

    /// Whether the widget is a pop-up that positions itself.
    fn is_popup(&self) -> bool {
        false
    }
}

/// Something pop-ups can position themselves within, usually a canvas.
pub trait OverlayHost: Send + Sync {
    /// Area available to overlays, in logical pixels.
    fn overlay_area(&self) -> Size;
}

/// A scene node driven by a [`WidgetRenderer`].
#[derive(Debug)]
pub struct BaseWidget<R> {
    base: BaseObject,
    renderer: R,
}

impl<R: WidgetRenderer> BaseWidget<R> {
    /// Wraps `renderer` into a visible, zero-sized widget.
    #[must_use]
    pub fn new(renderer: R) -> Arc<Self> {
        Arc::new(Self {
            base: BaseObject::new(),
            renderer,
        })
    }

    /// The renderer owned by this widget.
    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<R: WidgetRenderer> CanvasObject for BaseWidget<R> {
    crate::forward_base_object!(base);

    fn min_size(&self) -> Size {
        self.renderer.min_size()
    }

    fn resize(&self, size: Size) {
        self.base.resize(size);
        self.renderer.layout(size);
    }

    fn refresh(&self) {
        self.renderer.refresh(&self.base);
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Widget
    }

    fn children(&self) -> Vec<ObjectRef> {
        self.renderer.objects()
    }

    fn layout_children(&self, size: Size) {
        self.renderer.layout(size);
    }

    fn is_scrollable(&self) -> bool {
        self.renderer.is_scrollable()
    }

    fn is_popup(&self) -> bool {
        self.renderer.is_popup()
    }
}

const SCROLL_MIN_SIZE: f32 = 32.0;

/// Renderer of a [`Scroll`]: content at least as large as the viewport, shifted by the offset.
#[derive(Debug)]
pub struct ScrollRenderer {
    content: ObjectRef,
    offset: RwLock<Point>,
}

impl WidgetRenderer for ScrollRenderer {
    fn layout(&self, size: Size) {
        let content_size = self.content.min_size().max(size);
        self.content.resize(content_size);
        let offset = *read(&self.offset);
        self.content.move_to(Point::new(-offset.x, -offset.y));
    }

    fn min_size(&self) -> Size {
        Size::square(SCROLL_MIN_SIZE)
    }

    fn objects(&self) -> Vec<ObjectRef> {
        vec![self.content.clone()]
    }

    fn is_scrollable(&self) -> bool {
        true
    }
}

/// A viewport clipping its content to its own bounds.
pub type Scroll = BaseWidget<ScrollRenderer>;

impl BaseWidget<ScrollRenderer> {
    /// Creates a scroll container around `content`.
    #[must_use]
    pub fn scroll(content: ObjectRef) -> Arc<Self> {
        Self::new(ScrollRenderer {
            content,
            offset: RwLock::new(Point::zero()),
        })
    }

    /// Current scroll offset.
    #[must_use]
    pub fn offset(&self) -> Point {
        *read(&self.renderer.offset)
    }

    /// Scrolls to `offset`, clamped to the scrollable range.
    pub fn scroll_to(&self, offset: Point) {
        let viewport = self.size();
        let content = self.renderer.content.min_size().max(viewport);
        let clamped = Point::new(
            offset.x.clamp(0.0, (content.width - viewport.width).max(0.0)),
            offset.y.clamp(0.0, (content.height - viewport.height).max(0.0)),
        );
        *write(&self.renderer.offset) = clamped;
        self.renderer.layout(viewport);
    }
}

/// Renderer of a [`PopUp`]: padded content on an overlay background.
#[derive(Debug)]
pub struct PopUpRenderer {
    content: ObjectRef,
    background: Arc<Rectangle>,
    padding: f32,
    anchor: RwLock<Option<Point>>,
    host: Weak<dyn OverlayHost>,
    refreshes: AtomicUsize,
}

impl WidgetRenderer for PopUpRenderer {
    fn layout(&self, size: Size) {
        self.background.move_to(Point::zero());
        self.background.resize(size);
        let inset = Size::square(self.padding * 2.0);
        self.content.move_to(Point::square(self.padding));
        self.content.resize((size - inset).max(Size::zero()));
    }

    fn min_size(&self) -> Size {
        self.content.min_size() + Size::square(self.padding * 2.0)
    }

    fn objects(&self) -> Vec<ObjectRef> {
        vec![self.background.clone() as ObjectRef, self.content.clone()]
    }

    fn refresh(&self, widget: &BaseObject) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        let size = self.min_size();
        widget.resize(size);
        self.layout(size);

        let Some(host) = self.host.upgrade() else {
            return;
        };
        let area = host.overlay_area();
        let free = Size::new(
            (area.width - size.width).max(0.0),
            (area.height - size.height).max(0.0),
        );
        let position = match *read(&self.anchor) {
            Some(anchor) => Point::new(
                anchor.x.clamp(0.0, free.width),
                anchor.y.clamp(0.0, free.height),
            ),
            None => Point::new(free.width / 2.0, free.height / 2.0),
        };
        widget.move_to(position);
    }

    fn is_popup(&self) -> bool {
        true
    }
}

/// An overlay that sizes itself to its content and stays within its host when refreshed.
pub type PopUp = BaseWidget<PopUpRenderer>;

impl BaseWidget<PopUpRenderer> {
    /// Creates a pop-up around `content`, centered within `host` on every refresh.
    #[must_use]
    pub fn popup(content: ObjectRef, theme: &Theme, host: Weak<dyn OverlayHost>) -> Arc<Self> {
        let popup = Self::new(PopUpRenderer {
            content,
            background: Rectangle::new(theme.colors().overlay_background),
            padding: theme.padding(),
            anchor: RwLock::new(None),
            host,
            refreshes: AtomicUsize::new(0),
        });
        popup.refresh();
        popup
    }

    /// Pins the pop-up at `position` instead of centering it.
    pub fn show_at(&self, position: Point) {
        *write(&self.renderer.anchor) = Some(position);
        self.show();
        self.refresh();
    }

    /// How many times the pop-up has been refreshed.
    #[must_use]
    pub fn refresh_count(&self) -> usize {
        self.renderer.refreshes.load(Ordering::SeqCst)
    }
}

/// Renderer of a [`MenuBar`]: a row of labels on the overlay background.
#[derive(Debug)]
pub struct MenuBarRenderer {
    background: Arc<Rectangle>,
    labels: Vec<Arc<Text>>,
    padding: f32,
    text_size: f32,
}

impl WidgetRenderer for MenuBarRenderer {
    fn layout(&self, size: Size) {
        self.background.move_to(Point::zero());
        self.background.resize(size);
        let mut x = self.padding;
        for label in &self.labels {
            let min = label.min_size();
            label.move_to(Point::new(x, self.padding));
            label.resize(min);
            x += min.width + self.padding * 2.0;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn min_size(&self) -> Size {
        let labels: f32 = self.labels.iter().map(|label| label.min_size().width).sum();
        let gaps = self.padding * 2.0 * self.labels.len() as f32;
        Size::new(labels + gaps, line_height(self.text_size) + self.padding * 2.0)
    }

    fn objects(&self) -> Vec<ObjectRef> {
        let mut objects: Vec<ObjectRef> = Vec::with_capacity(self.labels.len() + 1);
        objects.push(self.background.clone());
        objects.extend(self.labels.iter().map(|label| label.clone() as ObjectRef));
        objects
    }
}

/// Horizontal bar of top-level menu titles drawn above the canvas content.
pub type MenuBar = BaseWidget<MenuBarRenderer>;

impl BaseWidget<MenuBarRenderer> {
    /// Creates a bar showing `titles`.
    #[must_use]
    pub fn menu_bar<S: AsRef<str>>(titles: &[S], theme: &Theme) -> Arc<Self> {
        let labels = titles
            .iter()
            .map(|title| {
                let label = Text::new(title.as_ref(), theme.foreground());
                label.set_text_size(theme.text_size());
                label
            })
            .collect();
        Self::new(MenuBarRenderer {
            background: Rectangle::new(theme.colors().overlay_background),
            labels,
            padding: theme.padding(),
            text_size: theme.text_size(),
        })
    }

    /// Titles in display order.
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.renderer.labels.iter().map(|label| label.text()).collect()
    }

    /// Identifiers of the title labels, useful for hit-testing.
    #[must_use]
    pub fn label_ids(&self) -> Vec<ObjectId> {
        self.renderer.labels.iter().map(|label| label.id()).collect()
    }
}
