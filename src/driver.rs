//! The headless driver: an explicit application context owning windows, the painter handed to
//! their canvases, a device description and a main task queue.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

use hydrolysis::{Painter, SoftwarePainter};
use tracing::{debug, debug_span};
use waterui_scene::{Animation, ObjectId, Point, Size, TextStyle, Theme};

use crate::cache::RenderCache;
use crate::canvas::{Canvas, CanvasId};
use crate::config::HeadlessConfig;
use crate::device::HeadlessDevice;
use crate::error::Result;
use crate::queue::TaskQueue;
use crate::sync::{read, write};
use crate::window::Window;

/// Shared state behind a [`Driver`] handle. Windows keep a weak reference to it.
#[derive(Debug)]
pub(crate) struct DriverInner {
    windows: RwLock<Vec<Arc<Window>>>,
    device: HeadlessDevice,
    painter: Option<Arc<dyn Painter>>,
    theme: Arc<Theme>,
    config: HeadlessConfig,
    cache: Arc<RenderCache>,
    main: TaskQueue,
    in_memory: OnceLock<Arc<Canvas>>,
    quit: AtomicBool,
    created: AtomicUsize,
}

impl DriverInner {
    pub(crate) fn windows(&self) -> Vec<Arc<Window>> {
        read(&self.windows).clone()
    }

    pub(crate) fn remove_window(&self, window: &Window) {
        write(&self.windows).retain(|candidate| !core::ptr::eq(Arc::as_ptr(candidate), window));
    }

    pub(crate) fn quit(&self) {
        if !self.quit.swap(true, Ordering::AcqRel) {
            debug!("driver quit requested");
        }
    }
}

/// Handle to a headless application context. Clones share the same windows.
#[derive(Debug, Clone)]
pub struct Driver {
    inner: Arc<DriverInner>,
}

impl Driver {
    /// A driver rendering with [`SoftwarePainter`] that starts with one untitled window, ready
    /// for rendering tests.
    ///
    /// # Errors
    ///
    /// Fails when a worker thread cannot be started.
    pub fn new() -> Result<Self> {
        Self::with_config(HeadlessConfig::default())
    }

    /// Like [`Driver::new`] with explicit settings.
    ///
    /// # Errors
    ///
    /// Fails when a worker thread cannot be started.
    pub fn with_config(config: HeadlessConfig) -> Result<Self> {
        let driver = Self::build(config, Some(Arc::new(SoftwarePainter::new())))?;
        driver.create_window("")?;
        Ok(driver)
    }

    /// A driver handing `painter` to every canvas it creates. No window is created.
    ///
    /// # Errors
    ///
    /// Fails when the main task queue cannot be started.
    pub fn with_painter(painter: Arc<dyn Painter>) -> Result<Self> {
        Self::build(HeadlessConfig::default(), Some(painter))
    }

    /// A driver whose canvases have no painter and therefore never produce a frame.
    ///
    /// # Errors
    ///
    /// Fails when the main task queue cannot be started.
    pub fn without_painter(config: HeadlessConfig) -> Result<Self> {
        Self::build(config, None)
    }

    fn build(config: HeadlessConfig, painter: Option<Arc<dyn Painter>>) -> Result<Self> {
        let main = TaskQueue::spawn("waterui-main")?;
        Ok(Self {
            inner: Arc::new(DriverInner {
                windows: RwLock::new(Vec::new()),
                device: HeadlessDevice,
                painter,
                theme: Arc::new(config.theme()),
                config,
                cache: Arc::new(RenderCache::new()),
                main,
                in_memory: OnceLock::new(),
                quit: AtomicBool::new(false),
                created: AtomicUsize::new(0),
            }),
        })
    }

    /// Settings applied to new canvases.
    #[must_use]
    pub fn config(&self) -> &HeadlessConfig {
        &self.inner.config
    }

    /// Theme shared by every canvas of this driver.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.inner.theme
    }

    /// Creates and registers a window. An empty title becomes the default title.
    ///
    /// # Errors
    ///
    /// Fails when the window's event queue cannot be started.
    pub fn create_window(&self, title: &str) -> Result<Arc<Window>> {
        let inner = &self.inner;
        let canvas = self.new_canvas();
        let index = inner.created.fetch_add(1, Ordering::Relaxed);
        let window = Window::new(
            inner.config.title_or_default(title),
            canvas,
            format!("waterui-window-{index}"),
            Arc::downgrade(inner),
        )?;
        write(&inner.windows).push(window.clone());
        debug!(title = %window.title(), "window created");
        Ok(window)
    }

    fn new_canvas(&self) -> Arc<Canvas> {
        let inner = &self.inner;
        Canvas::create(
            &inner.config,
            inner.theme.clone(),
            inner.cache.clone(),
            inner.painter.clone(),
            false,
        )
    }

    /// Live windows in creation order.
    #[must_use]
    pub fn all_windows(&self) -> Vec<Arc<Window>> {
        self.inner.windows()
    }

    /// The canvas showing `object`.
    ///
    /// Object membership is not tracked: the canvas of the most recently created window is
    /// returned, which is right whenever a single window is in play.
    #[must_use]
    pub fn canvas_for_object(&self, _object: ObjectId) -> Option<Arc<Canvas>> {
        read(&self.inner.windows).last().map(|window| window.canvas())
    }

    /// Absolute position of `object` on its canvas, or the origin when it cannot be found.
    #[must_use]
    pub fn absolute_position_for_object(&self, object: ObjectId) -> Point {
        self.canvas_for_object(object)
            .and_then(|canvas| {
                waterui_scene::absolute_position_for_object(object, &canvas.object_trees())
            })
            .unwrap_or_default()
    }

    /// Size of `text` when drawn at `size` with `style`, and its baseline.
    #[must_use]
    pub fn rendered_text_size(&self, text: &str, size: f32, style: TextStyle) -> (Size, f32) {
        waterui_scene::rendered_text_size(text, size, style)
    }

    /// Descriptor of the pretend device.
    #[must_use]
    pub fn device(&self) -> &HeadlessDevice {
        &self.inner.device
    }

    /// There is no event loop. Frames are produced with [`Driver::draw_single_frame`].
    pub fn run(&self) {}

    /// Records that the application asked to quit.
    pub fn quit(&self) {
        self.inner.quit();
    }

    /// Whether [`Driver::quit`] was called.
    #[must_use]
    pub fn is_quitting(&self) -> bool {
        self.inner.quit.load(Ordering::Acquire)
    }

    /// Jumps `animation` straight to its final state.
    pub fn start_animation(&self, animation: &Animation) {
        animation.tick(1.0);
    }

    /// Animations finish as soon as they start, so there is nothing to stop.
    pub fn stop_animation(&self, _animation: &Animation) {}

    /// Runs `f` on the main task queue and waits for its result. On the main queue itself it
    /// runs inline.
    ///
    /// # Errors
    ///
    /// Fails when the queue is gone or `f` panics.
    pub fn run_on_main<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.inner.main.run(f)
    }

    /// A canvas outside any window, created on first use and shared afterwards.
    #[must_use]
    pub fn in_memory_canvas(&self) -> Arc<Canvas> {
        self.inner.in_memory.get_or_init(|| self.new_canvas()).clone()
    }

    /// Repaints every visible window whose canvas is dirty, then releases painter resources of
    /// nodes that left the screen. Returns how many windows were repainted.
    pub fn draw_single_frame(&self) -> usize {
        let _frame = debug_span!("frame").entered();
        let mut refreshed = Vec::new();

        for window in self.all_windows() {
            let (closing, visible) = window.frame_state();
            let canvas = window.canvas();
            // Visibility first: a window that just became visible may show stale content.
            if closing || !visible || !canvas.check_dirty_and_clear() {
                continue;
            }
            Self::repaint_window(&window, &canvas);
            refreshed.push(canvas.id());
        }

        self.clean_caches(&refreshed);
        debug!(repainted = refreshed.len(), "frame drawn");
        refreshed.len()
    }

    fn repaint_window(window: &Window, canvas: &Canvas) {
        window.set_should_expand(canvas.ensure_min_size());
        canvas.free_dirty_textures();
        canvas.paint(canvas.size());
    }

    fn clean_caches(&self, refreshed: &[CanvasId]) {
        let mut live: Vec<Arc<Canvas>> = self
            .all_windows()
            .iter()
            .map(|window| window.canvas())
            .collect();
        live.extend(self.inner.in_memory.get().cloned());
        let live_ids: Vec<CanvasId> = live.iter().map(|canvas| canvas.id()).collect();

        for (canvas_id, object) in self.inner.cache.clean_canvases(refreshed, &live_ids) {
            match live.iter().find(|canvas| canvas.id() == canvas_id) {
                Some(canvas) => canvas.release(object),
                None => {
                    if let Some(painter) = &self.inner.painter {
                        painter.free(object);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use waterui_scene::{CanvasObject, Color, ObjectRef, Rectangle, VBoxLayout};

    use super::*;
    use crate::config::DEFAULT_TITLE;

    #[test]
    fn new_driver_has_one_default_window() {
        let driver = Driver::new().unwrap();
        let windows = driver.all_windows();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].title(), DEFAULT_TITLE);
    }

    #[test]
    fn canvas_for_object_is_the_latest_window() {
        let driver = Driver::with_painter(Arc::new(SoftwarePainter::new())).unwrap();
        assert!(driver.canvas_for_object(ObjectId::next()).is_none());
        driver.create_window("first").unwrap();
        let second = driver.create_window("second").unwrap();
        let canvas = driver.canvas_for_object(ObjectId::next()).unwrap();
        assert_eq!(canvas.id(), second.canvas().id());
    }

    #[test]
    fn absolute_position_includes_padding() {
        let driver = Driver::with_painter(Arc::new(SoftwarePainter::new())).unwrap();
        let window = driver.create_window("").unwrap();
        let top = Rectangle::new(Color::BLACK);
        let bottom = Rectangle::new(Color::WHITE);
        top.set_min_size(Size::square(10.0));
        bottom.set_min_size(Size::square(10.0));
        let column = waterui_scene::Container::new(
            VBoxLayout::new(0.0),
            vec![top as ObjectRef, bottom.clone()],
        );
        window.set_content(column);

        let padding = driver.theme().padding();
        assert_eq!(
            driver.absolute_position_for_object(bottom.id()),
            Point::new(padding, padding + 10.0)
        );
        assert_eq!(driver.absolute_position_for_object(ObjectId::next()), Point::zero());
    }

    #[test]
    fn animations_jump_to_the_end() {
        let driver = Driver::with_painter(Arc::new(SoftwarePainter::new())).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let animation = Animation::new(Duration::from_secs(1), move |progress| {
            sink.lock().unwrap().push(progress);
        });
        driver.start_animation(&animation);
        driver.stop_animation(&animation);
        assert_eq!(*seen.lock().unwrap(), vec![1.0]);
    }

    #[test]
    fn run_on_main_uses_the_main_queue() {
        let driver = Driver::with_painter(Arc::new(SoftwarePainter::new())).unwrap();
        let name = driver
            .run_on_main(|| std::thread::current().name().map(str::to_owned))
            .unwrap();
        assert_eq!(name.as_deref(), Some("waterui-main"));
    }

    #[test]
    fn in_memory_canvas_is_reused() {
        let driver = Driver::with_painter(Arc::new(SoftwarePainter::new())).unwrap();
        assert_eq!(driver.in_memory_canvas().id(), driver.in_memory_canvas().id());
        assert!(driver.all_windows().is_empty());
    }

    #[test]
    fn hidden_windows_are_not_painted() {
        let driver = Driver::with_painter(Arc::new(SoftwarePainter::new())).unwrap();
        let window = driver.create_window("").unwrap();
        window.canvas().set_dirty();
        assert_eq!(driver.draw_single_frame(), 0);
        assert!(window.canvas().is_dirty(), "dirty flag is kept until the window is shown");

        window.show();
        assert_eq!(driver.draw_single_frame(), 1);
        assert!(window.canvas().capture().is_some());
    }

    #[test]
    fn should_expand_reflects_min_size() {
        let driver = Driver::with_painter(Arc::new(SoftwarePainter::new())).unwrap();
        let window = driver.create_window("").unwrap();
        window.show();
        let block = Rectangle::new(Color::BLACK);
        block.set_min_size(Size::square(5.0));
        window.set_content(block.clone());
        driver.draw_single_frame();
        assert!(!window.should_expand());

        block.set_min_size(Size::square(500.0));
        window.canvas().set_dirty();
        driver.draw_single_frame();
        assert!(window.should_expand());
    }
}
