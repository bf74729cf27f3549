//! Headless windows.
//!
//! A [`Window`] is little more than a [`Canvas`] with window-level flags. Focus is exclusive
//! across the windows of one driver, and closing a window removes it from the driver and stops
//! its event queue.

use core::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock, RwLock, Weak};

use tracing::{debug, trace};
use waterui_scene::{ImageData, MenuBar, ObjectRef, Point, Size};

use crate::canvas::Canvas;
use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::driver::DriverInner;
use crate::error::Result;
use crate::menu::MainMenu;
use crate::queue::TaskQueue;
use crate::sync::{read, write};

type Callback = Arc<dyn Fn() + Send + Sync>;
type DropHandler = Arc<dyn Fn(Point, &[PathBuf]) + Send + Sync>;

#[derive(Default)]
struct WindowState {
    title: String,
    visible: bool,
    focused: bool,
    full_screen: bool,
    fixed_size: bool,
    closing: bool,
    master: bool,
    should_expand: bool,
    icon: Option<ImageData>,
    main_menu: Option<MainMenu>,
    on_closed: Option<Callback>,
    close_intercept: Option<Callback>,
    on_dropped: Option<DropHandler>,
}

/// A window whose content is rendered off screen.
pub struct Window {
    state: RwLock<WindowState>,
    canvas: Arc<Canvas>,
    queue: TaskQueue,
    clipboard: OnceLock<Arc<dyn Clipboard>>,
    driver: Weak<DriverInner>,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = read(&self.state);
        f.debug_struct("Window")
            .field("title", &state.title)
            .field("visible", &state.visible)
            .field("focused", &state.focused)
            .field("closing", &state.closing)
            .field("canvas", &self.canvas.id())
            .finish_non_exhaustive()
    }
}

impl Window {
    pub(crate) fn new(
        title: String,
        canvas: Arc<Canvas>,
        queue_name: String,
        driver: Weak<DriverInner>,
    ) -> Result<Arc<Self>> {
        let queue = TaskQueue::spawn(queue_name)?;
        Ok(Arc::new(Self {
            state: RwLock::new(WindowState {
                title,
                ..WindowState::default()
            }),
            canvas,
            queue,
            clipboard: OnceLock::new(),
            driver,
        }))
    }

    /// The canvas rendering this window.
    #[must_use]
    pub fn canvas(&self) -> Arc<Canvas> {
        self.canvas.clone()
    }

    /// Content root of the canvas.
    #[must_use]
    pub fn content(&self) -> ObjectRef {
        self.canvas.content()
    }

    /// Replaces the content of the canvas.
    pub fn set_content(&self, content: ObjectRef) {
        self.canvas.set_content(content);
    }

    /// Resizes the canvas.
    pub fn resize(&self, size: Size) {
        self.canvas.resize(size);
    }

    /// Whether the canvas pads its content.
    #[must_use]
    pub fn padded(&self) -> bool {
        self.canvas.padded()
    }

    /// Switches canvas padding.
    pub fn set_padded(&self, padded: bool) {
        self.canvas.set_padded(padded);
    }

    /// Window title.
    #[must_use]
    pub fn title(&self) -> String {
        read(&self.state).title.clone()
    }

    /// Changes the title.
    pub fn set_title(&self, title: impl Into<String>) {
        write(&self.state).title = title.into();
    }

    /// Whether the window takes the whole screen.
    #[must_use]
    pub fn full_screen(&self) -> bool {
        read(&self.state).full_screen
    }

    /// Sets the full-screen flag.
    pub fn set_full_screen(&self, full_screen: bool) {
        write(&self.state).full_screen = full_screen;
    }

    /// Whether the user may resize the window.
    #[must_use]
    pub fn fixed_size(&self) -> bool {
        read(&self.state).fixed_size
    }

    /// Sets the fixed-size flag.
    pub fn set_fixed_size(&self, fixed: bool) {
        write(&self.state).fixed_size = fixed;
    }

    /// Whether this is the main window of the application.
    #[must_use]
    pub fn is_master(&self) -> bool {
        read(&self.state).master
    }

    /// Marks the window as the main window.
    pub fn set_master(&self) {
        write(&self.state).master = true;
    }

    /// Icon set with [`Window::set_icon`].
    #[must_use]
    pub fn icon(&self) -> Option<ImageData> {
        read(&self.state).icon.clone()
    }

    /// Stores the icon. Nothing displays it.
    pub fn set_icon(&self, icon: Option<ImageData>) {
        write(&self.state).icon = icon;
    }

    /// There is no screen, so there is nothing to center on.
    pub fn center_on_screen(&self) {
        trace!(title = %self.title(), "center on screen ignored");
    }

    /// Whether the window is shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        read(&self.state).visible
    }

    /// Whether the window holds keyboard focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        read(&self.state).focused
    }

    /// Whether the window is being closed.
    #[must_use]
    pub fn is_closing(&self) -> bool {
        read(&self.state).closing
    }

    /// Whether the last frame found the canvas smaller than its content needs.
    #[must_use]
    pub fn should_expand(&self) -> bool {
        read(&self.state).should_expand
    }

    pub(crate) fn set_should_expand(&self, expand: bool) {
        write(&self.state).should_expand = expand;
    }

    /// Closing and visibility flags, read together for frame dispatch.
    pub(crate) fn frame_state(&self) -> (bool, bool) {
        let state = read(&self.state);
        (state.closing, state.visible)
    }

    /// Shows the window and gives it focus.
    pub fn show(&self) {
        write(&self.state).visible = true;
        self.request_focus();
    }

    /// Shows the window. There is no event loop to run.
    pub fn show_and_run(&self) {
        self.show();
    }

    /// Hides the window and drops its focus.
    pub fn hide(&self) {
        let mut state = write(&self.state);
        state.visible = false;
        state.focused = false;
    }

    /// Focuses this window and unfocuses every other window of the driver.
    pub fn request_focus(&self) {
        if let Some(driver) = self.driver.upgrade() {
            for window in driver.windows() {
                if !core::ptr::eq(Arc::as_ptr(&window), self) {
                    write(&window.state).focused = false;
                }
            }
        }
        write(&self.state).focused = true;
    }

    /// Clipboard of the window, created on first use.
    #[must_use]
    pub fn clipboard(&self) -> Arc<dyn Clipboard> {
        self.clipboard
            .get_or_init(|| Arc::new(MemoryClipboard::new()) as Arc<dyn Clipboard>)
            .clone()
    }

    /// The main menu.
    #[must_use]
    pub fn main_menu(&self) -> Option<MainMenu> {
        read(&self.state).main_menu.clone()
    }

    /// Installs the main menu and shows its titles in a bar above the content.
    ///
    /// Every menu gets a quit item. Quit items without an action quit the driver.
    pub fn set_main_menu(&self, menu: Option<MainMenu>) {
        let Some(mut menu) = menu else {
            write(&self.state).main_menu = None;
            self.canvas.set_menu(None);
            return;
        };

        for item in &mut menu.items {
            let driver = self.driver.clone();
            item.add_missing_quit(move || {
                if let Some(driver) = driver.upgrade() {
                    driver.quit();
                }
            });
        }
        let bar: ObjectRef = MenuBar::menu_bar(&menu.titles(), self.canvas.theme());
        write(&self.state).main_menu = Some(menu);
        self.canvas.set_menu(Some(bar));
    }

    /// Callback run once when the window closes.
    pub fn set_on_closed(&self, callback: impl Fn() + Send + Sync + 'static) {
        write(&self.state).on_closed = Some(Arc::new(callback));
    }

    /// Callback run by [`Window::request_close`] instead of closing.
    pub fn set_close_intercept(&self, callback: impl Fn() + Send + Sync + 'static) {
        write(&self.state).close_intercept = Some(Arc::new(callback));
    }

    /// Handler for files dropped onto the window.
    pub fn set_on_dropped(&self, handler: impl Fn(Point, &[PathBuf]) + Send + Sync + 'static) {
        write(&self.state).on_dropped = Some(Arc::new(handler));
    }

    /// Simulates dropping `paths` at `position`. Returns `false` without a handler.
    pub fn drop_files(&self, position: Point, paths: &[PathBuf]) -> bool {
        let Some(handler) = read(&self.state).on_dropped.clone() else {
            return false;
        };
        handler(position, paths);
        true
    }

    /// Asks the window to close, deferring to the close intercept when one is installed.
    pub fn request_close(&self) {
        let intercept = read(&self.state).close_intercept.clone();
        match intercept {
            Some(intercept) => intercept(),
            None => self.close(),
        }
    }

    /// Closes the window.
    ///
    /// Runs the on-closed callback, drops focus, removes the window from its driver and stops the
    /// event queue.
    pub fn close(&self) {
        let on_closed = {
            let mut state = write(&self.state);
            if state.closing {
                return;
            }
            state.closing = true;
            state.focused = false;
            state.on_closed.take()
        };
        if let Some(on_closed) = on_closed {
            on_closed();
        }
        if let Some(driver) = self.driver.upgrade() {
            driver.remove_window(self);
        }
        self.queue.close();
        debug!(title = %self.title(), "window closed");
    }

    /// Queues `event` on the window's event thread.
    ///
    /// # Errors
    ///
    /// Fails once the window is closed.
    pub fn post_event(&self, event: impl FnOnce() + Send + 'static) -> Result<()> {
        self.queue.post(event)
    }

    /// Runs `event` on the window's event thread and waits for its result.
    ///
    /// # Errors
    ///
    /// Fails once the window is closed or when `event` panics.
    pub fn run_event<T, F>(&self, event: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.queue.run(event)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use hydrolysis::SoftwarePainter;
    use waterui_scene::{Color, Rectangle};

    use super::*;
    use crate::driver::Driver;
    use crate::menu::{Menu, MenuItem};

    fn driver() -> Driver {
        Driver::with_painter(Arc::new(SoftwarePainter::new())).unwrap()
    }

    #[test]
    fn show_focuses_and_hide_unfocuses() {
        let driver = driver();
        let window = driver.create_window("Main").unwrap();
        assert!(!window.is_visible());
        window.show();
        assert!(window.is_visible() && window.is_focused());
        window.hide();
        assert!(!window.is_visible() && !window.is_focused());
    }

    #[test]
    fn close_runs_callback_once_and_leaves_driver() {
        let driver = driver();
        let window = driver.create_window("Main").unwrap();
        let closed = Arc::new(AtomicUsize::new(0));
        let counter = closed.clone();
        window.set_on_closed(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        window.close();
        window.close();
        assert_eq!(closed.load(Ordering::SeqCst), 1);
        assert!(window.is_closing());
        assert!(driver.all_windows().is_empty());
        assert!(window.post_event(|| ()).is_err());
    }

    #[test]
    fn close_intercept_replaces_close() {
        let driver = driver();
        let window = driver.create_window("Main").unwrap();
        let asked = Arc::new(AtomicUsize::new(0));
        let counter = asked.clone();
        window.set_close_intercept(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        window.request_close();
        assert_eq!(asked.load(Ordering::SeqCst), 1);
        assert!(!window.is_closing());
        assert_eq!(driver.all_windows().len(), 1);
    }

    #[test]
    fn clipboard_is_shared_per_window() {
        let driver = driver();
        let window = driver.create_window("Main").unwrap();
        window.clipboard().set_content("copied");
        assert_eq!(window.clipboard().content(), "copied");
    }

    #[test]
    fn main_menu_adds_quit_and_reserves_space() {
        let driver = driver();
        let window = driver.create_window("Main").unwrap();
        window.set_content(Rectangle::new(Color::BLACK));
        window.set_main_menu(Some(MainMenu::new(vec![Menu::new(
            "File",
            vec![MenuItem::inert("Open")],
        )])));

        let menu = window.main_menu().unwrap();
        let quit = menu.items[0].items.last().unwrap();
        assert!(quit.is_quit);
        assert!(quit.activate());
        assert!(driver.is_quitting());
        assert!(window.canvas().menu_height() > 0.0);
        assert!(window.content().position().y >= window.canvas().menu_height());

        window.set_main_menu(None);
        assert!(window.canvas().menu().is_none());
    }

    #[test]
    fn dropped_files_reach_the_handler() {
        let driver = driver();
        let window = driver.create_window("Main").unwrap();
        let path = PathBuf::from("notes.txt");
        assert!(!window.drop_files(Point::zero(), &[path.clone()]));

        let dropped = Arc::new(AtomicUsize::new(0));
        let counter = dropped.clone();
        window.set_on_dropped(move |_, paths| {
            counter.fetch_add(paths.len(), Ordering::SeqCst);
        });
        assert!(window.drop_files(Point::new(3.0, 4.0), &[path]));
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn events_run_on_the_window_thread() {
        let driver = driver();
        let window = driver.create_window("Main").unwrap();
        let name = window
            .run_event(|| std::thread::current().name().map(str::to_owned))
            .unwrap();
        assert!(name.is_some_and(|name| name.starts_with("waterui-window")));
    }
}
