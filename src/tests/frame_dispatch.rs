//! Frame production: dirty tracking, visibility, window order and focus.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::scene::{Color, ObjectRef, Point, Rectangle, Size};
use crate::{CapturedImage, Driver, PaintSurface, Painter, SoftwarePainter, Window};

#[derive(Debug, Default)]
struct CountingPainter {
    paints: AtomicUsize,
}

impl CountingPainter {
    fn take(&self) -> usize {
        self.paints.swap(0, Ordering::SeqCst)
    }
}

impl Painter for CountingPainter {
    fn capture(&self, _surface: &dyn PaintSurface) -> Option<CapturedImage> {
        None
    }

    fn paint(&self, _surface: &dyn PaintSurface, _object: &ObjectRef, _position: Point, _frame: Size) {
        self.paints.fetch_add(1, Ordering::SeqCst);
    }
}

fn shown_window(driver: &Driver) -> Arc<Window> {
    let window = driver.create_window("").unwrap();
    window.set_content(Rectangle::new(Color::BLACK));
    window.show();
    window
}

#[test]
fn repeated_set_dirty_repaints_once() {
    let painter = Arc::new(CountingPainter::default());
    let driver = Driver::with_painter(painter.clone()).unwrap();
    let window = shown_window(&driver);
    driver.draw_single_frame();
    painter.take();

    for _ in 0..5 {
        window.canvas().set_dirty();
    }
    assert_eq!(driver.draw_single_frame(), 1);
    assert_eq!(painter.take(), 1, "a single rectangle is painted once");

    assert_eq!(driver.draw_single_frame(), 0);
    assert_eq!(painter.take(), 0, "clean canvases are not painted");
}

#[test]
fn closed_windows_are_not_painted() {
    let painter = Arc::new(CountingPainter::default());
    let driver = Driver::with_painter(painter.clone()).unwrap();
    let window = shown_window(&driver);
    window.canvas().set_dirty();
    window.close();

    assert_eq!(driver.draw_single_frame(), 0);
    assert_eq!(painter.take(), 0);
}

#[test]
fn removing_a_window_keeps_the_order_of_the_rest() {
    let driver = Driver::with_painter(Arc::new(SoftwarePainter::new())).unwrap();
    let w1 = driver.create_window("W1").unwrap();
    let w2 = driver.create_window("W2").unwrap();
    let w3 = driver.create_window("W3").unwrap();

    w2.close();

    let titles: Vec<_> = driver.all_windows().iter().map(|w| w.title()).collect();
    assert_eq!(titles, vec![w1.title(), w3.title()]);
}

#[test]
fn focus_is_exclusive() {
    let driver = Driver::with_painter(Arc::new(SoftwarePainter::new())).unwrap();
    let windows: Vec<_> = (0..3).map(|i| driver.create_window(&format!("W{i}")).unwrap()).collect();
    for window in &windows {
        window.show();
    }

    windows[1].request_focus();
    let focused: Vec<_> = driver.all_windows().iter().map(|w| w.is_focused()).collect();
    assert_eq!(focused, vec![false, true, false]);
}

#[test]
fn replaced_content_stops_being_painted() {
    let painter = Arc::new(CountingPainter::default());
    let driver = Driver::with_painter(painter.clone()).unwrap();
    let window = shown_window(&driver);
    let old = window.content();
    driver.draw_single_frame();

    window.set_content(Rectangle::new(Color::WHITE));
    driver.draw_single_frame();
    assert_ne!(window.content().id(), old.id());
    assert_eq!(painter.take(), 2);
}
