//! Overlays follow canvas resizes, pop-ups reposition themselves instead.

use crate::Canvas;
use crate::scene::{CanvasObject, Color, ObjectRef, PopUp, Rectangle, Size};

#[test]
fn popup_is_refreshed_while_overlay_is_resized() {
    let canvas = Canvas::new();
    canvas.resize(Size::square(50.0));

    let content = Rectangle::new(Color::BLACK);
    content.set_min_size(Size::square(6.0));
    let popup = PopUp::popup(content, canvas.theme(), canvas.overlay_host());
    let cover = Rectangle::new(Color::rgba(0, 0, 0, 128));

    canvas.add_overlay(popup.clone());
    canvas.add_overlay(cover.clone() as ObjectRef);
    let popup_size = popup.size();
    let refreshes = popup.refresh_count();

    canvas.resize(Size::new(120.0, 80.0));

    assert_eq!(cover.size(), Size::new(120.0, 80.0));
    assert_eq!(popup.size(), popup_size, "pop-ups are never resized by the canvas");
    assert_eq!(popup.refresh_count(), refreshes + 1);

    let expected_x = (120.0 - popup_size.width) / 2.0;
    assert!((popup.position().x - expected_x).abs() < f32::EPSILON);
}

#[test]
fn overlays_receive_the_raw_requested_size() {
    let canvas = Canvas::new();
    let cover = Rectangle::new(Color::WHITE);
    canvas.add_overlay(cover.clone() as ObjectRef);

    canvas.resize(Size::new(10.5, 7.25));
    assert_eq!(canvas.size(), Size::new(11.0, 8.0));
    assert_eq!(cover.size(), Size::new(10.5, 7.25));
}

#[test]
fn overlay_stack_keeps_order() {
    let canvas = Canvas::new();
    let first: ObjectRef = Rectangle::new(Color::BLACK);
    let second: ObjectRef = Rectangle::new(Color::WHITE);
    canvas.add_overlay(first.clone());
    canvas.add_overlay(second.clone());

    let ids: Vec<_> = canvas.overlays().iter().map(|o| o.id()).collect();
    assert_eq!(ids, vec![first.id(), second.id()]);
    assert!(canvas.remove_overlay(second.id()));
    assert_eq!(canvas.top_overlay().map(|o| o.id()), Some(first.id()));
}
