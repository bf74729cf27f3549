//! Scene-graph contract shared by the headless driver and its painters.
//!
//! The crate describes what can be put on a canvas: geometry, colors, the [`CanvasObject`] node
//! trait, leaf [`Primitive`]s, [`Container`]s with pluggable [`Layout`]s and renderer-driven
//! widgets. Drivers and painters only talk to nodes through these types.

pub mod animation;
pub mod color;
pub mod container;
pub mod geometry;
pub mod layout;
pub mod object;
pub mod primitive;
pub mod text;
pub mod theme;
pub mod walk;
pub mod widget;

pub use animation::Animation;
pub use color::Color;
pub use container::Container;
pub use geometry::{Point, Rect, Size};
pub use layout::{HBoxLayout, Layout, StackLayout, VBoxLayout};
pub use object::{BaseObject, CanvasObject, ObjectId, ObjectKind, ObjectRef};
pub use primitive::{
    Circle, CircleStyle, Image, ImageData, ImageFill, ImageSpec, Line, LineStyle, LinearGradient,
    LinearGradientSpec, Primitive, RadialGradient, RadialGradientSpec, Raster, RasterGenerator,
    RasterSpec, Rectangle, RectangleStyle, Text, TextSpec,
};
pub use text::{TextAlign, TextStyle, rendered_text_size};
pub use theme::Theme;
pub use walk::{
    absolute_position_for_object, layout_and_collect, layout_tree, walk_complete_object_tree,
    walk_visible_object_tree,
};
pub use widget::{BaseWidget, MenuBar, OverlayHost, PopUp, Scroll, WidgetRenderer};
