//! Headless driver for WaterUI.
//!
//! Windows created by a [`Driver`] never reach a screen. Their [`Canvas`] lays out a scene graph
//! and renders it with a [`hydrolysis`] painter into an in-memory RGBA image, which tests can
//! inspect pixel by pixel or compare against PNG masters with
//! [`testing::assert_renders_to_image`].
//!
//! ```no_run
//! use waterui_headless::Driver;
//! use waterui_headless::scene::{Color, Rectangle};
//!
//! # fn main() -> waterui_headless::Result<()> {
//! let driver = Driver::new()?;
//! let window = driver.all_windows().remove(0);
//! window.set_content(Rectangle::new(Color::rgb(33, 150, 243)));
//! window.show();
//! driver.draw_single_frame();
//! let frame = window.canvas().capture();
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod canvas;
pub mod clipboard;
pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod logging;
pub mod menu;
pub mod queue;
mod sync;
pub mod testing;
pub mod window;

#[cfg(test)]
mod tests;

pub use canvas::{Canvas, CanvasId};
pub use clipboard::{Clipboard, MemoryClipboard};
pub use config::HeadlessConfig;
pub use device::{HeadlessDevice, Orientation};
pub use driver::Driver;
pub use error::{HeadlessError, Result};
pub use hydrolysis::{CapturedImage, PaintSurface, Painter, SoftwarePainter};
pub use menu::{MainMenu, Menu, MenuItem};
pub use queue::TaskQueue;
pub use window::Window;

/// The scene-graph types canvases are built from.
pub use waterui_scene as scene;
