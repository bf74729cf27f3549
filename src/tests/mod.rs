//! Scenarios driving canvases, windows and the driver together.

mod frame_dispatch;
mod overlays;
