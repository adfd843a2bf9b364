//! Canvas 2D rendering module
//!
//! Sprites are drawn from `<img>` elements in the host page, falling back
//! to flat rectangles until the images load. The HUD is drawn on top.

pub mod canvas;
pub mod hud;

pub use canvas::CanvasRenderer;
pub use hud::Hud;
