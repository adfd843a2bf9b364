//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Keyboard mapping and held-key input state
//! - Headless collaborators for native runs and tests

pub mod headless;
pub mod keyboard;

pub use keyboard::{HeldKeys, KeyAction, map_key};
