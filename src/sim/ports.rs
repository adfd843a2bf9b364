//! Collaborators the simulation talks to
//!
//! Rendering, audio, HUD text and input wiring all live outside the core.
//! The frame driver only sees these traits.

use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::state::Stats;
use super::summary::Summary;

/// What a sprite depicts; colors and images are the renderer's business
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    Player,
    Obstacle,
    Projectile,
}

/// Horizontal steering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// Sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEvent {
    Shoot,
    Explosion,
}

/// Draws entity boxes in field coordinates
pub trait Renderer {
    fn draw_sprite(&mut self, kind: SpriteKind, aabb: &Aabb);
}

/// Player input as seen at the start of a frame
pub trait InputState {
    fn is_held(&self, direction: Direction) -> bool;
    /// Fire triggers queued since the previous frame; clears the queue
    fn take_fire_requests(&mut self) -> u32;
}

/// Fire-and-forget sound playback
pub trait SoundTrigger {
    fn play(&mut self, event: SoundEvent);
}

/// Receives HUD numbers and the end-of-run summary
pub trait StatsDisplay {
    fn show_stats(&mut self, stats: &Stats);
    fn show_summary(&mut self, summary: &Summary);
}

/// The set of output collaborators a frame reports to
pub struct Collaborators<'a> {
    pub renderer: &'a mut dyn Renderer,
    pub sound: &'a mut dyn SoundTrigger,
    pub stats: &'a mut dyn StatsDisplay,
}
