//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by slot index)
//! - No rendering or platform dependencies; frontends plug in via `ports`

pub mod autopilot;
pub mod geometry;
pub mod obstacle;
pub mod player;
pub mod ports;
pub mod projectile;
pub mod state;
pub mod summary;
pub mod tick;

pub use geometry::{Aabb, Field, overlaps};
pub use obstacle::{Obstacle, ObstacleField};
pub use player::{Player, accuracy_percent};
pub use ports::{
    Collaborators, Direction, InputState, Renderer, SoundEvent, SoundTrigger, SpriteKind,
    StatsDisplay,
};
pub use projectile::{FireOutcome, Magazine, Projectile};
pub use state::{GameEvent, Session, Stats, Status};
pub use summary::{Summary, SummaryTiers};
pub use tick::{TickInput, render, run_frame, tick};
