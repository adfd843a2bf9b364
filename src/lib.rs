//! Meteor Guard - a single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, session state)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (audio, HUD)
//! - `platform`: Input mapping and headless collaborators
//! - `renderer`: Canvas 2D rendering (browser only)
//! - `audio`: Web Audio sound effects (browser only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Difficulty, Tuning, TuningError};

/// Default gameplay constants
///
/// Units are logical field pixels; speeds are per tick.
pub mod consts {
    /// Nominal frame rate the per-tick speeds were tuned for
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Field size used until the environment reports one
    pub const FIELD_WIDTH: f32 = 600.0;
    pub const FIELD_HEIGHT: f32 = 800.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_SPEED: f32 = 10.0;
    pub const PLAYER_LIFE: u32 = 5;
    /// Gap between the ship's bottom edge and the field bottom
    pub const PLAYER_BOTTOM_MARGIN: f32 = 64.0;

    /// Projectiles
    pub const MAGAZINE_CAPACITY: usize = 10;
    pub const PROJECTILE_WIDTH: f32 = 3.0;
    pub const PROJECTILE_HEIGHT: f32 = 30.0;
    pub const PROJECTILE_SPEED: f32 = 10.0;

    /// Obstacles (asteroids)
    pub const OBSTACLE_COUNT: usize = 8;
    pub const OBSTACLE_WIDTH: f32 = 50.0;
    pub const OBSTACLE_HEIGHT: f32 = 50.0;
    pub const OBSTACLE_SPEED: f32 = 0.5;
    pub const OBSTACLE_MAX_SPEED: f32 = 5.0;
    pub const OBSTACLE_HIT_POINTS: u32 = 1;
    /// Height of the band above the field where obstacles respawn
    pub const SPAWN_BAND: f32 = 100.0;

    /// Difficulty ramp: every `RAMP_INTERVAL_SECS` obstacles speed up
    pub const RAMP_INTERVAL_SECS: u32 = 10;
    pub const RAMP_SPEED_INCREMENT: f32 = 0.5;
}
