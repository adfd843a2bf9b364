//! Session state and events
//!
//! A session owns every entity. It starts Running and ends exactly once,
//! when the player's life reaches zero; a new run needs a new session.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Field;
use super::obstacle::ObstacleField;
use super::player::Player;
use super::ports::SoundEvent;
use super::summary::Summary;
use crate::tuning::{Tuning, TuningError};

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Running,
    /// Terminal; stats are frozen
    Ended,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A projectile left the ship from this slot
    ShotFired { slot: usize },
    /// Trigger pulled with no free slot
    ShotDropped,
    /// An obstacle struck the ship
    PlayerHit { index: usize, life: u32 },
    /// An obstacle ran out of hit points; `scored` is false once the ship is dead
    ObstacleDestroyed { index: usize, scored: bool },
    /// An obstacle fell past the bottom of the field
    ObstacleMissed { index: usize },
    /// Obstacles sped up
    SpeedRamp { second: u32, speed: f32 },
    /// The session just ended
    Ended,
}

impl GameEvent {
    /// Sound cue for this event, if any
    pub fn sound(&self) -> Option<SoundEvent> {
        match self {
            GameEvent::ShotFired { .. } => Some(SoundEvent::Shoot),
            GameEvent::PlayerHit { .. } | GameEvent::ObstacleDestroyed { .. } => {
                Some(SoundEvent::Explosion)
            }
            _ => None,
        }
    }
}

/// Numbers shown on the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub score: u64,
    pub accuracy: u32,
    pub elapsed_seconds: u32,
    pub life: u32,
}

/// One play session
#[derive(Debug, Clone)]
pub struct Session {
    pub tuning: Tuning,
    pub seed: u64,
    pub player: Player,
    pub obstacles: ObstacleField,
    /// Simulation tick counter
    pub frame: u64,
    pub(crate) field: Field,
    pub(crate) rng: Pcg32,
    /// Seconds of play, advanced only while running
    clock: f64,
    elapsed_seconds: u32,
    status: Status,
}

impl Session {
    /// Start a session on `field`; obstacle spawns are drawn from `seed`
    ///
    /// Rejects tuning or field geometry that fails validation.
    pub fn new(tuning: Tuning, field: Field, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        field.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let player = Player::new(&tuning, field);
        let obstacles = ObstacleField::new(&tuning.obstacle, field, &mut rng);
        log::info!(
            "Session started: seed {}, field {}x{}, {} obstacles, magazine {}",
            seed,
            field.width,
            field.height,
            obstacles.len(),
            player.magazine.capacity()
        );
        Ok(Self {
            tuning,
            seed,
            player,
            obstacles,
            frame: 0,
            field,
            rng,
            clock: 0.0,
            elapsed_seconds: 0,
            status: Status::Running,
        })
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Current HUD numbers; life is never negative
    pub fn stats(&self) -> Stats {
        Stats {
            score: self.player.score,
            accuracy: self.player.accuracy,
            elapsed_seconds: self.elapsed_seconds,
            life: self.player.life,
        }
    }

    /// End-of-run summary from the configured tier tables
    pub fn summary(&self) -> Summary {
        Summary::build(&self.stats(), self.player.shots_fired, &self.tuning.summary)
    }

    /// Apply new field geometry; returns false if nothing changed
    pub fn resize(&mut self, field: Field) -> bool {
        if field == self.field {
            return false;
        }
        if let Err(e) = field.validate() {
            log::warn!("Ignoring resize: {}", e);
            return false;
        }
        log::debug!("Field resized to {}x{}", field.width, field.height);
        self.field = field;
        self.player.clamp_to(field);
        self.obstacles.clamp_to(field);
        true
    }

    /// Advance the play clock; no-op once ended
    pub(crate) fn advance_clock(&mut self, dt: f32) {
        if self.status != Status::Running || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.clock += dt as f64;
        self.elapsed_seconds = self.clock.floor() as u32;
    }

    /// Running -> Ended once life is gone; returns true on the transition
    pub(crate) fn evaluate_status(&mut self) -> bool {
        if self.status == Status::Running && !self.player.is_alive() {
            self.status = Status::Ended;
            log::info!(
                "Ship destroyed after {}s: score {}, accuracy {}%, {} shots",
                self.elapsed_seconds,
                self.player.score,
                self.player.accuracy,
                self.player.shots_fired
            );
            return true;
        }
        false
    }
}
