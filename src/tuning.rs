//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. The three difficulty presets
//! share one simulation and differ only in these numbers. Tuning can be
//! loaded from JSON; missing keys fall back to the defaults.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::geometry::Field;
use crate::sim::summary::SummaryTiers;

/// Named difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Relaxed,
    #[default]
    Standard,
    Frantic,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Relaxed => "Relaxed",
            Difficulty::Standard => "Standard",
            Difficulty::Frantic => "Frantic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "easy" => Some(Difficulty::Relaxed),
            "standard" | "normal" => Some(Difficulty::Standard),
            "frantic" | "hard" => Some(Difficulty::Frantic),
            _ => None,
        }
    }
}

/// Player ship balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Horizontal movement per tick while a direction is held
    pub speed: f32,
    /// Starting (and maximum) life
    pub life: u32,
    /// Gap between the ship's bottom edge and the field bottom
    pub bottom_margin: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
            life: PLAYER_LIFE,
            bottom_margin: PLAYER_BOTTOM_MARGIN,
        }
    }
}

/// Projectile pool balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub width: f32,
    pub height: f32,
    /// Upward movement per tick
    pub speed: f32,
    /// Number of pooled projectile slots
    pub magazine_capacity: usize,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            width: PROJECTILE_WIDTH,
            height: PROJECTILE_HEIGHT,
            speed: PROJECTILE_SPEED,
            magazine_capacity: MAGAZINE_CAPACITY,
        }
    }
}

/// Obstacle field balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    pub count: usize,
    pub width: f32,
    pub height: f32,
    /// Starting fall speed per tick
    pub speed: f32,
    pub max_speed: f32,
    pub hit_points: u32,
    /// Obstacles respawn this far above the field at most
    pub spawn_band: f32,
    /// Seconds between speed increases
    pub ramp_interval_secs: u32,
    pub ramp_increment: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            count: OBSTACLE_COUNT,
            width: OBSTACLE_WIDTH,
            height: OBSTACLE_HEIGHT,
            speed: OBSTACLE_SPEED,
            max_speed: OBSTACLE_MAX_SPEED,
            hit_points: OBSTACLE_HIT_POINTS,
            spawn_band: SPAWN_BAND,
            ramp_interval_secs: RAMP_INTERVAL_SECS,
            ramp_increment: RAMP_SPEED_INCREMENT,
        }
    }
}

/// Complete gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Tuning {
    /// Field size used before the environment reports one
    pub field: Field,
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    pub obstacle: ObstacleTuning,
    pub summary: SummaryTiers,
}

impl Tuning {
    /// Build tuning for a difficulty preset
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut tuning = Self::default();
        match preset {
            Difficulty::Relaxed => {
                tuning.obstacle.count = 6;
                tuning.obstacle.max_speed = 4.0;
            }
            Difficulty::Standard => {}
            Difficulty::Frantic => {
                tuning.player.life = 3;
                tuning.projectile.magazine_capacity = 6;
                tuning.obstacle.count = 10;
                tuning.obstacle.speed = 1.0;
                tuning.obstacle.max_speed = 6.0;
            }
        }
        tuning
    }

    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a template file)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        self.field.validate()?;

        positive("player.width", self.player.width)?;
        positive("player.height", self.player.height)?;
        positive("player.speed", self.player.speed)?;
        non_negative("player.bottom_margin", self.player.bottom_margin)?;
        if self.player.life == 0 {
            return Err(TuningError::invalid("player.life", "must be at least 1"));
        }

        positive("projectile.width", self.projectile.width)?;
        positive("projectile.height", self.projectile.height)?;
        positive("projectile.speed", self.projectile.speed)?;

        let obstacle = &self.obstacle;
        positive("obstacle.width", obstacle.width)?;
        positive("obstacle.height", obstacle.height)?;
        positive("obstacle.speed", obstacle.speed)?;
        positive("obstacle.max_speed", obstacle.max_speed)?;
        positive("obstacle.spawn_band", obstacle.spawn_band)?;
        non_negative("obstacle.ramp_increment", obstacle.ramp_increment)?;
        if obstacle.max_speed < obstacle.speed {
            return Err(TuningError::invalid(
                "obstacle.max_speed",
                "must not be below obstacle.speed",
            ));
        }
        if obstacle.hit_points == 0 {
            return Err(TuningError::invalid("obstacle.hit_points", "must be at least 1"));
        }
        if obstacle.ramp_interval_secs == 0 {
            return Err(TuningError::invalid(
                "obstacle.ramp_interval_secs",
                "must be at least 1",
            ));
        }

        self.summary.validate()
    }
}

pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::invalid(field, "must be a positive number"))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::invalid(field, "must be zero or a positive number"))
    }
}

/// Failure to load or validate tuning
#[derive(Debug)]
pub enum TuningError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl TuningError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read tuning file {}: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "malformed tuning json: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning: {field} {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
