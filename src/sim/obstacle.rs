//! Falling obstacles (asteroids)
//!
//! The field holds a fixed number of obstacles for the whole session. An
//! obstacle that is destroyed or falls off the bottom is reset above the
//! field instead of being removed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, Field, overlaps};
use super::player::Player;
use super::state::GameEvent;
use crate::tuning::ObstacleTuning;

/// A single falling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub aabb: Aabb,
    /// Fall speed per tick; only ever increases, capped by the field
    pub speed: f32,
    pub hit_points: u32,
}

impl Obstacle {
    /// Move above the field at a fresh random column and restore hit points
    pub fn reset<R: Rng + ?Sized>(&mut self, field: Field, rules: &ObstacleTuning, rng: &mut R) {
        let max_x = (field.width - self.aabb.width()).max(0.0);
        let x = if max_x > 0.0 && max_x.is_finite() {
            rng.random_range(0.0..max_x).floor()
        } else {
            0.0
        };
        let band = rules.spawn_band;
        let y = if band > 0.0 && band.is_finite() {
            rng.random_range(-band..0.0).floor()
        } else {
            0.0
        };
        self.aabb.pos = Vec2::new(x, y);
        self.hit_points = rules.hit_points;
    }
}

/// The session's fixed-size set of obstacles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    rules: ObstacleTuning,
    /// Elapsed second the ramp rule was last evaluated for
    last_ramp_second: Option<u32>,
}

impl ObstacleField {
    /// Spawn `rules.count` obstacles above the field
    pub fn new<R: Rng + ?Sized>(rules: &ObstacleTuning, field: Field, rng: &mut R) -> Self {
        let size = Vec2::new(rules.width, rules.height);
        let obstacles = (0..rules.count)
            .map(|_| {
                let mut obstacle = Obstacle {
                    aabb: Aabb::new(Vec2::ZERO, size),
                    speed: rules.speed,
                    hit_points: rules.hit_points,
                };
                obstacle.reset(field, rules, rng);
                obstacle
            })
            .collect();
        Self {
            obstacles,
            rules: rules.clone(),
            last_ramp_second: None,
        }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub(crate) fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    pub fn rules(&self) -> &ObstacleTuning {
        &self.rules
    }

    /// Reset every obstacle overlapping `target`; returns their indices
    pub fn strike<R: Rng + ?Sized>(&mut self, target: &Aabb, field: Field, rng: &mut R) -> Vec<usize> {
        let mut struck = Vec::new();
        for (index, obstacle) in self.obstacles.iter_mut().enumerate() {
            if overlaps(target, &obstacle.aabb) {
                obstacle.reset(field, &self.rules, rng);
                struck.push(index);
            }
        }
        struck
    }

    /// Advance all obstacles one tick
    ///
    /// Moves, recycles misses, resolves projectile hits (awarding the player
    /// a point per destroyed obstacle while alive) and applies the speed ramp.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        field: Field,
        elapsed_seconds: u32,
        player: &mut Player,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        let player_alive = player.is_alive();

        for (index, obstacle) in self.obstacles.iter_mut().enumerate() {
            obstacle.aabb.pos.y += obstacle.speed;
            if obstacle.aabb.top() >= field.height {
                obstacle.reset(field, &self.rules, rng);
                events.push(GameEvent::ObstacleMissed { index });
            }

            let mut already_reset = false;
            for projectile in player.magazine.slots_mut().iter_mut().filter(|p| p.busy) {
                if already_reset {
                    // Destroyed this tick; remaining projectiles fly on
                    break;
                }
                if !overlaps(&obstacle.aabb, &projectile.aabb) {
                    continue;
                }
                projectile.recycle();
                obstacle.hit_points = obstacle.hit_points.saturating_sub(1);
                if obstacle.hit_points == 0 {
                    obstacle.reset(field, &self.rules, rng);
                    already_reset = true;
                    if player_alive {
                        player.score += 1;
                    }
                    events.push(GameEvent::ObstacleDestroyed {
                        index,
                        scored: player_alive,
                    });
                }
            }
        }

        self.apply_ramp(elapsed_seconds, events);
    }

    /// Speed every obstacle up once per ramp boundary
    fn apply_ramp(&mut self, elapsed_seconds: u32, events: &mut Vec<GameEvent>) {
        if self.last_ramp_second == Some(elapsed_seconds) {
            return;
        }
        self.last_ramp_second = Some(elapsed_seconds);

        if elapsed_seconds.checked_rem(self.rules.ramp_interval_secs) != Some(0) {
            return;
        }

        let mut changed = false;
        for obstacle in &mut self.obstacles {
            let sped_up = (obstacle.speed + self.rules.ramp_increment).min(self.rules.max_speed);
            if sped_up > obstacle.speed {
                obstacle.speed = sped_up;
                changed = true;
            }
        }

        if changed {
            let top_speed = self.top_speed();
            log::info!("Obstacles speed up at {}s (top speed {})", elapsed_seconds, top_speed);
            events.push(GameEvent::SpeedRamp {
                second: elapsed_seconds,
                speed: top_speed,
            });
        }
    }

    /// Fastest obstacle speed
    pub fn top_speed(&self) -> f32 {
        self.obstacles.iter().map(|o| o.speed).fold(0.0, f32::max)
    }

    /// Keep every obstacle's column inside a (resized) field
    pub fn clamp_to(&mut self, field: Field) {
        for obstacle in &mut self.obstacles {
            let max_x = (field.width - obstacle.aabb.width()).max(0.0);
            obstacle.aabb.pos.x = obstacle.aabb.pos.x.min(max_x);
        }
    }
}
