//! The player's ship

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, Field};
use super::obstacle::ObstacleField;
use super::projectile::{FireOutcome, Magazine};
use super::state::GameEvent;
use super::tick::TickInput;
use crate::tuning::Tuning;

/// The player ship, its counters and its projectile pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub aabb: Aabb,
    /// Horizontal movement per tick
    pub speed: f32,
    /// Remaining life; saturates at 0
    pub life: u32,
    pub max_life: u32,
    pub score: u64,
    /// Every trigger pull, including ones with an empty magazine
    pub shots_fired: u64,
    /// Integer percent of shots that scored
    pub accuracy: u32,
    pub bottom_margin: f32,
    pub magazine: Magazine,
}

impl Player {
    /// Create the ship centered at the bottom of the field
    pub fn new(tuning: &Tuning, field: Field) -> Self {
        let t = &tuning.player;
        let mut player = Self {
            aabb: Aabb::new(
                Vec2::new(field.width * 0.5 - t.width * 0.5, 0.0),
                Vec2::new(t.width, t.height),
            ),
            speed: t.speed,
            life: t.life,
            max_life: t.life,
            score: 0,
            shots_fired: 0,
            accuracy: 0,
            bottom_margin: t.bottom_margin,
            magazine: Magazine::new(&tuning.projectile),
        };
        player.anchor_to(field);
        player
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Where projectiles leave the ship
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.aabb.center_x(), self.aabb.top())
    }

    /// Pull the trigger once
    ///
    /// The shot counts against accuracy whether or not a projectile slot
    /// was free.
    pub fn fire(&mut self) -> FireOutcome {
        self.shots_fired += 1;
        self.magazine.fire(self.muzzle())
    }

    /// Advance the ship one tick: move, clamp, collide, then fire
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        input: &TickInput,
        field: Field,
        obstacles: &mut ObstacleField,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        if input.left {
            self.aabb.pos.x -= self.speed;
        }
        if input.right {
            self.aabb.pos.x += self.speed;
        }
        self.clamp_to(field);

        for index in obstacles.strike(&self.aabb, field, rng) {
            // Simultaneous hits each cost a life, never below zero
            self.life = self.life.saturating_sub(1);
            log::debug!("Ship hit by obstacle {}, life {}", index, self.life);
            events.push(GameEvent::PlayerHit {
                index,
                life: self.life,
            });
        }

        if !self.is_alive() {
            return;
        }
        for _ in 0..input.fire_requests {
            match self.fire() {
                FireOutcome::Loaded(slot) => events.push(GameEvent::ShotFired { slot }),
                FireOutcome::Empty => events.push(GameEvent::ShotDropped),
            }
        }
    }

    /// Recompute accuracy from score and shots fired
    pub fn refresh_accuracy(&mut self) {
        self.accuracy = accuracy_percent(self.score, self.shots_fired);
    }

    /// Re-apply horizontal clamp and bottom anchoring for `field`
    pub fn clamp_to(&mut self, field: Field) {
        let half = self.aabb.width() * 0.5;
        self.aabb.pos.x = self.aabb.pos.x.clamp(-half, field.width - half);
        self.anchor_to(field);
    }

    fn anchor_to(&mut self, field: Field) {
        self.aabb.pos.y = field.height - self.aabb.height() - self.bottom_margin;
    }
}

/// `floor(score / shots * 100)`, or 0 before the first shot
pub fn accuracy_percent(score: u64, shots_fired: u64) -> u32 {
    if shots_fired == 0 {
        return 0;
    }
    (score.saturating_mul(100) / shots_fired).min(u32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (Player, ObstacleField, Field, Pcg32) {
        let tuning = Tuning::default();
        let field = Field::new(600.0, 800.0);
        let mut rng = Pcg32::seed_from_u64(3);
        let obstacles = ObstacleField::new(&tuning.obstacle, field, &mut rng);
        (Player::new(&tuning, field), obstacles, field, rng)
    }

    fn held(left: bool, right: bool) -> TickInput {
        TickInput {
            left,
            right,
            ..Default::default()
        }
    }

    #[test]
    fn test_spawn_bottom_center() {
        let (player, _, field, _) = setup();
        assert_eq!(player.aabb.center_x(), field.width * 0.5);
        assert_eq!(player.aabb.bottom(), field.height - player.bottom_margin);
        assert_eq!(player.life, crate::consts::PLAYER_LIFE);
    }

    #[test]
    fn test_movement_and_clamp() {
        let (mut player, mut obstacles, field, mut rng) = setup();
        let start = player.aabb.left();
        let mut events = Vec::new();

        player.tick(&held(true, false), field, &mut obstacles, &mut rng, &mut events);
        assert_eq!(player.aabb.left(), start - player.speed);

        // Both held: no net movement
        player.tick(&held(true, true), field, &mut obstacles, &mut rng, &mut events);
        assert_eq!(player.aabb.left(), start - player.speed);

        for _ in 0..200 {
            player.tick(&held(true, false), field, &mut obstacles, &mut rng, &mut events);
        }
        assert_eq!(player.aabb.left(), -player.aabb.width() * 0.5);

        for _ in 0..200 {
            player.tick(&held(false, true), field, &mut obstacles, &mut rng, &mut events);
        }
        assert_eq!(player.aabb.left(), field.width - player.aabb.width() * 0.5);
    }

    #[test]
    fn test_fire_counts_every_pull() {
        let (mut player, mut obstacles, field, mut rng) = setup();
        let input = TickInput {
            fire_requests: 11,
            ..Default::default()
        };
        let mut events = Vec::new();
        player.tick(&input, field, &mut obstacles, &mut rng, &mut events);

        assert_eq!(player.shots_fired, 11);
        assert_eq!(player.magazine.busy_count(), 10);
        assert_eq!(events.last(), Some(&GameEvent::ShotDropped));
        let loaded = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ShotFired { .. }))
            .count();
        assert_eq!(loaded, 10);
    }

    #[test]
    fn test_projectile_leaves_top_center() {
        let (mut player, _, _, _) = setup();
        assert_eq!(player.fire(), FireOutcome::Loaded(0));
        let p = &player.magazine.slots()[0];
        assert_eq!(p.aabb.center_x(), player.aabb.center_x());
        assert_eq!(p.aabb.top(), player.aabb.top());
    }

    #[test]
    fn test_collision_costs_life_and_resets_obstacle() {
        let (mut player, mut obstacles, field, mut rng) = setup();
        let ship = player.aabb;
        let o = &mut obstacles.obstacles_mut()[0];
        o.aabb.pos = ship.pos;

        let mut events = Vec::new();
        player.tick(&TickInput::default(), field, &mut obstacles, &mut rng, &mut events);

        assert_eq!(player.life, crate::consts::PLAYER_LIFE - 1);
        assert_eq!(player.score, 0);
        assert!(obstacles.obstacles()[0].aabb.top() < 0.0);
        assert!(events.contains(&GameEvent::PlayerHit {
            index: 0,
            life: crate::consts::PLAYER_LIFE - 1
        }));

        // The reset obstacle cannot hit again next tick
        events.clear();
        player.tick(&TickInput::default(), field, &mut obstacles, &mut rng, &mut events);
        assert_eq!(player.life, crate::consts::PLAYER_LIFE - 1);
    }

    #[test]
    fn test_life_saturates_on_simultaneous_hits() {
        let (mut player, mut obstacles, field, mut rng) = setup();
        player.life = 2;
        let ship = player.aabb;
        for o in obstacles.obstacles_mut().iter_mut().take(4) {
            o.aabb.pos = ship.pos;
        }

        let mut events = Vec::new();
        player.tick(&TickInput::default(), field, &mut obstacles, &mut rng, &mut events);
        assert_eq!(player.life, 0);
        let hits = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
            .count();
        assert_eq!(hits, 4);
    }

    #[test]
    fn test_dead_ship_cannot_fire() {
        let (mut player, mut obstacles, field, mut rng) = setup();
        player.life = 0;
        let input = TickInput {
            fire_requests: 1,
            ..Default::default()
        };
        let mut events = Vec::new();
        player.tick(&input, field, &mut obstacles, &mut rng, &mut events);
        assert_eq!(player.shots_fired, 0);
    }

    #[test]
    fn test_accuracy_percent() {
        assert_eq!(accuracy_percent(0, 0), 0);
        assert_eq!(accuracy_percent(5, 0), 0);
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(2, 3), 66);
        assert_eq!(accuracy_percent(29, 100), 29);
        assert_eq!(accuracy_percent(10, 10), 100);
    }

    #[test]
    fn test_resize_reclamps() {
        let (mut player, _, _, _) = setup();
        player.aabb.pos.x = 580.0;
        let small = Field::new(300.0, 400.0);
        player.clamp_to(small);
        assert_eq!(player.aabb.left(), 300.0 - player.aabb.width() * 0.5);
        assert_eq!(player.aabb.bottom(), 400.0 - player.bottom_margin);
    }
}
