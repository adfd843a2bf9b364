//! Fixed-size projectile pool
//!
//! Slots are allocated once when the player is created and recycled forever
//! after; "destroying" a projectile only clears its `busy` flag.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use crate::tuning::ProjectileTuning;

/// A pooled projectile slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub aabb: Aabb,
    /// Upward movement per tick
    pub speed: f32,
    /// In flight: takes part in update, draw and collision
    pub busy: bool,
}

impl Projectile {
    fn new(size: Vec2, speed: f32) -> Self {
        Self {
            aabb: Aabb::new(Vec2::ZERO, size),
            speed,
            busy: false,
        }
    }

    /// Return the slot to the pool
    pub fn recycle(&mut self) {
        self.busy = false;
        self.aabb.pos = Vec2::ZERO;
    }
}

/// Result of a fire attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A free slot was launched
    Loaded(usize),
    /// Every slot is in flight; nothing was launched
    Empty,
}

/// The player's projectile pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Magazine {
    slots: Vec<Projectile>,
}

impl Magazine {
    pub fn new(tuning: &ProjectileTuning) -> Self {
        let size = Vec2::new(tuning.width, tuning.height);
        Self {
            slots: (0..tuning.magazine_capacity)
                .map(|_| Projectile::new(size, tuning.speed))
                .collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Projectile] {
        &self.slots
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Projectile] {
        &mut self.slots
    }

    /// Projectiles currently in flight
    pub fn busy(&self) -> impl Iterator<Item = &Projectile> {
        self.slots.iter().filter(|p| p.busy)
    }

    pub fn busy_count(&self) -> usize {
        self.busy().count()
    }

    pub fn has_free_slot(&self) -> bool {
        self.slots.iter().any(|p| !p.busy)
    }

    /// Launch the first free slot (lowest index) centered on `origin.x`
    pub fn fire(&mut self, origin: Vec2) -> FireOutcome {
        let Some((index, slot)) = self.slots.iter_mut().enumerate().find(|(_, p)| !p.busy) else {
            return FireOutcome::Empty;
        };
        slot.aabb.pos = Vec2::new(origin.x - slot.aabb.width() * 0.5, origin.y);
        slot.busy = true;
        FireOutcome::Loaded(index)
    }

    /// Move busy projectiles up and recycle those fully above the field
    pub fn tick(&mut self) {
        for projectile in self.slots.iter_mut().filter(|p| p.busy) {
            projectile.aabb.pos.y -= projectile.speed;
            if projectile.aabb.top() < -projectile.aabb.height() {
                projectile.recycle();
            }
        }
    }
}
