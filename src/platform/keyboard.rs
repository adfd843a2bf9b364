//! Keyboard mapping and held-key state
//!
//! DOM key listeners write into [`HeldKeys`]; the frame loop reads it through
//! [`InputState`] at the start of each frame.

use crate::sim::ports::{Direction, InputState};
use crate::sim::tick::TickInput;

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    Fire,
}

/// Map a DOM `KeyboardEvent.key` value to an action
pub fn map_key(key: &str) -> Option<KeyAction> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(KeyAction::Steer(Direction::Left)),
        "ArrowRight" | "d" | "D" => Some(KeyAction::Steer(Direction::Right)),
        "1" | " " => Some(KeyAction::Fire),
        _ => None,
    }
}

/// Currently held directions plus queued fire triggers
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    left: bool,
    right: bool,
    fire_requests: u32,
}

impl HeldKeys {
    /// Handle a key press; returns true if the key is bound
    ///
    /// Auto-repeated presses of the fire key each pull the trigger.
    pub fn key_down(&mut self, key: &str) -> bool {
        match map_key(key) {
            Some(KeyAction::Steer(direction)) => {
                self.press(direction);
                true
            }
            Some(KeyAction::Fire) => {
                self.trigger_fire();
                true
            }
            None => false,
        }
    }

    /// Handle a key release; returns true if the key is bound
    pub fn key_up(&mut self, key: &str) -> bool {
        match map_key(key) {
            Some(KeyAction::Steer(direction)) => {
                self.release(direction);
                true
            }
            Some(KeyAction::Fire) => true,
            None => false,
        }
    }

    pub fn press(&mut self, direction: Direction) {
        *self.slot(direction) = true;
    }

    pub fn release(&mut self, direction: Direction) {
        *self.slot(direction) = false;
    }

    /// Drop held directions (focus lost, touch cancelled)
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
    }

    pub fn trigger_fire(&mut self) {
        self.fire_requests = self.fire_requests.saturating_add(1);
    }

    pub fn pending_fire_requests(&self) -> u32 {
        self.fire_requests
    }

    /// Replace held directions with `input` and queue its trigger pulls
    pub fn apply(&mut self, input: &TickInput) {
        self.left = input.left;
        self.right = input.right;
        self.fire_requests = self.fire_requests.saturating_add(input.fire_requests);
    }

    fn slot(&mut self, direction: Direction) -> &mut bool {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

impl InputState for HeldKeys {
    fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    fn take_fire_requests(&mut self) -> u32 {
        std::mem::take(&mut self.fire_requests)
    }
}
