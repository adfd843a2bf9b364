//! Player audio preferences
//!
//! Held in memory for the lifetime of the page; nothing is stored.

/// Volume change per key press
pub const VOLUME_STEP: f32 = 0.1;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Sound effects volume (0.0 - 1.0)
    pub volume: f32,
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            muted: false,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Gain applied to sound effects, 0 when muted
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume.clamp(0.0, 1.0)
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Nudge the volume by `steps` increments, staying within 0..=1
    pub fn adjust_volume(&mut self, steps: i32) -> f32 {
        let volume = self.volume + steps as f32 * VOLUME_STEP;
        // Snap to the step grid so repeated presses land on round values
        self.volume = ((volume / VOLUME_STEP).round() * VOLUME_STEP).clamp(0.0, 1.0);
        self.volume
    }

    pub fn toggle_mute_on_blur(&mut self) -> bool {
        self.mute_on_blur = !self.mute_on_blur;
        self.mute_on_blur
    }
}
