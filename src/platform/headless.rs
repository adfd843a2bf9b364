//! Collaborators for running without a browser
//!
//! The native binary logs through these; tests use [`Recorder`] to inspect
//! exactly what a frame reported.

use crate::sim::geometry::Aabb;
use crate::sim::ports::{Collaborators, Renderer, SoundEvent, SoundTrigger, SpriteKind, StatsDisplay};
use crate::sim::state::Stats;
use crate::sim::summary::Summary;

/// Counts draw calls instead of drawing
#[derive(Debug, Default)]
pub struct SpriteCounter {
    pub sprites: u64,
}

impl Renderer for SpriteCounter {
    fn draw_sprite(&mut self, _kind: SpriteKind, _aabb: &Aabb) {
        self.sprites += 1;
    }
}

/// Logs sound cues
#[derive(Debug, Default)]
pub struct LogSound {
    pub played: u64,
}

impl SoundTrigger for LogSound {
    fn play(&mut self, event: SoundEvent) {
        self.played += 1;
        log::trace!("sound: {:?}", event);
    }
}

/// Logs HUD changes and keeps the final summary
#[derive(Debug, Default)]
pub struct LogHud {
    pub last: Option<Stats>,
    pub summary: Option<Summary>,
}

impl StatsDisplay for LogHud {
    fn show_stats(&mut self, stats: &Stats) {
        if self.last.as_ref() != Some(stats) {
            log::debug!(
                "score {} | accuracy {}% | {}s | life {}",
                stats.score,
                stats.accuracy,
                stats.elapsed_seconds,
                stats.life
            );
        }
        self.last = Some(*stats);
    }

    fn show_summary(&mut self, summary: &Summary) {
        for line in summary.lines() {
            log::info!("{}", line);
        }
        self.summary = Some(summary.clone());
    }
}

/// HUD calls captured in order
#[derive(Debug, Default)]
pub struct HudRecord {
    pub stats: Vec<Stats>,
    pub summaries: Vec<Summary>,
}

impl StatsDisplay for HudRecord {
    fn show_stats(&mut self, stats: &Stats) {
        self.stats.push(*stats);
    }

    fn show_summary(&mut self, summary: &Summary) {
        self.summaries.push(summary.clone());
    }
}

impl Renderer for Vec<(SpriteKind, Aabb)> {
    fn draw_sprite(&mut self, kind: SpriteKind, aabb: &Aabb) {
        self.push((kind, *aabb));
    }
}

impl SoundTrigger for Vec<SoundEvent> {
    fn play(&mut self, event: SoundEvent) {
        self.push(event);
    }
}

/// Captures everything a frame reports
#[derive(Debug, Default)]
pub struct Recorder {
    pub sprites: Vec<(SpriteKind, Aabb)>,
    pub sounds: Vec<SoundEvent>,
    pub hud: HudRecord,
}

impl Recorder {
    pub fn collaborators(&mut self) -> Collaborators<'_> {
        Collaborators {
            renderer: &mut self.sprites,
            sound: &mut self.sounds,
            stats: &mut self.hud,
        }
    }
}
