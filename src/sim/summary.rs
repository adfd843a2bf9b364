//! End-of-run summary text
//!
//! Each stat is bucketed by an ascending tier table; the first tier whose
//! exclusive upper bound exceeds the value wins, and the final tier has no
//! bound.

use serde::{Deserialize, Serialize};

use super::state::Stats;
use crate::tuning::TuningError;

/// One bucket: applies to values below `below` (or to everything if `None`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier<T> {
    pub below: Option<T>,
    pub message: String,
}

impl<T> Tier<T> {
    fn new(below: Option<T>, message: &str) -> Self {
        Self {
            below,
            message: message.to_string(),
        }
    }
}

/// Pick the message for `value` from an ascending tier table
pub fn select_tier<T: PartialOrd + Copy>(tiers: &[Tier<T>], value: T) -> &str {
    tiers
        .iter()
        .find(|tier| tier.below.is_none_or(|bound| value < bound))
        .map(|tier| tier.message.as_str())
        .unwrap_or_default()
}

/// Hit-rate remarks; rates in between get no line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotEconomy {
    pub wasteful_below: f32,
    pub wasteful: String,
    pub efficient_above: f32,
    pub efficient: String,
}

impl ShotEconomy {
    /// Remark for `score` hits out of `shots_fired`; none before any shot
    pub fn remark(&self, score: u64, shots_fired: u64) -> Option<&str> {
        if shots_fired == 0 {
            return None;
        }
        let hit_rate = score as f64 / shots_fired as f64;
        if hit_rate < self.wasteful_below as f64 {
            Some(self.wasteful.as_str())
        } else if hit_rate > self.efficient_above as f64 {
            Some(self.efficient.as_str())
        } else {
            None
        }
    }
}

impl Default for ShotEconomy {
    fn default() -> Self {
        Self {
            wasteful_below: 0.2,
            wasteful: "Trigger-happy! Most of your shots only hit empty space.".into(),
            efficient_above: 0.6,
            efficient: "Efficient shooting: you made your shots count.".into(),
        }
    }
}

/// All tier tables used by the summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryTiers {
    pub score: Vec<Tier<u64>>,
    /// Accuracy percent
    pub accuracy: Vec<Tier<u32>>,
    /// Survival time in seconds
    pub survival: Vec<Tier<u32>>,
    pub economy: ShotEconomy,
}

impl Default for SummaryTiers {
    fn default() -> Self {
        Self {
            score: vec![
                Tier::new(Some(1), "No asteroids destroyed. Keep your finger on the trigger!"),
                Tier::new(Some(20), "Cadet: a few rocks down, plenty more to go."),
                Tier::new(Some(50), "Pilot: the belt is starting to notice you."),
                Tier::new(Some(100), "Ace: a real menace to asteroids everywhere."),
                Tier::new(None, "Legend: the asteroid belt fears your name!"),
            ],
            accuracy: vec![
                Tier::new(Some(40), "Your aim needs work: line up before you fire."),
                Tier::new(Some(60), "Decent aim: most of your shots found a target."),
                Tier::new(Some(80), "Sharpshooter: very few wasted shots."),
                Tier::new(None, "Sniper precision!"),
            ],
            survival: vec![
                Tier::new(Some(30), "Short flight: under half a minute."),
                Tier::new(Some(120), "Solid run: you held the line for a while."),
                Tier::new(None, "Endurance pilot: over two minutes survived!"),
            ],
            economy: ShotEconomy::default(),
        }
    }
}

impl SummaryTiers {
    pub fn validate(&self) -> Result<(), TuningError> {
        validate_tiers("summary.score", &self.score)?;
        validate_tiers("summary.accuracy", &self.accuracy)?;
        validate_tiers("summary.survival", &self.survival)?;
        let economy = &self.economy;
        if !(economy.wasteful_below.is_finite() && economy.efficient_above.is_finite())
            || economy.wasteful_below > economy.efficient_above
        {
            return Err(TuningError::invalid(
                "summary.economy",
                "wasteful_below must not exceed efficient_above",
            ));
        }
        Ok(())
    }
}

fn validate_tiers<T: PartialOrd + Copy>(name: &'static str, tiers: &[Tier<T>]) -> Result<(), TuningError> {
    let Some((last, bounded)) = tiers.split_last() else {
        return Err(TuningError::invalid(name, "needs at least one tier"));
    };
    if last.below.is_some() {
        return Err(TuningError::invalid(name, "last tier must be unbounded"));
    }
    let mut previous: Option<T> = None;
    for tier in bounded {
        let Some(bound) = tier.below else {
            return Err(TuningError::invalid(name, "only the last tier may be unbounded"));
        };
        if previous.is_some_and(|p| bound <= p) {
            return Err(TuningError::invalid(name, "bounds must be strictly ascending"));
        }
        previous = Some(bound);
    }
    Ok(())
}

/// Text shown when the ship is destroyed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub stats: Stats,
    pub score: String,
    pub accuracy: String,
    pub survival: String,
    pub economy: Option<String>,
}

impl Summary {
    pub fn build(stats: &Stats, shots_fired: u64, tiers: &SummaryTiers) -> Self {
        Self {
            stats: *stats,
            score: select_tier(&tiers.score, stats.score).to_string(),
            accuracy: select_tier(&tiers.accuracy, stats.accuracy).to_string(),
            survival: select_tier(&tiers.survival, stats.elapsed_seconds).to_string(),
            economy: tiers
                .economy
                .remark(stats.score, shots_fired)
                .map(str::to_string),
        }
    }

    /// Summary lines in display order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.score.as_str()),
            Some(self.accuracy.as_str()),
            Some(self.survival.as_str()),
            self.economy.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}
