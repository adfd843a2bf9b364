//! Score, accuracy, timer and lives overlay

use web_sys::{CanvasRenderingContext2d, Document, HtmlImageElement};

use super::canvas::image;
use crate::sim::geometry::Field;
use crate::sim::ports::StatsDisplay;
use crate::sim::state::Stats;
use crate::sim::summary::Summary;

const HUD_COLOR: &str = "#1e88c5";
const HEART_SIZE: f64 = 16.0;
const HEART_SPACING: f64 = 18.0;

/// Keeps the latest stats and draws them after the sprites
pub struct Hud {
    ctx: CanvasRenderingContext2d,
    heart: Option<HtmlImageElement>,
    stats: Option<Stats>,
    summary: Option<Summary>,
}

impl Hud {
    pub fn new(ctx: CanvasRenderingContext2d, document: &Document) -> Self {
        Self {
            ctx,
            heart: image(document, "heart"),
            stats: None,
            summary: None,
        }
    }

    /// Forget the previous run
    pub fn reset(&mut self) {
        self.stats = None;
        self.summary = None;
    }

    pub fn draw(&self, field: Field) {
        let ctx = &self.ctx;
        ctx.save();

        if let Some(stats) = &self.stats {
            ctx.set_font("bold 18px Impact");
            ctx.set_fill_style_str(HUD_COLOR);
            ctx.set_text_align("left");
            let _ = ctx.fill_text(&format!("Score: {}", stats.score), 20.0, 25.0);
            let _ = ctx.fill_text(&format!("Accuracy: {}%", stats.accuracy), 20.0, 50.0);
            let _ = ctx.fill_text(&format!("Timer: {} s", stats.elapsed_seconds), 20.0, 75.0);
            self.draw_hearts(stats.life);
        }

        if let Some(summary) = &self.summary {
            let cx = field.width as f64 * 0.5;
            let cy = field.height as f64 * 0.5;
            ctx.set_fill_style_str("white");
            ctx.set_text_align("center");
            ctx.set_font("bold 48px Impact");
            let _ = ctx.fill_text("Ship Destroyed!", cx, cy);

            ctx.set_font("16px sans-serif");
            for (i, line) in summary.lines().enumerate() {
                let _ = ctx.fill_text(line, cx, cy + 40.0 + i as f64 * 24.0);
            }
        }

        ctx.restore();
    }

    fn draw_hearts(&self, life: u32) {
        let mut x = 20.0;
        for _ in 0..life {
            match self.heart.as_ref().filter(|h| h.complete() && h.natural_width() > 0) {
                Some(img) => {
                    let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img, x, 85.0, HEART_SIZE, HEART_SIZE,
                    );
                }
                None => {
                    self.ctx.set_fill_style_str("#e53935");
                    self.ctx.fill_rect(x, 85.0, HEART_SIZE, HEART_SIZE);
                }
            }
            x += HEART_SPACING;
        }
    }
}

impl StatsDisplay for Hud {
    fn show_stats(&mut self, stats: &Stats) {
        self.stats = Some(*stats);
    }

    fn show_summary(&mut self, summary: &Summary) {
        log::info!("Run over: {}", summary.score);
        self.summary = Some(summary.clone());
    }
}
