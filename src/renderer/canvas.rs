//! Sprite drawing onto a 2D canvas

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use crate::sim::geometry::{Aabb, Field};
use crate::sim::ports::{Renderer, SpriteKind};

/// Look up a loaded `<img>` by element id
pub(crate) fn image(document: &Document, id: &str) -> Option<HtmlImageElement> {
    let img = document.get_element_by_id(id)?.dyn_into::<HtmlImageElement>().ok();
    if img.is_none() {
        log::warn!("#{} is not an image, using fallback shapes", id);
    }
    img
}

fn ready(img: &Option<HtmlImageElement>) -> Option<&HtmlImageElement> {
    img.as_ref().filter(|i| i.complete() && i.natural_width() > 0)
}

/// Draws ship, obstacles and projectiles
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    ship: Option<HtmlImageElement>,
    asteroid: Option<HtmlImageElement>,
    /// Logical (CSS pixel) size
    field: Field,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, document: &Document) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            ship: image(document, "ship1"),
            asteroid: image(document, "asteroid"),
            field: Field::default(),
        })
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    /// Fit the canvas to `css_width` x `css_height`, drawing in CSS pixels
    ///
    /// Device pixel ratio is capped at 2. Returns the new logical field.
    pub fn resize(&mut self, css_width: f64, css_height: f64, dpr: f64) -> Result<Field, JsValue> {
        let dpr = dpr.clamp(1.0, 2.0);
        let css_width = css_width.max(1.0);
        let css_height = css_height.max(1.0);

        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", css_width))?;
        style.set_property("height", &format!("{}px", css_height))?;
        self.canvas.set_width((css_width * dpr).floor() as u32);
        self.canvas.set_height((css_height * dpr).floor() as u32);
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;

        self.field = Field::new(css_width as f32, css_height as f32);
        log::debug!("Canvas resized to {}x{} @{}x", css_width, css_height, dpr);
        Ok(self.field)
    }

    /// Clear the whole logical area
    pub fn begin_frame(&self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.field.width as f64, self.field.height as f64);
    }

    fn fill(&self, color: &str, aabb: &Aabb) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            aabb.left() as f64,
            aabb.top() as f64,
            aabb.width() as f64,
            aabb.height() as f64,
        );
    }

    fn blit(&self, img: &HtmlImageElement, aabb: &Aabb) {
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img,
            aabb.left() as f64,
            aabb.top() as f64,
            aabb.width() as f64,
            aabb.height() as f64,
        );
    }
}

impl Renderer for CanvasRenderer {
    fn draw_sprite(&mut self, kind: SpriteKind, aabb: &Aabb) {
        match kind {
            SpriteKind::Player => match ready(&self.ship) {
                Some(img) => self.blit(img, aabb),
                None => self.fill("#1e88c5", aabb),
            },
            SpriteKind::Obstacle => match ready(&self.asteroid) {
                Some(img) => self.blit(img, aabb),
                None => self.fill("#8d6e63", aabb),
            },
            SpriteKind::Projectile => self.fill("white", aabb),
        }
    }
}
